use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::render::format_size;
use crate::treemap::flatten::{tree_prefix, FlatItem};
use crate::theme::ThemeColors;

/// Tree widget: box-drawing rows, sizes on the right, matched text highlighted.
pub struct TreeWidget<'a> {
    items: &'a [FlatItem],
    selected: usize,
    scroll: usize,
    theme: &'a ThemeColors,
    /// Lowercased text to highlight inside names. Empty = none.
    highlight: &'a str,
    /// Shown when there are no rows.
    empty_message: &'a str,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(items: &'a [FlatItem], selected: usize, scroll: usize, theme: &'a ThemeColors) -> Self {
        Self {
            items,
            selected,
            scroll,
            theme,
            highlight: "",
            empty_message: "",
            block: None,
        }
    }

    pub fn highlight(mut self, needle: &'a str) -> Self {
        self.highlight = needle;
        self
    }

    pub fn empty_message(mut self, message: &'a str) -> Self {
        self.empty_message = message;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn indicator(item: &FlatItem) -> &'static str {
        match (item.is_directory, item.is_collapsed) {
            (true, true) => "▸ ",
            (true, false) => "▾ ",
            (false, _) => "  ",
        }
    }
}

/// Byte range of the first case-insensitive occurrence of `needle` in `name`.
///
/// Only reported when lowercasing keeps byte offsets stable.
pub fn highlight_range(name: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }
    let lower = name.to_lowercase();
    if lower.len() != name.len() {
        return None;
    }
    let start = lower.find(needle)?;
    let end = start + needle.len();
    if name.is_char_boundary(start) && name.is_char_boundary(end) {
        Some((start, end))
    } else {
        None
    }
}

impl<'a> Widget for TreeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let visible_height = inner_area.height as usize;
        if visible_height == 0 || inner_area.width == 0 {
            return;
        }

        if self.items.is_empty() {
            let style = Style::default()
                .fg(self.theme.dim_fg)
                .add_modifier(Modifier::ITALIC);
            let line = Line::from(Span::styled(self.empty_message, style));
            buf.set_line(inner_area.x + 1, inner_area.y, &line, inner_area.width.saturating_sub(1));
            return;
        }

        let width = inner_area.width as usize;
        let visible_items = self
            .items
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(visible_height);

        for (i, (idx, item)) in visible_items.enumerate() {
            let y = inner_area.y + i as u16;

            let is_selected = idx == self.selected;
            let base = if item.is_directory {
                Style::default()
                    .fg(self.theme.tree_dir_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.tree_file_fg)
            };
            let base = if is_selected {
                base.bg(self.theme.tree_selected_bg)
                    .fg(self.theme.tree_selected_fg)
            } else {
                base
            };
            let match_style = base.fg(self.theme.match_fg).add_modifier(Modifier::UNDERLINED);

            let guide_style = if is_selected {
                base
            } else {
                Style::default().fg(self.theme.tree_fg)
            };
            let mut spans = vec![Span::styled(
                format!("{}{}", tree_prefix(self.items, idx), Self::indicator(item)),
                guide_style,
            )];
            match highlight_range(&item.name, self.highlight) {
                Some((start, end)) => {
                    spans.push(Span::styled(item.name[..start].to_string(), base));
                    spans.push(Span::styled(item.name[start..end].to_string(), match_style));
                    spans.push(Span::styled(item.name[end..].to_string(), base));
                }
                None => spans.push(Span::styled(item.name.clone(), base)),
            }

            let size = format_size(item.size);
            let used: usize = spans.iter().map(|s| s.width()).sum();
            let pad = width.saturating_sub(used + size.len() + 1);
            let size_style = if is_selected {
                base.fg(self.theme.size_fg)
            } else {
                Style::default().fg(self.theme.size_fg)
            };
            spans.push(Span::styled(" ".repeat(pad + 1), base));
            spans.push(Span::styled(size, size_style));

            let line = Line::from(spans);
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}
