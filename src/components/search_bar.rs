use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::app::SearchInput;
use crate::theme::ThemeColors;
use crate::treemap::SearchContext;

/// Search box with a block cursor and a mode tag on the right.
pub struct SearchBarWidget<'a> {
    input: &'a SearchInput,
    context: &'a SearchContext,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> SearchBarWidget<'a> {
    pub fn new(input: &'a SearchInput, context: &'a SearchContext, theme: &'a ThemeColors) -> Self {
        Self {
            input,
            context,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

/// Short label for how the current query is matched.
pub fn mode_label(context: &SearchContext) -> String {
    if context.is_empty() {
        return String::new();
    }
    let mut parts = Vec::new();
    if context.is_exact {
        parts.push("exact".to_string());
    }
    if context.has_path_separator {
        parts.push(format!("path:{}", context.path_segments.len()));
    }
    if parts.is_empty() {
        "substring".to_string()
    } else {
        parts.join(" ")
    }
}

impl<'a> Widget for SearchBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let query = &self.input.query;
        let cursor = self.input.cursor_position.min(query.len());
        let (before, rest) = query.split_at(cursor);
        let (cursor_char, after) = match rest.chars().next() {
            Some(c) => rest.split_at(c.len_utf8()),
            None => (" ", ""),
        };

        let input_style = Style::default().fg(self.theme.search_fg);
        let cursor_style = Style::default()
            .bg(self.theme.search_fg)
            .fg(self.theme.status_bg)
            .add_modifier(Modifier::BOLD);
        let prompt_style = Style::default()
            .fg(self.theme.accent_fg)
            .add_modifier(Modifier::BOLD);

        let mut spans = vec![
            Span::styled("/ ", prompt_style),
            Span::styled(before.to_string(), input_style),
            Span::styled(cursor_char.to_string(), cursor_style),
            Span::styled(after.to_string(), input_style),
        ];

        let label = mode_label(self.context);
        if !label.is_empty() {
            let used: usize = spans.iter().map(|s| s.width()).sum();
            let label = format!("[{label}]");
            let pad = (inner.width as usize).saturating_sub(used + label.len());
            if pad > 0 {
                spans.push(Span::raw(" ".repeat(pad)));
                spans.push(Span::styled(label, Style::default().fg(self.theme.dim_fg)));
            }
        }

        buf.set_line(inner.x, inner.y, &Line::from(spans), inner.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;

    fn content(buf: &Buffer, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn mode_labels() {
        assert_eq!(mode_label(&SearchContext::new("")), "");
        assert_eq!(mode_label(&SearchContext::new("main")), "substring");
        assert_eq!(mode_label(&SearchContext::new("`main`")), "exact");
        assert_eq!(mode_label(&SearchContext::new("src/main")), "path:2");
        assert_eq!(mode_label(&SearchContext::new("`a/b/c`")), "exact path:3");
    }

    #[test]
    fn renders_query_cursor_and_mode() {
        let tc = theme::dark_theme();
        let input = SearchInput {
            query: "src/ma".to_string(),
            cursor_position: 2,
        };
        let ctx = SearchContext::new(&input.query);
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        SearchBarWidget::new(&input, &ctx, &tc).render(area, &mut buf);

        let text = content(&buf, 40);
        assert!(text.starts_with("/ src/ma"));
        assert!(text.trim_end().ends_with("[path:2]"));
        // Cursor sits on 'c'
        assert_eq!(buf.cell((4, 0)).unwrap().symbol(), "c");
        assert_eq!(buf.cell((4, 0)).unwrap().bg, tc.search_fg);
    }

    #[test]
    fn cursor_at_end_is_a_blank_block() {
        let tc = theme::dark_theme();
        let input = SearchInput {
            query: "ab".to_string(),
            cursor_position: 2,
        };
        let ctx = SearchContext::new(&input.query);
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        SearchBarWidget::new(&input, &ctx, &tc).render(area, &mut buf);
        assert_eq!(buf.cell((4, 0)).unwrap().bg, tc.search_fg);
    }
}
