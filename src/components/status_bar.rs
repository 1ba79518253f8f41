use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

const KEY_HINTS: &str = " ↑↓:move  ⏎:fold  ^R:reload  Esc:clear/quit ";

/// Status bar: selected row, filter summary, key hints, or a transient message.
pub struct StatusBarWidget<'a> {
    selection: &'a str,
    summary: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    is_error: bool,
    watcher_status: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(selection: &'a str, summary: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            selection,
            summary,
            theme,
            status_message: None,
            is_error: false,
            watcher_status: None,
        }
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }

    pub fn watcher_status(mut self, status: &'a str) -> Self {
        self.watcher_status = Some(status);
        self
    }
}

/// Keep the tail of `s` within `budget` chars, marking the cut with `...`.
fn truncate_left(s: &str, budget: usize) -> String {
    let len = s.chars().count();
    if len <= budget {
        return s.to_string();
    }
    if budget <= 3 {
        return s.chars().take(budget).collect();
    }
    let tail: String = s.chars().skip(len - (budget - 3)).collect();
    format!("...{tail}")
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;
        let bar_style = Style::default()
            .bg(self.theme.status_bg)
            .fg(self.theme.status_fg);

        if let Some(msg) = self.status_message {
            let style = if self.is_error {
                Style::default()
                    .bg(self.theme.error_fg)
                    .fg(self.theme.status_bg)
            } else {
                bar_style.fg(self.theme.success_fg)
            };
            let display: String = msg.chars().take(width).collect();
            let pad = width.saturating_sub(display.chars().count());
            let line = Line::from(vec![
                Span::styled(display, style),
                Span::styled(" ".repeat(pad), style),
            ]);
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        let hints_len = KEY_HINTS.chars().count();
        let summary_len = self.summary.chars().count();
        let watcher = self.watcher_status.unwrap_or("");
        let watcher_len = if watcher.is_empty() {
            0
        } else {
            watcher.chars().count() + 1
        };

        let remaining = width.saturating_sub(hints_len);
        let selection_budget = remaining
            .saturating_sub(summary_len)
            .saturating_sub(watcher_len)
            .saturating_sub(2);
        let selection = truncate_left(self.selection, selection_budget);

        let mut spans = vec![
            Span::styled(" ", bar_style),
            Span::styled(selection, bar_style),
            Span::styled(" ", bar_style),
            Span::styled(
                self.summary.to_string(),
                bar_style.fg(self.theme.info_fg),
            ),
        ];
        if !watcher.is_empty() {
            spans.push(Span::styled(" ", bar_style));
            spans.push(Span::styled(
                watcher.to_string(),
                bar_style
                    .fg(self.theme.warning_fg)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let used: usize = spans.iter().map(|s| s.width()).sum();
        let pad = width.saturating_sub(used).saturating_sub(hints_len);
        if pad > 0 {
            spans.push(Span::styled(" ".repeat(pad), bar_style));
        }
        spans.push(Span::styled(
            KEY_HINTS,
            bar_style
                .fg(self.theme.dim_fg)
                .add_modifier(Modifier::DIM),
        ));

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
