use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::App;
use crate::components::search_bar::SearchBarWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tree::TreeWidget;
use crate::render::format_size;
use crate::theme::ThemeColors;
use crate::treemap::FilterOutcome;

/// Render the application UI: search box, tree, status bar.
pub fn render(app: &mut App, theme: &ThemeColors, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let search_block = Block::default()
        .title(" Search ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused_fg));
    frame.render_widget(
        SearchBarWidget::new(&app.input, &app.context, theme).block(search_block),
        chunks[0],
    );

    // Keep the selection visible, minus the border rows
    app.update_scroll(chunks[1].height.saturating_sub(2) as usize);

    let tree_block = Block::default()
        .title(format!(" {} ", app.tree.name))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_fg));
    let empty = empty_message(app);
    let tree_widget = TreeWidget::new(&app.flat_items, app.selected_index, app.scroll_offset, theme)
        .highlight(&app.context.final_segment)
        .empty_message(&empty)
        .block(tree_block);
    frame.render_widget(tree_widget, chunks[1]);

    let selection = app
        .selected_item()
        .map(|item| item.key.clone())
        .unwrap_or_default();
    let summary = summary(app);
    let mut status = StatusBarWidget::new(&selection, &summary, theme);
    if !app.watcher_active {
        status = status.watcher_status("[paused]");
    }
    if let Some((msg, _, is_error)) = &app.status_message {
        status = status.status_message(msg, *is_error);
    }
    frame.render_widget(status, chunks[2]);
}

/// Placeholder shown in place of tree rows.
fn empty_message(app: &App) -> String {
    match app.outcome {
        FilterOutcome::NoMatch => format!("No matches for `{}`", app.context.raw_query),
        _ => "Empty tree".to_string(),
    }
}

/// "N of M nodes · size" for a filtered view, "M nodes · size" otherwise.
pub fn summary(app: &App) -> String {
    let total = app.tree.node_count().saturating_sub(1);
    match app.outcome {
        FilterOutcome::Unchanged => {
            format!("{} nodes · {}", total, format_size(app.tree.leaf_size()))
        }
        FilterOutcome::Filtered { nodes, size } => {
            format!("{} of {} nodes · {}", nodes, total, format_size(size))
        }
        FilterOutcome::NoMatch => format!("0 of {} nodes", total),
    }
}
