use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::App;

/// Handle a key event. Printable keys always go to the search box.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => app.quit(),
            KeyCode::Char('r') => app.reload(),
            KeyCode::Char('w') => app.toggle_watcher(),
            KeyCode::Char('u') => app.clear_query(),
            KeyCode::Char('a') => app.cursor_home(),
            KeyCode::Char('e') => app.cursor_end(),
            KeyCode::Char('n') => app.select_next(),
            KeyCode::Char('p') => app.select_previous(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => {
            if app.input.query.is_empty() {
                app.quit();
            } else {
                app.clear_query();
            }
        }
        KeyCode::Char(c) => app.input_char(c),
        KeyCode::Backspace => app.delete_char(),
        KeyCode::Delete => app.delete_char_forward(),
        KeyCode::Left => app.move_cursor_left(),
        KeyCode::Right => app.move_cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Up => app.select_previous(),
        KeyCode::Down => app.select_next(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::PageDown => app.page_down(),
        KeyCode::Enter | KeyCode::Tab => app.toggle_selected(),
        _ => {}
    }
}

/// Mouse wheel scrolls the selection.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => app.select_next(),
        MouseEventKind::ScrollUp => app.select_previous(),
        _ => {}
    }
}
