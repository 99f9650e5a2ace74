//! Keyboard and mouse handling.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::App;

/// File written by the in-app export key.
pub const EXPORT_FILE: &str = "vitality_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent, now: Instant) {
    // Any key closes help
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        KeyCode::Left | KeyCode::Char('h') => app.focus_prev(),
        KeyCode::Right | KeyCode::Char('l') => app.focus_next(),
        KeyCode::Home => app.focus_first(),
        KeyCode::End => app.focus_last(),
        KeyCode::Char('c') => app.clear_focus(),

        KeyCode::Char('r') => app.remount(now),
        KeyCode::Char('?') => app.toggle_help(),

        KeyCode::Char('e') => {
            let path = PathBuf::from(EXPORT_FILE);
            match app.export_view(&path) {
                Ok(()) => app.set_status_message(format!("Exported to {}", path.display())),
                Err(e) => {
                    tracing::warn!(error = %e, "export failed");
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle mouse events: hovering the chart moves the tooltip.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) | MouseEventKind::Down(_) => {
            app.hover(mouse.column, mouse.row);
        }
        MouseEventKind::ScrollUp => app.focus_prev(),
        MouseEventKind::ScrollDown => app.focus_next(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, MouseButton};
    use ratatui::layout::Rect;

    use crate::controller::Phase;
    use crate::settings::Settings;
    use crate::ui::Theme;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn new_app() -> (App, Instant) {
        let now = Instant::now();
        (App::new(Settings::default(), Theme::dark(), now), now)
    }

    #[test]
    fn test_quit_keys() {
        let (mut app, now) = new_app();
        handle_key_event(&mut app, key(KeyCode::Char('q')), now);
        assert!(!app.running);
        assert_eq!(app.controller.phase(), Phase::TornDown);

        let (mut app, now) = new_app();
        handle_key_event(&mut app, key(KeyCode::Esc), now);
        assert!(!app.running);
    }

    #[test]
    fn test_help_swallows_next_key() {
        let (mut app, now) = new_app();
        handle_key_event(&mut app, key(KeyCode::Char('?')), now);
        assert!(app.show_help);

        handle_key_event(&mut app, key(KeyCode::Char('q')), now);
        assert!(!app.show_help);
        assert!(app.running);
    }

    #[test]
    fn test_arrow_keys_move_focus() {
        let (mut app, now) = new_app();
        handle_key_event(&mut app, key(KeyCode::Right), now);
        handle_key_event(&mut app, key(KeyCode::Right), now);
        assert_eq!(app.focused_sample, Some(1));
        handle_key_event(&mut app, key(KeyCode::Char('h')), now);
        assert_eq!(app.focused_sample, Some(0));
        handle_key_event(&mut app, key(KeyCode::End), now);
        assert_eq!(app.focused_sample, Some(8));
        handle_key_event(&mut app, key(KeyCode::Char('c')), now);
        assert!(app.focused_sample.is_none());
    }

    #[test]
    fn test_mouse_hover_and_scroll() {
        let (mut app, _) = new_app();
        app.plot_area = Some(Rect::new(0, 0, 81, 10));

        let event = |kind: MouseEventKind, column: u16| MouseEvent {
            kind,
            column,
            row: 2,
            modifiers: KeyModifiers::NONE,
        };

        handle_mouse_event(&mut app, event(MouseEventKind::Moved, 80));
        assert_eq!(app.focused_sample, Some(8));
        handle_mouse_event(&mut app, event(MouseEventKind::ScrollUp, 0));
        assert_eq!(app.focused_sample, Some(7));
        handle_mouse_event(&mut app, event(MouseEventKind::Down(MouseButton::Left), 0));
        assert_eq!(app.focused_sample, Some(0));
    }
}
