//! Terminal UI rendering using ratatui.
//!
//! Each card lives in its own submodule with a `render` function. [`draw`]
//! lays them out:
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Banner (common::render_banner)       │
//! ├──────────────────┬───────────────────┤
//! │ Gauge            │ Direction         │
//! │ (gauge::render)  │ (trend::render)   │
//! ├──────────────────┴───────────────────┤
//! │ History chart (chart::render)        │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Help overlay rendered on top
//! ```

pub mod chart;
pub mod common;
pub mod gauge;
pub mod theme;
pub mod trend;

pub use theme::Theme;

use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

/// Smallest terminal the dashboard draws into.
pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 24;

/// Draw one frame of the dashboard.
pub fn draw(frame: &mut Frame, app: &mut App, now: Instant) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.weak));
        let centered = Rect::new(0, area.height.saturating_sub(5) / 2, area.width, 5u16.min(area.height));
        frame.render_widget(paragraph, centered);
        app.plot_area = None;
        return;
    }

    let view = app.view();

    let rows = Layout::vertical([
        Constraint::Length(1),      // Header bar
        Constraint::Length(3),      // Banner
        Constraint::Percentage(50), // Gauge | Direction
        Constraint::Min(8),         // Chart
        Constraint::Length(1),      // Status bar
    ])
    .split(area);

    let cards = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);

    common::render_header(frame, app, &view, rows[0], now);
    common::render_banner(frame, app, &view, rows[1]);
    gauge::render(frame, app, cards[0], now);
    trend::render(frame, app, cards[1]);
    chart::render(frame, app, rows[3]);
    common::render_status_bar(frame, app, rows[4]);

    if app.show_help {
        common::render_help(frame, app, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use ratatui::{backend::TestBackend, Terminal};

    use crate::settings::Settings;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_draws_initial_then_degraded() {
        let start = Instant::now();
        let mut app = App::new(Settings::default(), Theme::dark(), start);
        let mut terminal = Terminal::new(TestBackend::new(100, 36)).unwrap();

        terminal.draw(|frame| draw(frame, &mut app, start)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("VITALITY: HEALTHY"));
        assert!(text.contains("100%"));
        assert!(app.plot_area.is_some());

        let later = start + Duration::from_millis(500);
        app.tick(later);
        terminal.draw(|frame| draw(frame, &mut app, later)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("VITALITY: CRITICAL"));
        assert!(text.contains("12%"));
        assert!(text.contains("Depleting"));
    }

    #[test]
    fn test_draws_tooltip_for_focused_sample() {
        let start = Instant::now();
        let mut app = App::new(Settings::default(), Theme::dark(), start);
        app.focused_sample = Some(4);
        let mut terminal = Terminal::new(TestBackend::new(100, 36)).unwrap();

        terminal.draw(|frame| draw(frame, &mut app, start)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("14:00 value: 15"));
    }

    #[test]
    fn test_small_terminal_message() {
        let start = Instant::now();
        let mut app = App::new(Settings::default(), Theme::dark(), start);
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();

        terminal.draw(|frame| draw(frame, &mut app, start)).unwrap();
        assert!(buffer_text(&terminal).contains("Terminal too small"));
        assert!(app.plot_area.is_none());
    }
}
