//! Common UI components: header bar, severity banner, status bar and help.

use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::controller::Phase;
use crate::data::duration::format_duration;
use crate::view::ViewTree;

/// Header bar: overall tier and where values come from.
pub fn render_header(frame: &mut Frame, app: &App, view: &ViewTree, area: Rect, now: Instant) {
    let tier_style = app.theme.severity_style(view.severity);

    let source = match app.controller.phase() {
        Phase::Initial => match app.controller.time_until_transition(now) {
            Some(left) => format!("seed data, update in {}", format_duration(left)),
            None => "seed data".to_string(),
        },
        Phase::Degraded => "seed data".to_string(),
        Phase::Live => app
            .controller
            .source_description()
            .unwrap_or("live")
            .to_string(),
        Phase::TornDown => "stopped".to_string(),
    };

    let line = Line::from(vec![
        Span::styled(" ● ", tier_style),
        Span::styled("VITALITY MONITOR ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(view.gauge.display_text.clone(), tier_style),
        Span::raw(" "),
        Span::styled(view.severity.label(), tier_style),
        Span::raw(" │ "),
        Span::raw(format!("{} {}", view.trend.direction.arrow(), view.trend.label)),
        Span::raw(" │ "),
        Span::styled(source, Style::default().add_modifier(Modifier::DIM)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Banner stating the current tier, coloured by it.
pub fn render_banner(frame: &mut Frame, app: &App, view: &ViewTree, area: Rect) {
    let color = app.theme.severity_color(view.severity);
    let text = Line::from(vec![
        Span::styled(
            view.headline.clone(),
            app.theme.severity_style(view.severity).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "   current {} · trend {}",
            view.gauge.display_text,
            view.trend.label.to_lowercase()
        )),
    ]);

    let banner = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(color)),
    );
    frame.render_widget(banner, area);
}

/// Status bar: temporary messages, source errors, or key hints.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(err) = app.controller.source_error() {
        let paragraph = Paragraph::new(format!(" Source error: {} | q:quit", err))
            .style(Style::default().fg(app.theme.weak));
        frame.render_widget(paragraph, area);
        return;
    }

    let focus = match app.focused_sample {
        Some(i) => format!("sample {}/{} | ", i + 1, app.controller.series().len()),
        None => String::new(),
    };
    let status = format!(
        " {}←/→:inspect sample  c:clear  r:replay  e:export  ?:help  q:quit",
        focus
    );
    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Help overlay with keyboard shortcuts, centered over `area`.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Chart",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→ h/l     Previous/next sample"),
        Line::from("  Home/End    First/last sample"),
        Line::from("  mouse       Hover to inspect"),
        Line::from("  c           Clear tooltip"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Replay (remount dashboard)"),
        Line::from("  e         Export view to JSON"),
        Line::from("  q / Esc   Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 17u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
