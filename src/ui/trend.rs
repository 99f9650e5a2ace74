//! Direction card: which way the series is heading.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::data::format::display_percent;

/// Large arrows drawn for each direction.
const ARROW_UP: [&str; 3] = ["  ▲  ", " ▲▲▲ ", "  █  "];
const ARROW_FLAT: [&str; 3] = ["     ", "━━━━▶", "     "];
const ARROW_DOWN: [&str; 3] = ["  █  ", " ▼▼▼ ", "  ▼  "];

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let view = app.view();
    let trend = &view.trend;
    let style = app.theme.severity_style(trend.severity);

    let arrow = match trend.direction {
        crate::data::TrendDirection::Rising => ARROW_UP,
        crate::data::TrendDirection::Steady => ARROW_FLAT,
        crate::data::TrendDirection::Falling => ARROW_DOWN,
    };

    let mut lines: Vec<Line> = vec![Line::from("")];
    lines.extend(arrow.iter().map(|row| Line::from(Span::styled(*row, style))));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        trend.label,
        Style::default().add_modifier(Modifier::BOLD),
    )));

    let points = &view.chart.points;
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        lines.push(Line::from(Span::styled(
            format!(
                "{} ({}) {} {} ({})",
                display_percent(first.value),
                first.label,
                trend.direction.arrow(),
                display_percent(last.value),
                last.label
            ),
            Style::default().fg(app.theme.muted),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "No samples",
            Style::default().fg(app.theme.muted),
        )));
    }

    let block = Block::default()
        .title(" DIRECTION ")
        .title(
            Line::from(Span::styled(
                format!(" {} {} ", trend.direction.arrow(), trend.label.to_uppercase()),
                style,
            ))
            .alignment(Alignment::Right),
        )
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
