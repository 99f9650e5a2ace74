//! Trend chart card: the sample series as a line with a tooltip for the
//! focused sample.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::view::ChartView;

/// Format an axis or tooltip value without a trailing `.0`.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

fn y_labels(chart: &ChartView) -> Vec<String> {
    let [lo, hi] = chart.y_domain;
    vec![format_value(lo), format_value((lo + hi) / 2.0), format_value(hi)]
}

fn x_labels(chart: &ChartView) -> Vec<String> {
    match (chart.points.first(), chart.points.last()) {
        (Some(first), Some(last)) if chart.points.len() > 1 => {
            vec![first.label.clone(), last.label.clone()]
        }
        (Some(only), _) => vec![only.label.clone()],
        _ => Vec::new(),
    }
}

/// Render the chart card and record its plot area on `app` for hover.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let view = app.view();
    let chart_view = &view.chart;
    let line_color = app.theme.severity_color(chart_view.severity);

    let block = Block::default()
        .title(" VITALITY HISTORY ")
        .title(
            Line::from(format!(" {} samples ", chart_view.points.len()))
                .alignment(Alignment::Right),
        )
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);

    let y_labels = y_labels(chart_view);
    let y_label_width = y_labels.iter().map(|l| l.len()).max().unwrap_or(0) as u16 + 1;
    // The bottom row holds the x-axis labels.
    app.plot_area = Some(Rect::new(
        inner.x + y_label_width,
        inner.y,
        inner.width.saturating_sub(y_label_width),
        inner.height.saturating_sub(1),
    ));

    let data = chart_view.data();
    let focused = app
        .focused_sample
        .and_then(|i| chart_view.points.get(i))
        .map(|p| [(p.x, p.value)]);

    let mut datasets = vec![Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(line_color))
        .data(&data)];
    if let Some(ref point) = focused {
        datasets.push(
            Dataset::default()
                .marker(Marker::Block)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(app.theme.needle))
                .data(point),
        );
    }

    let axis_style = Style::default().fg(app.theme.muted);
    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(axis_style)
                .bounds(chart_view.x_domain)
                .labels(x_labels(chart_view)),
        )
        .y_axis(
            Axis::default()
                .style(axis_style)
                .bounds(chart_view.y_domain)
                .labels(y_labels),
        );
    frame.render_widget(chart, area);

    if let Some(index) = app.focused_sample {
        if let Some(tooltip) = chart_view.tooltip(index) {
            render_tooltip(frame, app, &tooltip.label, tooltip.value, index, chart_view);
        }
    }
}

/// Small box above the plot near the focused sample.
fn render_tooltip(
    frame: &mut Frame,
    app: &App,
    label: &str,
    value: f64,
    index: usize,
    chart_view: &ChartView,
) {
    let Some(plot) = app.plot_area else {
        return;
    };
    if plot.width < 4 || plot.height < 3 {
        return;
    }

    let text = Line::from(vec![
        Span::styled(format!("{} ", label), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("value: {}", format_value(value)),
            Style::default().fg(app.theme.severity_color(chart_view.severity)),
        ),
    ]);
    let width = (text.width() as u16 + 2).min(plot.width);
    let height = 3u16;

    let span = (chart_view.x_domain[1] - chart_view.x_domain[0]).max(f64::EPSILON);
    let fraction = chart_view.points[index].x / span;
    let anchor = plot.x + (fraction * plot.width.saturating_sub(1) as f64).round() as u16;
    let x = anchor
        .saturating_sub(width / 2)
        .clamp(plot.x, plot.x + plot.width - width);
    let area = Rect::new(x, plot.y, width, height);

    let tooltip = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.highlight)),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(tooltip, area);
}
