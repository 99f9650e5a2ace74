//! Vitality gauge card: semicircular dial, needle, percentage and tier.

use std::time::{Duration, Instant};

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine, Points},
        Block, Borders, Paragraph,
    },
    Frame,
};

use crate::app::App;
use crate::data::format::{severity_for_value, value_for_angle};
use crate::data::SeverityTier;

/// Radius of the dial in canvas units.
const DIAL_RADIUS: f64 = 1.0;
/// Needle length relative to the dial.
const NEEDLE_LENGTH: f64 = 0.8;
/// Angular resolution of the dial, in degrees.
const DIAL_STEP_DEG: f64 = 1.5;

/// Eased needle movement between two angles.
///
/// The displayed angle is continuous in time: retargeting mid-flight starts
/// the new movement from wherever the needle currently is.
#[derive(Debug, Clone, Copy)]
pub struct NeedleAnimation {
    from: f64,
    to: f64,
    started: Instant,
    duration: Duration,
}

impl NeedleAnimation {
    /// A needle resting at `angle`.
    pub fn at_rest(angle: f64, duration: Duration, now: Instant) -> Self {
        Self {
            from: angle,
            to: angle,
            started: now,
            duration,
        }
    }

    /// Start moving toward `target` from the current position.
    pub fn retarget(&mut self, target: f64, now: Instant) {
        self.from = self.angle_at(now);
        self.to = target;
        self.started = now;
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    pub fn is_settled(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        (elapsed / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Displayed angle at `now`, eased out cubically.
    pub fn angle_at(&self, now: Instant) -> f64 {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        let eased = 1.0 - (1.0 - t).powi(3);
        self.from + (self.to - self.from) * eased
    }
}

/// Point on the dial for a needle angle (0° points straight up).
fn polar(angle_deg: f64, radius: f64) -> (f64, f64) {
    let rad = angle_deg.to_radians();
    (radius * rad.sin(), radius * rad.cos())
}

/// Dial positions grouped by the severity of the value they encode.
fn dial_segments(app: &App) -> [(SeverityTier, Vec<(f64, f64)>); 3] {
    let mut segments = [
        (SeverityTier::Critical, Vec::new()),
        (SeverityTier::Weak, Vec::new()),
        (SeverityTier::Healthy, Vec::new()),
    ];

    let steps = (180.0 / DIAL_STEP_DEG) as usize;
    for step in 0..=steps {
        let angle = -90.0 + step as f64 * DIAL_STEP_DEG;
        let tier = severity_for_value(value_for_angle(angle), &app.renderer.thresholds);
        if let Some((_, points)) = segments.iter_mut().find(|(t, _)| *t == tier) {
            points.push(polar(angle, DIAL_RADIUS));
            points.push(polar(angle, DIAL_RADIUS * 0.92));
        }
    }
    segments
}

/// Render the gauge card.
pub fn render(frame: &mut Frame, app: &App, area: Rect, now: Instant) {
    let view = app.view();
    let gauge = &view.gauge;
    let tier_style = app.theme.severity_style(gauge.severity);

    let block = Block::default()
        .title(" VITALITY ")
        .title(
            Line::from(Span::styled(format!(" {} ", gauge.severity.label()), tier_style))
                .alignment(Alignment::Right),
        )
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.severity_color(gauge.severity)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Min(4),    // Dial
        Constraint::Length(1), // Percentage
        Constraint::Length(1), // Caption
    ])
    .split(inner);

    let segments = dial_segments(app);
    let needle_angle = app.needle.angle_at(now);
    let (tip_x, tip_y) = polar(needle_angle, NEEDLE_LENGTH);
    let theme = &app.theme;

    let dial = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([-1.2, 1.2])
        .y_bounds([-0.25, 1.1])
        .paint(|ctx| {
            for (tier, points) in &segments {
                ctx.draw(&Points {
                    coords: points,
                    color: theme.severity_color(*tier),
                });
            }
            ctx.layer();
            ctx.draw(&CanvasLine {
                x1: 0.0,
                y1: 0.0,
                x2: tip_x,
                y2: tip_y,
                color: theme.needle,
            });
            ctx.draw(&Circle {
                x: 0.0,
                y: 0.0,
                radius: 0.05,
                color: theme.needle,
            });
            ctx.print(
                -1.15,
                -0.2,
                Span::styled("CRITICAL", theme.severity_style(SeverityTier::Critical)),
            );
            ctx.print(
                0.7,
                -0.2,
                Span::styled("HEALTHY", Style::default().fg(theme.muted)),
            );
        });
    frame.render_widget(dial, chunks[0]);

    let percent = Paragraph::new(Line::from(Span::styled(
        gauge.display_text.clone(),
        tier_style.add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(percent, chunks[1]);

    let caption = Paragraph::new(Line::from(Span::styled(
        gauge.caption.to_uppercase(),
        Style::default().fg(theme.muted),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(caption, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn test_animation_endpoints() {
        let start = Instant::now();
        let mut needle = NeedleAnimation::at_rest(90.0, SECOND, start);
        assert_eq!(needle.angle_at(start), 90.0);

        needle.retarget(-68.4, start);
        assert_eq!(needle.angle_at(start), 90.0);
        assert_eq!(needle.angle_at(start + SECOND), -68.4);
        assert_eq!(needle.angle_at(start + SECOND * 3), -68.4);
        assert!(needle.is_settled(start + SECOND));
        assert!(!needle.is_settled(start + SECOND / 2));
    }

    #[test]
    fn test_animation_is_continuous_and_monotonic() {
        let start = Instant::now();
        let mut needle = NeedleAnimation::at_rest(90.0, SECOND, start);
        needle.retarget(-90.0, start);

        let mut previous = needle.angle_at(start);
        for ms in 1..=1000 {
            let angle = needle.angle_at(start + Duration::from_millis(ms));
            assert!(angle <= previous, "needle moved backwards at {}ms", ms);
            // Ease-out cubic has max slope 3x the linear rate: 180°/s * 3 = 0.54°/ms
            assert!(previous - angle <= 0.55, "jump of {}° at {}ms", previous - angle, ms);
            previous = angle;
        }
    }

    #[test]
    fn test_retarget_mid_flight_starts_from_current_angle() {
        let start = Instant::now();
        let mut needle = NeedleAnimation::at_rest(0.0, SECOND, start);
        needle.retarget(90.0, start);

        let mid = start + SECOND / 2;
        let current = needle.angle_at(mid);
        needle.retarget(-90.0, mid);
        assert_eq!(needle.angle_at(mid), current);
        assert_eq!(needle.target(), -90.0);
    }

    #[test]
    fn test_polar() {
        let (x, y) = polar(0.0, 1.0);
        assert!(x.abs() < 1e-12 && (y - 1.0).abs() < 1e-12);
        let (x, y) = polar(-90.0, 1.0);
        assert!((x + 1.0).abs() < 1e-12 && y.abs() < 1e-12);
    }
}
