//! Pure mapping from data to a displayable view tree.
//!
//! [`render`] is what the terminal painter consumes. It holds no state, so
//! calling it twice with the same inputs yields equal trees. Every widget's
//! severity is derived here from the one health value.

use serde::Serialize;

use crate::data::format::{angle_for_value, display_percent, severity_for_value};
use crate::data::{HealthSample, HealthState, SeverityTier, Thresholds, TrendDirection};
use crate::settings::{ChartSettings, Settings};

/// Everything the painter needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewTree {
    pub headline: String,
    pub severity: SeverityTier,
    pub gauge: GaugeView,
    pub trend: TrendView,
    pub chart: ChartView,
}

/// Vitality gauge: needle angle plus textual severity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeView {
    pub angle_deg: f64,
    pub severity: SeverityTier,
    pub display_text: String,
    pub caption: &'static str,
}

impl GaugeView {
    pub fn from_state(state: &HealthState, thresholds: &Thresholds) -> Self {
        let severity = severity_for_value(state.value(), thresholds);
        Self {
            angle_deg: angle_for_value(state.value()),
            severity,
            display_text: display_percent(state.value()),
            caption: severity.caption(),
        }
    }
}

/// Direction card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendView {
    pub direction: TrendDirection,
    pub label: &'static str,
    pub severity: SeverityTier,
}

/// One plotted point. `x` is the sample's position in the series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: f64,
    pub label: String,
    pub value: f64,
}

/// The `(label, value)` pair revealed for the focused sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub label: String,
    pub value: f64,
}

/// Line chart over the series with a fixed vertical domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub points: Vec<ChartPoint>,
    pub x_domain: [f64; 2],
    pub y_domain: [f64; 2],
    pub severity: SeverityTier,
}

impl ChartView {
    /// Build the chart. The vertical domain is taken as given and never
    /// fitted to the data.
    pub fn from_samples(samples: &[HealthSample], y_domain: [f64; 2], severity: SeverityTier) -> Self {
        let points: Vec<ChartPoint> = samples
            .iter()
            .enumerate()
            .map(|(i, s)| ChartPoint {
                x: i as f64,
                label: s.label.clone(),
                value: s.value,
            })
            .collect();

        // A single point still needs a non-empty x range to be drawn.
        let x_max = (points.len().saturating_sub(1) as f64).max(1.0);

        Self {
            points,
            x_domain: [0.0, x_max],
            y_domain,
            severity,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn tooltip(&self, index: usize) -> Option<Tooltip> {
        self.points.get(index).map(|p| Tooltip {
            label: p.label.clone(),
            value: p.value,
        })
    }

    /// Sample nearest to a horizontal position, given as a fraction
    /// (`0.0` left edge, `1.0` right edge) of the plot width.
    pub fn nearest_index(&self, fraction: f64) -> Option<usize> {
        if self.points.is_empty() || !fraction.is_finite() {
            return None;
        }
        let x = fraction.clamp(0.0, 1.0) * (self.x_domain[1] - self.x_domain[0]);
        let index = x.round() as usize;
        Some(index.min(self.points.len() - 1))
    }

    /// `(x, value)` pairs in the form ratatui datasets expect.
    pub fn data(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.x, p.value)).collect()
    }
}

/// Renders with configured thresholds and chart domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Renderer {
    pub thresholds: Thresholds,
    pub chart: ChartSettings,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            chart: ChartSettings::default(),
        }
    }
}

impl Renderer {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            thresholds: settings.severity,
            chart: settings.chart,
        }
    }

    pub fn render(&self, state: &HealthState, samples: &[HealthSample]) -> ViewTree {
        let gauge = GaugeView::from_state(state, &self.thresholds);
        let severity = gauge.severity;
        let direction = TrendDirection::of(samples);

        ViewTree {
            headline: format!("VITALITY: {}", severity.label()),
            severity,
            trend: TrendView {
                direction,
                label: direction.label(),
                severity,
            },
            chart: ChartView::from_samples(samples, self.chart.domain(), severity),
            gauge,
        }
    }
}

/// Render with default thresholds and the fixed `[0, 60]` chart domain.
pub fn render(state: &HealthState, samples: &[HealthSample]) -> ViewTree {
    Renderer::default().render(state, samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SampleSeries;

    fn seed() -> Vec<HealthSample> {
        SampleSeries::seeded(60).to_vec()
    }

    #[test]
    fn test_render_is_idempotent() {
        let state = HealthState::new(12.0);
        let samples = seed();
        assert_eq!(render(&state, &samples), render(&state, &samples));
    }

    #[test]
    fn test_gauge_view() {
        let view = render(&HealthState::new(12.0), &seed());
        assert_eq!(view.gauge.angle_deg, angle_for_value(12.0));
        assert_eq!(view.gauge.severity, SeverityTier::Critical);
        assert_eq!(view.gauge.display_text, "12%");
        assert_eq!(view.headline, "VITALITY: CRITICAL");

        let view = render(&HealthState::new(100.0), &seed());
        assert_eq!(view.gauge.angle_deg, 90.0);
        assert_eq!(view.severity, SeverityTier::Healthy);
    }

    #[test]
    fn test_widgets_share_one_severity() {
        let view = render(&HealthState::new(45.0), &seed());
        assert_eq!(view.gauge.severity, SeverityTier::Weak);
        assert_eq!(view.trend.severity, SeverityTier::Weak);
        assert_eq!(view.chart.severity, SeverityTier::Weak);
    }

    #[test]
    fn test_chart_domain_fixed_regardless_of_data() {
        let view = render(&HealthState::new(12.0), &seed());
        assert_eq!(view.chart.y_domain, [0.0, 60.0]);

        let tail: Vec<HealthSample> = seed().into_iter().skip(6).collect();
        let max = tail.iter().map(|s| s.value).fold(0.0, f64::max);
        assert_eq!(max, 2.0);
        assert_eq!(render(&HealthState::new(12.0), &tail).chart.y_domain, [0.0, 60.0]);
    }

    #[test]
    fn test_configured_chart_domain() {
        let mut settings = Settings::default();
        settings.chart = ChartSettings {
            y_min: 0.0,
            y_max: 100.0,
        };
        let view = Renderer::from_settings(&settings).render(&HealthState::new(12.0), &seed());
        assert_eq!(view.chart.y_domain, [0.0, 100.0]);
    }

    #[test]
    fn test_empty_series_renders_empty_chart() {
        let view = render(&HealthState::new(12.0), &[]);
        assert!(view.chart.is_empty());
        assert!(view.chart.tooltip(0).is_none());
        assert!(view.chart.nearest_index(0.5).is_none());
        assert_eq!(view.trend.direction, TrendDirection::Steady);
    }

    #[test]
    fn test_tooltip_reveals_exact_pair() {
        let view = render(&HealthState::new(12.0), &seed());
        assert_eq!(
            view.chart.tooltip(4),
            Some(Tooltip {
                label: "14:00".to_string(),
                value: 15.0
            })
        );
        assert!(view.chart.tooltip(9).is_none());
    }

    #[test]
    fn test_nearest_index() {
        let chart = render(&HealthState::new(12.0), &seed()).chart;
        assert_eq!(chart.nearest_index(0.0), Some(0));
        assert_eq!(chart.nearest_index(1.0), Some(8));
        assert_eq!(chart.nearest_index(0.5), Some(4));
        assert_eq!(chart.nearest_index(7.0), Some(8));

        let single = ChartView::from_samples(&seed()[..1], [0.0, 60.0], SeverityTier::Critical);
        assert_eq!(single.nearest_index(1.0), Some(0));
    }

    #[test]
    fn test_trend_view_for_seed() {
        let view = render(&HealthState::new(12.0), &seed());
        assert_eq!(view.trend.direction, TrendDirection::Falling);
        assert_eq!(view.trend.label, "Depleting");
    }

    #[test]
    fn test_view_tree_serializes() {
        let json = serde_json::to_value(render(&HealthState::new(12.0), &seed())).unwrap();
        assert_eq!(json["gauge"]["severity"], "CRITICAL");
        assert_eq!(json["trend"]["direction"], "falling");
        assert_eq!(json["chart"]["points"].as_array().unwrap().len(), 9);
    }
}
