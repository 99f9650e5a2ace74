//! Layered configuration.
//!
//! Settings are resolved from built-in defaults, an optional TOML file and
//! `VITALITY_*` environment variables, in that order. CLI flags are applied on
//! top by `main`.
//!
//! ```toml
//! [transition]
//! delay = "500ms"
//! initial = 100
//! degraded = 12
//!
//! [severity]
//! critical_max = 20
//! weak_max = 60
//!
//! [chart]
//! y_min = 0
//! y_max = 60
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::duration;
use crate::data::Thresholds;

/// Prefix for environment overrides, e.g. `VITALITY_SEVERITY__CRITICAL_MAX=25`.
const ENV_PREFIX: &str = "VITALITY";

/// Complete application settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub transition: TransitionSettings,
    pub severity: Thresholds,
    pub chart: ChartSettings,
    pub series: SeriesSettings,
    pub animation: AnimationSettings,
}

/// The one-shot transition armed when the dashboard mounts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TransitionSettings {
    #[serde(deserialize_with = "duration::deserialize")]
    pub delay: Duration,
    /// Value shown at mount.
    pub initial: f64,
    /// Value applied when the transition fires.
    pub degraded: f64,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(500),
            initial: 100.0,
            degraded: 12.0,
        }
    }
}

/// Vertical domain of the trend chart.
///
/// Fixed at `0..=60` by default whatever the data range is.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            y_min: 0.0,
            y_max: 60.0,
        }
    }
}

impl ChartSettings {
    pub fn domain(&self) -> [f64; 2] {
        [self.y_min, self.y_max]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SeriesSettings {
    /// Samples retained before the oldest is evicted.
    pub capacity: usize,
}

impl Default for SeriesSettings {
    fn default() -> Self {
        Self {
            capacity: crate::data::series::DEFAULT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Time the gauge needle takes to travel to a new angle.
    #[serde(deserialize_with = "duration::deserialize")]
    pub needle: Duration,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            needle: Duration::from_secs(1),
        }
    }
}

impl Settings {
    /// Load settings from an optional file plus the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(env.prefix_separator("_").separator("__").try_parsing(true))
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        self.severity.validate()?;

        let chart = &self.chart;
        if !chart.y_min.is_finite() || !chart.y_max.is_finite() || chart.y_min >= chart.y_max {
            bail!(
                "Chart domain must satisfy y_min < y_max (got {}..{})",
                chart.y_min,
                chart.y_max
            );
        }
        if self.series.capacity == 0 {
            bail!("Series capacity must be at least 1");
        }
        if self.animation.needle.is_zero() {
            bail!("Needle animation duration must be greater than zero");
        }
        Ok(())
    }
}
