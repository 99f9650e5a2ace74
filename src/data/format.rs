//! Value formatting: health value to needle angle, severity tier and text.
//!
//! Every function here is total. Out-of-range input is clamped into
//! `[MIN_VALUE, MAX_VALUE]` rather than rejected, because the value always
//! comes from internal state.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Lowest representable health value.
pub const MIN_VALUE: f64 = 0.0;
/// Highest representable health value.
pub const MAX_VALUE: f64 = 100.0;

/// Needle sweep of the semicircular gauge, in degrees.
const SWEEP_DEG: f64 = 180.0;

/// Clamp a health value into range. NaN maps to [`MIN_VALUE`].
pub fn clamp_value(value: f64) -> f64 {
    if value.is_nan() {
        MIN_VALUE
    } else {
        value.clamp(MIN_VALUE, MAX_VALUE)
    }
}

/// Needle angle in degrees for a health value: `-90` at 0, `0` at 50, `+90` at 100.
pub fn angle_for_value(value: f64) -> f64 {
    (clamp_value(value) / MAX_VALUE) * SWEEP_DEG - SWEEP_DEG / 2.0
}

/// Inverse of [`angle_for_value`], used to colour positions along the dial.
pub fn value_for_angle(angle_deg: f64) -> f64 {
    clamp_value((angle_deg + SWEEP_DEG / 2.0) / SWEEP_DEG * MAX_VALUE)
}

/// Classify a health value against the configured cut points.
pub fn severity_for_value(value: f64, thresholds: &Thresholds) -> SeverityTier {
    let value = clamp_value(value);
    if value <= thresholds.critical_max {
        SeverityTier::Critical
    } else if value <= thresholds.weak_max {
        SeverityTier::Weak
    } else {
        SeverityTier::Healthy
    }
}

/// Clamped value rounded to an integer with a `%` suffix.
pub fn display_percent(value: f64) -> String {
    format!("{}%", clamp_value(value).round() as i64)
}

/// Cut points for severity classification.
///
/// Values up to and including `critical_max` are critical, values up to and
/// including `weak_max` are weak, everything above is healthy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Highest value still classified as critical.
    pub critical_max: f64,
    /// Highest value still classified as weak.
    pub weak_max: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            critical_max: 20.0,
            weak_max: 60.0,
        }
    }
}

impl Thresholds {
    /// Reject cut points that would leave a tier empty or out of range.
    pub fn validate(&self) -> Result<()> {
        let in_range = |v: f64| (MIN_VALUE..=MAX_VALUE).contains(&v);
        if !in_range(self.critical_max) || !in_range(self.weak_max) {
            bail!(
                "Severity thresholds must lie within {}..={} (got critical_max={}, weak_max={})",
                MIN_VALUE,
                MAX_VALUE,
                self.critical_max,
                self.weak_max
            );
        }
        if self.critical_max >= self.weak_max {
            bail!(
                "critical_max ({}) must be below weak_max ({})",
                self.critical_max,
                self.weak_max
            );
        }
        Ok(())
    }
}

/// Severity classification derived from a health value. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeverityTier {
    Healthy,
    Weak,
    Critical,
}

impl SeverityTier {
    /// Upper-case label shown on the gauge and in the header.
    pub fn label(&self) -> &'static str {
        match self {
            SeverityTier::Healthy => "HEALTHY",
            SeverityTier::Weak => "WEAK",
            SeverityTier::Critical => "CRITICAL",
        }
    }

    /// Short caption shown under the percentage.
    pub fn caption(&self) -> &'static str {
        match self {
            SeverityTier::Healthy => "Energy nominal",
            SeverityTier::Weak => "Energy reduced",
            SeverityTier::Critical => "Energy low",
        }
    }
}

impl std::fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
