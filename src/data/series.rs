//! Time series of health samples and the trend derived from it.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::format::clamp_value;

/// Default number of samples retained before the oldest is evicted.
pub const DEFAULT_CAPACITY: usize = 60;

/// Change between first and last sample below which the trend counts as steady.
const STEADY_BAND: f64 = 1.0;

/// Seed readings shown before any live source is attached.
const SEED: [(&str, f64); 9] = [
    ("10:00", 45.0),
    ("11:00", 42.0),
    ("12:00", 38.0),
    ("13:00", 30.0),
    ("14:00", 15.0),
    ("15:00", 5.0),
    ("16:00", 2.0),
    ("17:00", 0.0),
    ("18:00", 0.0),
];

/// A single `(label, value)` reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSample {
    /// Time-of-day tag, e.g. `"14:00"`.
    #[serde(alias = "time")]
    pub label: String,
    pub value: f64,
}

impl HealthSample {
    /// Create a sample, clamping the value into `0..=100`.
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value: clamp_value(value),
        }
    }
}

/// Ordered, bounded sequence of samples.
///
/// Appending beyond capacity evicts the oldest sample.
#[derive(Debug, Clone)]
pub struct SampleSeries {
    samples: VecDeque<HealthSample>,
    capacity: usize,
}

impl Default for SampleSeries {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl SampleSeries {
    /// Create an empty series. A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// The fixed seed sequence.
    pub fn seeded(capacity: usize) -> Self {
        let mut series = Self::with_capacity(capacity);
        for (label, value) in SEED {
            series.push(HealthSample::new(label, value));
        }
        series
    }

    pub fn push(&mut self, sample: HealthSample) {
        self.samples.push_back(HealthSample::new(sample.label, sample.value));
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<&HealthSample> {
        self.samples.back()
    }

    /// Contiguous copy of the samples, oldest first.
    pub fn to_vec(&self) -> Vec<HealthSample> {
        self.samples.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HealthSample> {
        self.samples.iter()
    }
}

/// Overall direction of a series ("asset direction").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Rising,
    Steady,
    Falling,
}

impl TrendDirection {
    /// Compare the last sample with the first one.
    pub fn of(samples: &[HealthSample]) -> Self {
        let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
            return TrendDirection::Steady;
        };
        let delta = last.value - first.value;
        if delta > STEADY_BAND {
            TrendDirection::Rising
        } else if delta < -STEADY_BAND {
            TrendDirection::Falling
        } else {
            TrendDirection::Steady
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrendDirection::Rising => "Recovering",
            TrendDirection::Steady => "Steady",
            TrendDirection::Falling => "Depleting",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            TrendDirection::Rising => "↑",
            TrendDirection::Steady => "→",
            TrendDirection::Falling => "↓",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_sequence() {
        let series = SampleSeries::seeded(DEFAULT_CAPACITY);
        let values: Vec<f64> = series.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![45.0, 42.0, 38.0, 30.0, 15.0, 5.0, 2.0, 0.0, 0.0]);
        assert_eq!(series.iter().next().unwrap().label, "10:00");
        assert_eq!(series.latest().unwrap().label, "18:00");
    }

    #[test]
    fn test_push_evicts_oldest() {
        let mut series = SampleSeries::with_capacity(3);
        for (i, v) in [1.0, 2.0, 3.0, 4.0].into_iter().enumerate() {
            series.push(HealthSample::new(format!("t{}", i), v));
        }
        assert_eq!(series.len(), 3);
        let labels: Vec<&str> = series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["t1", "t2", "t3"]);
    }

    #[test]
    fn test_seeded_respects_small_capacity() {
        let series = SampleSeries::seeded(4);
        assert_eq!(series.len(), 4);
        assert_eq!(series.iter().next().unwrap().label, "15:00");
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut series = SampleSeries::with_capacity(0);
        series.push(HealthSample::new("a", 1.0));
        series.push(HealthSample::new("b", 2.0));
        assert_eq!(series.len(), 1);
        assert_eq!(series.latest().unwrap().label, "b");
    }

    #[test]
    fn test_sample_clamps() {
        assert_eq!(HealthSample::new("x", 250.0).value, 100.0);
        assert_eq!(HealthSample::new("x", -1.0).value, 0.0);
    }

    #[test]
    fn test_sample_accepts_time_alias() {
        let sample: HealthSample = serde_json::from_str(r#"{"time":"10:00","value":45}"#).unwrap();
        assert_eq!(sample, HealthSample::new("10:00", 45.0));
    }

    #[test]
    fn test_trend_direction() {
        let seed = SampleSeries::seeded(DEFAULT_CAPACITY).to_vec();
        assert_eq!(TrendDirection::of(&seed), TrendDirection::Falling);
        assert_eq!(TrendDirection::of(&[]), TrendDirection::Steady);

        let rising = vec![HealthSample::new("a", 10.0), HealthSample::new("b", 40.0)];
        assert_eq!(TrendDirection::of(&rising), TrendDirection::Rising);

        let flat = vec![HealthSample::new("a", 10.0), HealthSample::new("b", 10.5)];
        assert_eq!(TrendDirection::of(&flat), TrendDirection::Steady);
    }
}
