//! The single mutable health value.

use serde::Serialize;

use super::format::clamp_value;

/// Current health value, always within `0..=100`.
///
/// The field is private so the range invariant holds for every instance:
/// construction and assignment both clamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HealthState {
    value: f64,
}

impl HealthState {
    pub fn new(value: f64) -> Self {
        Self {
            value: clamp_value(value),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Assign a new value (clamped). Returns true if the stored value changed.
    pub(crate) fn set(&mut self, value: f64) -> bool {
        let value = clamp_value(value);
        let changed = value != self.value;
        self.value = value;
        changed
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new(100.0)
    }
}
