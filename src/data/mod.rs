//! Health data model and the pure functions over it.
//!
//! ## Submodules
//!
//! - [`format`]: value to needle angle, severity tier and display text
//! - [`state`]: the clamped [`HealthState`] owned by the controller
//! - [`series`]: bounded [`SampleSeries`] and [`TrendDirection`]
//! - [`duration`]: duration strings used by settings and CLI
//!
//! ## Data Flow
//!
//! ```text
//! HealthDataSource / one-shot timer
//!        │
//!        ▼
//! DashboardController ──▶ HealthState + SampleSeries
//!        │
//!        ▼
//! view::render() ──▶ ViewTree ──▶ ui (ratatui)
//! ```

pub mod duration;
pub mod format;
pub mod series;
pub mod state;

pub use format::{SeverityTier, Thresholds};
pub use series::{HealthSample, SampleSeries, TrendDirection};
pub use state::HealthState;
