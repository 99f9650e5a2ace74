//! # vitality-monitor
//!
//! A terminal dashboard for a single health value: a semicircular vitality
//! gauge, a severity tier shared by every widget, a direction card and a
//! history chart.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Application                          │
//! │  ┌────────────┐    ┌──────────┐    ┌─────────┐   ┌─────────┐ │
//! │  │ controller │───▶│   view   │───▶│   ui    │──▶│Terminal │ │
//! │  │  (state)   │    │ (render) │    │(ratatui)│   │         │ │
//! │  └─────┬──────┘    └──────────┘    └─────────┘   └─────────┘ │
//! │        │                                                     │
//! │        ▼                                                     │
//! │  ┌─────────┐                                                 │
//! │  │ source  │◀── ChannelSource | FileSource | StreamSource    │
//! │  └─────────┘                                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`data`]**: value formatting (angle, tier, percent), [`HealthState`],
//!   [`SampleSeries`]
//! - **[`controller`]**: the single writer of state; one-shot transition with
//!   cancellation, or a live [`HealthDataSource`] subscription
//! - **[`view`]**: pure [`render`] from state and samples to a [`ViewTree`]
//! - **[`ui`]**: ratatui painting of the view tree
//! - **[`settings`]**: layered configuration
//!
//! ## Usage
//!
//! ```
//! use vitality_monitor::{render, HealthState, SampleSeries, SeverityTier};
//!
//! let samples = SampleSeries::seeded(60).to_vec();
//! let view = render(&HealthState::new(12.0), &samples);
//!
//! assert_eq!(view.gauge.display_text, "12%");
//! assert_eq!(view.gauge.severity, SeverityTier::Critical);
//! assert_eq!(view.chart.y_domain, [0.0, 60.0]);
//! ```

pub mod app;
pub mod controller;
pub mod data;
pub mod events;
pub mod settings;
pub mod source;
pub mod ui;
pub mod view;

pub use app::App;
pub use controller::{DashboardController, DisposalToken, Phase};
pub use data::format::{angle_for_value, display_percent, severity_for_value};
pub use data::{HealthSample, HealthState, SampleSeries, SeverityTier, Thresholds, TrendDirection};
pub use settings::Settings;
pub use source::{ChannelSource, FileSource, HealthDataSource, StreamSource};
pub use view::{render, Renderer, ViewTree};
