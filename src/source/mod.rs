//! Sources of live health samples.
//!
//! By default the dashboard runs a one-shot transition against the seed
//! series. Attaching a [`HealthDataSource`] to the controller replaces that
//! timer with real telemetry.

mod channel;
mod file;
mod stream;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use stream::StreamSource;

use std::fmt::Debug;

use crate::data::HealthSample;

/// A provider of health samples polled from the UI thread.
///
/// # Example
///
/// ```
/// use vitality_monitor::{ChannelSource, HealthDataSource, HealthSample};
///
/// let (tx, mut source) = ChannelSource::create("test");
/// tx.send(Some(HealthSample::new("10:00", 42.0))).unwrap();
/// assert_eq!(source.poll().map(|s| s.value), Some(42.0));
/// ```
pub trait HealthDataSource: Send + Debug {
    /// Next pending sample, if any. Must not block.
    fn poll(&mut self) -> Option<HealthSample>;

    /// Human-readable description shown in the status bar.
    fn description(&self) -> &str;

    /// Last error encountered by the source, if it is currently failing.
    fn error(&self) -> Option<String>;
}
