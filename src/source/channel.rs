//! Channel-based source.
//!
//! A producer pushes samples through a tokio `watch` channel. Only the most
//! recent sample is kept, so a slow UI skips intermediate readings rather than
//! falling behind.

use tokio::sync::watch;

use super::HealthDataSource;
use crate::data::HealthSample;

#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<Option<HealthSample>>,
    description: String,
    closed: bool,
}

impl ChannelSource {
    pub fn new(receiver: watch::Receiver<Option<HealthSample>>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
            closed: false,
        }
    }

    /// Create a sender/source pair.
    pub fn create(source_description: &str) -> (watch::Sender<Option<HealthSample>>, Self) {
        let (tx, rx) = watch::channel(None);
        (tx, Self::new(rx, source_description))
    }
}

impl HealthDataSource for ChannelSource {
    fn poll(&mut self) -> Option<HealthSample> {
        match self.receiver.has_changed() {
            Ok(true) => self.receiver.borrow_and_update().clone(),
            Ok(false) => None,
            Err(_) => {
                self.closed = true;
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.closed.then(|| "Sender dropped".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create("test");

        // Nothing sent yet
        assert!(source.poll().is_none());

        tx.send(Some(HealthSample::new("10:00", 30.0))).unwrap();
        assert_eq!(source.poll(), Some(HealthSample::new("10:00", 30.0)));

        // Already seen
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_channel_source_keeps_latest_only() {
        let (tx, mut source) = ChannelSource::create("test");
        tx.send(Some(HealthSample::new("a", 1.0))).unwrap();
        tx.send(Some(HealthSample::new("b", 2.0))).unwrap();

        assert_eq!(source.poll().unwrap().label, "b");
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_channel_source_reports_closed() {
        let (tx, mut source) = ChannelSource::create("bus");
        assert_eq!(source.description(), "channel: bus");
        drop(tx);

        assert!(source.poll().is_none());
        assert_eq!(source.error().as_deref(), Some("Sender dropped"));
    }
}
