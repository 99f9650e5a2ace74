//! Dashboard controller: the single writer of [`HealthState`].
//!
//! At mount the controller shows the initial value and arms one deferred
//! transition to the degraded value. Time never advances on its own: the host
//! calls [`DashboardController::tick`] with the current instant from the UI
//! thread, which keeps the transition ordered after the first draw and lets
//! tests drive a virtual clock.
//!
//! ```
//! use std::time::{Duration, Instant};
//! use vitality_monitor::{DashboardController, Settings};
//!
//! let start = Instant::now();
//! let mut controller = DashboardController::mount(&Settings::default(), start);
//! assert_eq!(controller.state().value(), 100.0);
//!
//! controller.tick(start + Duration::from_millis(500));
//! assert_eq!(controller.state().value(), 12.0);
//! ```

use std::time::{Duration, Instant};

use crate::data::{HealthSample, HealthState, SampleSeries};
use crate::settings::Settings;
use crate::source::HealthDataSource;

/// Handle for a scheduled transition or a subscription, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisposalToken(u64);

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Showing the value set at mount; a transition may be pending.
    Initial,
    /// The one-shot transition has fired.
    Degraded,
    /// Values come from a subscribed [`HealthDataSource`].
    Live,
    /// Torn down; state is frozen.
    TornDown,
}

#[derive(Debug)]
struct DeferredTransition {
    token: DisposalToken,
    deadline: Instant,
    target: f64,
}

#[derive(Debug)]
struct Subscription {
    token: DisposalToken,
    source: Box<dyn HealthDataSource>,
}

#[derive(Debug)]
pub struct DashboardController {
    state: HealthState,
    series: SampleSeries,
    phase: Phase,
    pending: Option<DeferredTransition>,
    subscription: Option<Subscription>,
    next_token: u64,
    /// Incremented on every mutation of state, series or source error.
    revision: u64,
    source_error: Option<String>,
}

impl DashboardController {
    /// Build the controller for a freshly mounted view and arm the transition.
    pub fn mount(settings: &Settings, now: Instant) -> Self {
        let mut controller = Self {
            state: HealthState::new(settings.transition.initial),
            series: SampleSeries::seeded(settings.series.capacity),
            phase: Phase::Initial,
            pending: None,
            subscription: None,
            next_token: 0,
            revision: 0,
            source_error: None,
        };
        controller.schedule_once(settings.transition.delay, settings.transition.degraded, now);
        controller
    }

    pub fn state(&self) -> &HealthState {
        &self.state
    }

    pub fn series(&self) -> &SampleSeries {
        &self.series
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Changes whenever anything the view shows from the controller changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Time left before the pending transition fires, if one is armed.
    pub fn time_until_transition(&self, now: Instant) -> Option<Duration> {
        self.pending.as_ref().map(|p| p.deadline.saturating_duration_since(now))
    }

    /// Description of the subscribed source, if any.
    pub fn source_description(&self) -> Option<&str> {
        self.subscription.as_ref().map(|s| s.source.description())
    }

    /// Last error reported by the subscribed source.
    pub fn source_error(&self) -> Option<&str> {
        self.source_error.as_deref()
    }

    fn issue_token(&mut self) -> DisposalToken {
        self.next_token += 1;
        DisposalToken(self.next_token)
    }

    /// Arm a transition to `target` after `delay`. Replaces any pending one.
    ///
    /// After teardown nothing is armed and the returned token is inert.
    pub fn schedule_once(&mut self, delay: Duration, target: f64, now: Instant) -> DisposalToken {
        let token = self.issue_token();
        if self.phase == Phase::TornDown {
            tracing::debug!("schedule after teardown ignored");
            return token;
        }
        if let Some(previous) = self.pending.take() {
            tracing::debug!(token = previous.token.0, "replacing pending transition");
        }
        self.pending = Some(DeferredTransition {
            token,
            deadline: now + delay,
            target,
        });
        tracing::debug!(token = token.0, delay_ms = delay.as_millis() as u64, to = target, "transition armed");
        token
    }

    /// Attach a live source, cancelling any pending one-shot transition.
    ///
    /// Replaces a previous subscription. The returned token unsubscribes.
    pub fn subscribe(&mut self, source: Box<dyn HealthDataSource>) -> DisposalToken {
        let token = self.issue_token();
        if self.phase == Phase::TornDown {
            tracing::debug!("subscribe after teardown ignored");
            return token;
        }
        if let Some(pending) = self.pending.take() {
            tracing::debug!(token = pending.token.0, "live source supersedes transition");
        }
        tracing::info!(source = source.description(), "subscribed to health source");
        self.subscription = Some(Subscription { token, source });
        token
    }

    /// Cancel the transition or subscription identified by `token`.
    ///
    /// Returns false if the token is unknown or already spent.
    pub fn cancel(&mut self, token: DisposalToken) -> bool {
        if self.pending.as_ref().is_some_and(|p| p.token == token) {
            self.pending = None;
            tracing::debug!(token = token.0, "transition cancelled");
            return true;
        }
        if self.subscription.as_ref().is_some_and(|s| s.token == token) {
            self.subscription = None;
            tracing::info!("unsubscribed from health source");
            return true;
        }
        false
    }

    /// Advance to `now`. Returns true if state or series changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.phase == Phase::TornDown {
            return false;
        }

        let mut changed = false;

        if self.pending.as_ref().is_some_and(|p| now >= p.deadline) {
            if let Some(transition) = self.pending.take() {
                let from = self.state.value();
                changed |= self.state.set(transition.target);
                if self.subscription.is_none() {
                    self.phase = Phase::Degraded;
                }
                tracing::info!(from, to = self.state.value(), "transition fired");
            }
        }

        if let Some(subscription) = self.subscription.as_mut() {
            while let Some(sample) = subscription.source.poll() {
                let sample = HealthSample::new(sample.label, sample.value);
                self.state.set(sample.value);
                self.series.push(sample);
                self.phase = Phase::Live;
                changed = true;
            }

            let error = subscription.source.error();
            if error != self.source_error {
                if let Some(ref message) = error {
                    tracing::warn!(source = subscription.source.description(), error = %message, "health source error");
                }
                self.source_error = error;
                self.revision += 1;
            }
        }

        if changed {
            self.revision += 1;
        }
        changed
    }

    /// Dispose of the view: cancel pending work and freeze state.
    pub fn teardown(&mut self) {
        if self.phase == Phase::TornDown {
            return;
        }
        self.pending = None;
        self.subscription = None;
        self.phase = Phase::TornDown;
        tracing::debug!(value = self.state.value(), "controller torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ChannelSource;

    const DELAY: Duration = Duration::from_millis(500);

    fn mounted() -> (DashboardController, Instant) {
        let start = Instant::now();
        (DashboardController::mount(&Settings::default(), start), start)
    }

    #[test]
    fn test_mount_then_transition_fires_once() {
        let (mut controller, start) = mounted();
        assert_eq!(controller.state().value(), 100.0);
        assert_eq!(controller.phase(), Phase::Initial);

        assert!(controller.tick(start + DELAY));
        assert_eq!(controller.state().value(), 12.0);
        assert_eq!(controller.phase(), Phase::Degraded);
        let revision = controller.revision();

        assert!(!controller.tick(start + DELAY * 10));
        assert_eq!(controller.state().value(), 12.0);
        assert_eq!(controller.revision(), revision);
    }

    #[test]
    fn test_no_transition_before_deadline() {
        let (mut controller, start) = mounted();
        assert!(!controller.tick(start + DELAY - Duration::from_millis(1)));
        assert_eq!(controller.state().value(), 100.0);
        assert_eq!(
            controller.time_until_transition(start + Duration::from_millis(200)),
            Some(Duration::from_millis(300))
        );
    }

    #[test]
    fn test_teardown_suppresses_pending_transition() {
        let (mut controller, start) = mounted();
        controller.tick(start + DELAY / 2);
        controller.teardown();

        assert!(!controller.tick(start + DELAY));
        assert!(!controller.tick(start + DELAY * 4));
        assert_eq!(controller.state().value(), 100.0);
        assert_eq!(controller.phase(), Phase::TornDown);
        assert!(controller.time_until_transition(start).is_none());
    }

    #[test]
    fn test_cancel_token() {
        let start = Instant::now();
        let mut controller = DashboardController::mount(&Settings::default(), start);
        let token = controller.schedule_once(Duration::from_secs(1), 40.0, start);

        assert!(controller.cancel(token));
        assert!(!controller.cancel(token));
        assert!(!controller.tick(start + Duration::from_secs(2)));
        assert_eq!(controller.state().value(), 100.0);
    }

    #[test]
    fn test_schedule_replaces_pending_and_clamps() {
        let (mut controller, start) = mounted();
        controller.schedule_once(Duration::from_secs(1), 250.0, start);
        controller.tick(start + DELAY);
        assert_eq!(controller.state().value(), 100.0);

        controller.schedule_once(Duration::from_secs(1), -30.0, start);
        controller.tick(start + Duration::from_secs(1));
        assert_eq!(controller.state().value(), 0.0);
    }

    #[test]
    fn test_schedule_after_teardown_is_inert() {
        let (mut controller, start) = mounted();
        controller.teardown();
        let token = controller.schedule_once(Duration::ZERO, 50.0, start);
        assert!(!controller.tick(start + DELAY));
        assert!(!controller.cancel(token));
        assert_eq!(controller.state().value(), 100.0);
    }

    #[test]
    fn test_subscription_replaces_timer() {
        let (mut controller, start) = mounted();
        let (tx, source) = ChannelSource::create("test");
        controller.subscribe(Box::new(source));
        assert!(controller.time_until_transition(start).is_none());
        assert_eq!(controller.source_description(), Some("channel: test"));

        // Timer no longer fires
        assert!(!controller.tick(start + DELAY));
        assert_eq!(controller.state().value(), 100.0);

        tx.send(Some(HealthSample::new("19:00", 130.0))).unwrap();
        assert!(controller.tick(start + DELAY));
        assert_eq!(controller.state().value(), 100.0);
        assert_eq!(controller.phase(), Phase::Live);
        assert_eq!(controller.series().latest().unwrap().label, "19:00");

        tx.send(Some(HealthSample::new("20:00", 33.0))).unwrap();
        controller.tick(start + DELAY);
        assert_eq!(controller.state().value(), 33.0);
    }

    #[test]
    fn test_unsubscribe_and_teardown_stop_updates() {
        let (mut controller, start) = mounted();
        let (tx, source) = ChannelSource::create("test");
        let token = controller.subscribe(Box::new(source));

        assert!(controller.cancel(token));
        assert!(controller.source_description().is_none());
        // Receiver is gone with the subscription
        assert!(tx.send(Some(HealthSample::new("x", 5.0))).is_err());
        assert!(!controller.tick(start + DELAY));

        let (tx, source) = ChannelSource::create("again");
        controller.subscribe(Box::new(source));
        controller.teardown();
        assert!(tx.send(Some(HealthSample::new("y", 5.0))).is_err());
        assert_eq!(controller.state().value(), 100.0);
    }

    #[test]
    fn test_transition_while_subscribed_stays_live() {
        let (mut controller, start) = mounted();
        let (tx, source) = ChannelSource::create("test");
        controller.subscribe(Box::new(source));
        tx.send(Some(HealthSample::new("19:00", 70.0))).unwrap();
        controller.tick(start);
        assert_eq!(controller.phase(), Phase::Live);

        controller.schedule_once(Duration::ZERO, 40.0, start);
        assert!(controller.tick(start));
        assert_eq!(controller.state().value(), 40.0);
        assert_eq!(controller.phase(), Phase::Live);
        assert_eq!(controller.source_description(), Some("channel: test"));
    }

    #[test]
    fn test_source_error_is_surfaced() {
        let (mut controller, start) = mounted();
        let (tx, source) = ChannelSource::create("test");
        controller.subscribe(Box::new(source));
        drop(tx);

        let revision = controller.revision();
        controller.tick(start);
        assert_eq!(controller.source_error(), Some("Sender dropped"));
        assert_eq!(controller.revision(), revision + 1);
    }

    #[test]
    fn test_seed_series_loaded_at_mount() {
        let (controller, _) = mounted();
        assert_eq!(controller.series().len(), 9);
    }
}
