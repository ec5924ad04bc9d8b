//! Tracker core and its async runtime.
//!
//! [`SessionActivityTracker`] is synchronous state: accumulator, binder and
//! the sampler it ticks against. [`TrackerRuntime`] owns the two timers
//! around it, the 5-minute session poll and the 1-second ticker that only
//! runs while a session is bound.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};

use super::accumulator::{ActiveTimeAccumulator, TICK_INCREMENT_MS};
use super::activity::ActivitySampler;
use super::binder::{BindingTransition, SessionBinder};
use super::storage::KeyValueStorage;
use super::transport::{SessionSummary, SessionTransport, TransportError};
use crate::shared::clock::Clock;

/// Session lookup cadence; a logout is noticed at most this late.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, Copy)]
pub struct TrackerConfig {
    pub tick_interval: Duration,
    pub poll_interval: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(TICK_INCREMENT_MS),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// What the sign-out flow reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTimeState {
    pub total_active_time_ms: u64,
    pub session_id: Option<String>,
}

pub struct SessionActivityTracker {
    accumulator: ActiveTimeAccumulator,
    binder: SessionBinder,
    sampler: Arc<dyn ActivitySampler>,
    clock: Arc<dyn Clock>,
    last_activity: Option<DateTime<Utc>>,
}

pub type SharedTracker = Arc<Mutex<SessionActivityTracker>>;

impl SessionActivityTracker {
    /// Build the tracker and restore the persisted total.
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        sampler: Arc<dyn ActivitySampler>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut accumulator = ActiveTimeAccumulator::new(storage);
        let restored = accumulator.restore();
        tracing::debug!(restored_ms = restored, "Active time restored");

        Self {
            accumulator,
            binder: SessionBinder::new(),
            sampler,
            clock,
            last_activity: None,
        }
    }

    pub fn into_shared(self) -> SharedTracker {
        Arc::new(Mutex::new(self))
    }

    /// Apply a session lookup result. A failed lookup counts as no session.
    pub fn observe_session(
        &mut self,
        lookup: Result<Option<SessionSummary>, TransportError>,
    ) -> BindingTransition {
        let session = lookup.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Session lookup failed; treating as signed out");
            None
        });

        let transition = self.binder.observe(session.as_ref().map(|s| s.id.as_str()));
        match &transition {
            BindingTransition::Bound(id) => {
                self.last_activity = Some(self.clock.now());
                tracing::info!(session_id = %id, "Session bound");
            }
            BindingTransition::Rebound { from, to } => {
                self.last_activity = Some(self.clock.now());
                tracing::info!(from = %from, to = %to, "Session rebound");
            }
            BindingTransition::LoggedOut => {
                tracing::info!(
                    discarded_ms = self.accumulator.total_ms(),
                    "Session ended; resetting active time"
                );
                self.accumulator.reset();
                self.last_activity = None;
            }
            BindingTransition::Unchanged => {}
        }
        transition
    }

    /// One tick of the 1 s cadence. Counts only while bound and active.
    pub fn tick(&mut self) -> bool {
        if !self.binder.is_bound() {
            return false;
        }
        self.accumulator.tick(self.sampler.is_page_active())
    }

    /// Drop local state after an explicit sign-out.
    pub fn end_session(&mut self) {
        self.binder.observe(None);
        self.accumulator.reset();
        self.last_activity = None;
    }

    pub fn snapshot(&self) -> ActiveTimeState {
        ActiveTimeState {
            total_active_time_ms: self.accumulator.total_ms(),
            session_id: self.binder.session_id().map(str::to_string),
        }
    }

    pub fn is_bound(&self) -> bool {
        self.binder.is_bound()
    }

    /// When the current binding started.
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.last_activity
    }
}

/// Drives a shared tracker from the session lookup.
pub struct TrackerRuntime {
    tracker: SharedTracker,
    transport: Arc<dyn SessionTransport>,
    config: TrackerConfig,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl TrackerRuntime {
    pub fn new(
        tracker: SharedTracker,
        transport: Arc<dyn SessionTransport>,
        config: TrackerConfig,
    ) -> Self {
        Self {
            tracker,
            transport,
            config,
            ticker: Mutex::new(None),
        }
    }

    pub fn tracker(&self) -> SharedTracker {
        self.tracker.clone()
    }

    pub fn transport(&self) -> Arc<dyn SessionTransport> {
        self.transport.clone()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Run one session lookup and start or stop the ticker to match.
    pub async fn poll_once(&self) -> BindingTransition {
        let lookup = self.transport.fetch_session().await;
        let (transition, bound) = {
            let mut tracker = self.tracker.lock();
            let transition = tracker.observe_session(lookup);
            (transition, tracker.is_bound())
        };

        match (&transition, bound) {
            (BindingTransition::Bound(_) | BindingTransition::Rebound { .. }, _) => {
                self.start_ticker()
            }
            (_, false) => self.stop_ticker(),
            _ => {}
        }
        transition
    }

    /// Drop local state after an explicit sign-out and stop the ticker.
    pub fn end_session(&self) {
        self.tracker.lock().end_session();
        self.stop_ticker();
    }

    /// Poll immediately, then every `poll_interval`, until `shutdown` resolves.
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut poll = interval(self.config.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = poll.tick() => {
                    self.poll_once().await;
                }
                _ = &mut shutdown => {
                    tracing::debug!("Tracker runtime stopping");
                    break;
                }
            }
        }

        self.stop_ticker();
    }

    fn start_ticker(&self) {
        let tracker = self.tracker.clone();
        let every = self.config.tick_interval;

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                tracker.lock().tick();
            }
        });

        if let Some(previous) = self.ticker.lock().replace(handle) {
            previous.abort();
        }
    }

    fn stop_ticker(&self) {
        if let Some(handle) = self.ticker.lock().take() {
            handle.abort();
        }
    }
}

impl Drop for TrackerRuntime {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}
