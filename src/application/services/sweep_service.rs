//! Stale-Session Sweep
//!
//! Logs out sessions that are still marked logged in but have had no
//! activity for longer than the configured threshold. The sweep runs once
//! immediately and then on a fixed interval; a failed run is logged and the
//! next tick repeats the same idempotent update.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::domain::SessionRepository;
use crate::infrastructure::metrics;
use crate::shared::clock::Clock;
use crate::shared::error::AppError;

/// Periodic job that demotes idle sessions.
pub struct StaleSessionSweeper<S>
where
    S: SessionRepository + ?Sized,
{
    session_repo: Arc<S>,
    clock: Arc<dyn Clock>,
    stale_after: Duration,
}

impl<S> StaleSessionSweeper<S>
where
    S: SessionRepository + ?Sized + 'static,
{
    pub fn new(session_repo: Arc<S>, clock: Arc<dyn Clock>, stale_after: Duration) -> Self {
        Self {
            session_repo,
            clock,
            stale_after,
        }
    }

    pub fn stale_after(&self) -> Duration {
        self.stale_after
    }

    /// Run a single sweep. Returns the number of sessions logged out.
    pub async fn sweep_once(&self) -> Result<u64, AppError> {
        let now = self.clock.now();
        let cutoff = now.checked_sub_signed(self.stale_after).ok_or_else(|| {
            AppError::Internal(format!(
                "staleness threshold of {} minutes reaches before {}",
                self.stale_after.num_minutes(),
                now
            ))
        })?;
        self.session_repo.log_out_inactive_since(cutoff).await
    }

    /// Run a sweep and log its outcome; errors never escape.
    pub async fn run_logged(&self) -> Option<u64> {
        match self.sweep_once().await {
            Ok(swept) => {
                metrics::record_sweep(Ok(swept));
                if swept > 0 {
                    tracing::info!(swept, "Stale sessions logged out");
                } else {
                    tracing::debug!("No stale sessions found");
                }
                Some(swept)
            }
            Err(e) => {
                metrics::record_sweep(Err(()));
                tracing::error!(error = %e, "Stale-session sweep failed");
                None
            }
        }
    }

    /// Spawn the sweep loop: one run right away, then one per `every`.
    pub fn spawn(self, every: StdDuration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::info!(
                every_secs = every.as_secs(),
                stale_after_minutes = self.stale_after.num_minutes(),
                "Stale-session sweep started"
            );

            loop {
                // The first tick completes immediately.
                ticker.tick().await;
                self.run_logged().await;
            }
        })
    }
}
