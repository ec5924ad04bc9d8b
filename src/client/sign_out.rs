//! Sign-out: reconcile, sign out, clear local state, navigate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::tracker::TrackerRuntime;
use super::transport::SessionUpdate;

/// Moves the user to the login view.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn to_login(&self);
}

/// What reached the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignOutOutcome {
    pub reconciled: bool,
    pub signed_out: bool,
}

/// Runs against the tracker runtime so that clearing local state also
/// stops the ticker.
pub struct SignOutFlow {
    runtime: Arc<TrackerRuntime>,
    navigator: Arc<dyn Navigator>,
    loading: Arc<AtomicBool>,
}

/// Clears the loading flag however the flow exits.
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn engage(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SignOutFlow {
    pub fn new(runtime: Arc<TrackerRuntime>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            runtime,
            navigator,
            loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Handle for a UI to watch the loading state.
    pub fn loading_flag(&self) -> Arc<AtomicBool> {
        self.loading.clone()
    }

    /// Delivery is best effort: failures are logged and never stop the
    /// local sign-out.
    pub async fn run(&self) -> SignOutOutcome {
        let _loading = LoadingGuard::engage(&self.loading);
        let state = self.runtime.tracker().lock().snapshot();
        let transport = self.runtime.transport();

        let reconciled = match state.session_id {
            Some(session_id) => {
                let update = SessionUpdate {
                    session_id: session_id.clone(),
                    total_active_time: state.total_active_time_ms,
                };
                match transport.update_session(update).await {
                    Ok(()) => {
                        tracing::info!(
                            session_id = %session_id,
                            total_active_time_ms = state.total_active_time_ms,
                            "Active time reconciled"
                        );
                        true
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, session_id = %session_id, "Active time reconciliation failed");
                        false
                    }
                }
            }
            None => {
                tracing::debug!("No bound session; skipping reconciliation");
                false
            }
        };

        let signed_out = match transport.sign_out().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "Sign-out request failed");
                false
            }
        };

        self.runtime.end_session();
        self.navigator.to_login();

        SignOutOutcome {
            reconciled,
            signed_out,
        }
    }
}
