//! Session Service
//!
//! Session lookup, active-time reconciliation and per-user session listing.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Session, SessionRepository};
use crate::infrastructure::metrics;
use crate::shared::clock::Clock;

/// Session service trait for dependency injection
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Return the session if it is still logged in and owned by the user
    async fn current_session(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<Option<Session>, SessionError>;

    /// Store the client's accumulated active time for a session
    async fn record_active_time(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        total_active_time_ms: u64,
    ) -> Result<Session, SessionError>;

    /// List the user's sessions, most recently active first
    async fn list_sessions(&self, user_id: Uuid) -> Result<Vec<Session>, SessionError>;
}

/// Session errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session not found or logged out")]
    NotFound,

    #[error("Session belongs to another user")]
    Forbidden,

    #[error("Active time out of range: {0}")]
    InvalidActiveTime(u64),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// SessionService implementation
pub struct SessionServiceImpl<S>
where
    S: SessionRepository + ?Sized,
{
    session_repo: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> SessionServiceImpl<S>
where
    S: SessionRepository + ?Sized,
{
    pub fn new(session_repo: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            session_repo,
            clock,
        }
    }

    async fn load(&self, session_id: Uuid) -> Result<Option<Session>, SessionError> {
        self.session_repo
            .find_by_id(session_id)
            .await
            .map_err(|e| SessionError::Internal(e.to_string()))
    }
}

#[async_trait]
impl<S> SessionService for SessionServiceImpl<S>
where
    S: SessionRepository + ?Sized + 'static,
{
    async fn current_session(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<Option<Session>, SessionError> {
        Ok(self
            .load(session_id)
            .await?
            .filter(|s| s.is_logged_in && s.is_owned_by(user_id)))
    }

    async fn record_active_time(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        total_active_time_ms: u64,
    ) -> Result<Session, SessionError> {
        let total = i64::try_from(total_active_time_ms)
            .map_err(|_| SessionError::InvalidActiveTime(total_active_time_ms))?;

        let session = self
            .load(session_id)
            .await?
            .filter(|s| s.is_logged_in)
            .ok_or(SessionError::NotFound)?;

        if !session.is_owned_by(user_id) {
            tracing::warn!(
                user_id = %user_id,
                session_id = %session_id,
                "Active time reported for another user's session"
            );
            return Err(SessionError::Forbidden);
        }

        let updated = self
            .session_repo
            .record_active_time(session_id, total, self.clock.now())
            .await
            .map_err(|e| SessionError::Internal(e.to_string()))?
            .ok_or(SessionError::NotFound)?;

        metrics::ACTIVE_TIME_RECONCILIATIONS_TOTAL.inc();
        tracing::info!(
            session_id = %session_id,
            total_active_time_ms = total,
            "Active time reconciled"
        );

        Ok(updated)
    }

    async fn list_sessions(&self, user_id: Uuid) -> Result<Vec<Session>, SessionError> {
        self.session_repo
            .find_by_user_id(user_id)
            .await
            .map_err(|e| SessionError::Internal(e.to_string()))
    }
}
