//! Login session entity and repository trait.
//!
//! Maps to the `user_sessions` table in the database schema.
//! A session is created on login, receives the client's accumulated active
//! time on reconciliation and is logged out either explicitly or by the
//! stale-session sweep.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;

/// Represents a dashboard login session.
///
/// Maps to the `user_sessions` table:
/// - id: UUID PRIMARY KEY
/// - user_id: UUID NOT NULL REFERENCES users(id)
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - last_activity: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - is_logged_in: BOOLEAN NOT NULL DEFAULT TRUE
/// - total_active_time_ms: BIGINT NOT NULL DEFAULT 0
/// - logged_out_at: TIMESTAMPTZ NULL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,

    /// Owner of the session
    pub user_id: Uuid,

    pub created_at: DateTime<Utc>,

    /// Last time the session was created or reconciled
    pub last_activity: DateTime<Utc>,

    pub is_logged_in: bool,

    /// Active time last reported by the client, in milliseconds
    pub total_active_time_ms: i64,

    pub logged_out_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create a new logged-in session.
    pub fn new(user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            created_at: now,
            last_activity: now,
            is_logged_in: true,
            total_active_time_ms: 0,
            logged_out_at: None,
        }
    }

    /// Whether the sweep should log this session out: still logged in with
    /// its last activity strictly before `cutoff`.
    pub fn is_inactive_since(&self, cutoff: DateTime<Utc>) -> bool {
        self.is_logged_in && self.last_activity < cutoff
    }

    /// Check whether the session belongs to the given user.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Repository trait for Session data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Find a session by its id, logged in or not.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, AppError>;

    /// List a user's sessions, most recently active first.
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Session>, AppError>;

    /// Persist a new session.
    async fn create(&self, session: &Session) -> Result<Session, AppError>;

    /// Store the client-reported active time and bump `last_activity`.
    ///
    /// Only logged-in sessions are updated; returns the updated session or
    /// `None` if no logged-in session matched.
    async fn record_active_time(
        &self,
        id: Uuid,
        total_active_time_ms: i64,
        at: DateTime<Utc>,
    ) -> Result<Option<Session>, AppError>;

    /// Mark a session as logged out. Returns whether a logged-in session
    /// was changed.
    async fn log_out(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, AppError>;

    /// Log out every logged-in session whose `last_activity` is older than
    /// `cutoff`. Returns the number of sessions changed.
    async fn log_out_inactive_since(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError>;

    /// Cheap connectivity probe used by the readiness endpoint.
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
