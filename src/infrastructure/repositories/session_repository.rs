//! Session Repository Implementation
//!
//! PostgreSQL implementation of the SessionRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Session, SessionRepository};
use crate::shared::error::AppError;

/// Database row representation matching the user_sessions table schema.
#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
    is_logged_in: bool,
    total_active_time_ms: i64,
    logged_out_at: Option<DateTime<Utc>>,
}

impl SessionRow {
    /// Convert database row to domain Session entity.
    fn into_session(self) -> Session {
        Session {
            id: self.id,
            user_id: self.user_id,
            created_at: self.created_at,
            last_activity: self.last_activity,
            is_logged_in: self.is_logged_in,
            total_active_time_ms: self.total_active_time_ms,
            logged_out_at: self.logged_out_at,
        }
    }
}

/// PostgreSQL session repository implementation.
#[derive(Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    /// Create a new PgSessionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, AppError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, created_at, last_activity, is_logged_in,
                   total_active_time_ms, logged_out_at
            FROM user_sessions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_session()))
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Session>, AppError> {
        let rows = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, created_at, last_activity, is_logged_in,
                   total_active_time_ms, logged_out_at
            FROM user_sessions
            WHERE user_id = $1
            ORDER BY last_activity DESC, created_at DESC
            LIMIT 100
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_session()).collect())
    }

    async fn create(&self, session: &Session) -> Result<Session, AppError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            INSERT INTO user_sessions (
                id, user_id, created_at, last_activity, is_logged_in,
                total_active_time_ms, logged_out_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, created_at, last_activity, is_logged_in,
                      total_active_time_ms, logged_out_at
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.created_at)
        .bind(session.last_activity)
        .bind(session.is_logged_in)
        .bind(session.total_active_time_ms)
        .bind(session.logged_out_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_session())
    }

    async fn record_active_time(
        &self,
        id: Uuid,
        total_active_time_ms: i64,
        at: DateTime<Utc>,
    ) -> Result<Option<Session>, AppError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            UPDATE user_sessions
            SET total_active_time_ms = $2, last_activity = $3
            WHERE id = $1 AND is_logged_in = TRUE
            RETURNING id, user_id, created_at, last_activity, is_logged_in,
                      total_active_time_ms, logged_out_at
            "#,
        )
        .bind(id)
        .bind(total_active_time_ms)
        .bind(at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_session()))
    }

    async fn log_out(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE user_sessions
            SET is_logged_in = FALSE, logged_out_at = $2
            WHERE id = $1 AND is_logged_in = TRUE
            "#,
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn log_out_inactive_since(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE user_sessions
            SET is_logged_in = FALSE, logged_out_at = NOW()
            WHERE is_logged_in = TRUE AND last_activity < $1
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
