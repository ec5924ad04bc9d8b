//! Common Test Utilities
//!
//! In-memory repositories, a test application around the real router, and
//! data generators.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use parking_lot::RwLock;
use serde_json::json;
use uuid::Uuid;

use admin_dashboard::application::dto::response::AuthResponse;
use admin_dashboard::config::{
    CorsSettings, DatabaseSettings, JwtSettings, ServerSettings, SessionSettings, Settings,
};
use admin_dashboard::domain::{Session, SessionRepository, User, UserRepository};
use admin_dashboard::shared::clock::ManualClock;
use admin_dashboard::shared::error::AppError;
use admin_dashboard::startup::{build_router, AppState};

pub const TEST_PASSWORD: &str = "correct-horse-battery";

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<User, AppError> {
        let mut users = self.users.write();
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Email already exists".into()));
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.users.read().values().any(|u| u.email == email))
    }
}

#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl InMemorySessionRepository {
    pub fn get(&self, id: Uuid) -> Option<Session> {
        self.sessions.read().get(&id).cloned()
    }

    pub fn insert(&self, session: Session) {
        self.sessions.write().insert(session.id, session);
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, AppError> {
        Ok(self.get(id))
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Session>, AppError> {
        let mut sessions: Vec<Session> = self
            .sessions
            .read()
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        Ok(sessions)
    }

    async fn create(&self, session: &Session) -> Result<Session, AppError> {
        self.insert(session.clone());
        Ok(session.clone())
    }

    async fn record_active_time(
        &self,
        id: Uuid,
        total_active_time_ms: i64,
        at: DateTime<Utc>,
    ) -> Result<Option<Session>, AppError> {
        let mut sessions = self.sessions.write();
        Ok(sessions
            .get_mut(&id)
            .filter(|s| s.is_logged_in)
            .map(|s| {
                s.total_active_time_ms = total_active_time_ms;
                s.last_activity = at;
                s.clone()
            }))
    }

    async fn log_out(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, AppError> {
        let mut sessions = self.sessions.write();
        match sessions.get_mut(&id) {
            Some(s) if s.is_logged_in => {
                s.is_logged_in = false;
                s.logged_out_at = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn log_out_inactive_since(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let mut swept = 0;
        for session in self.sessions.write().values_mut() {
            if session.is_inactive_since(cutoff) {
                session.is_logged_in = false;
                session.logged_out_at = Some(Utc::now());
                swept += 1;
            }
        }
        Ok(swept)
    }
}

pub fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
        },
        database: DatabaseSettings {
            url: "postgres://unused/test".into(),
            max_connections: 1,
            min_connections: 0,
            acquire_timeout: 1,
            run_migrations: false,
        },
        jwt: JwtSettings {
            secret: "integration-test-secret-at-least-32-chars".into(),
            access_token_expiry_minutes: 60,
        },
        sessions: SessionSettings::default(),
        cors: CorsSettings {
            allowed_origins: vec![],
        },
        environment: "test".into(),
    }
}

/// A registered user with their first session.
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub token: String,
    pub session_id: Uuid,
}

/// Test application wired with in-memory repositories and a manual clock.
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub sessions: Arc<InMemorySessionRepository>,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::default());
        let sessions = Arc::new(InMemorySessionRepository::default());
        let clock = Arc::new(ManualClock::new(Utc::now()));

        let state = AppState::new(users, sessions.clone(), clock.clone(), test_settings());
        let server = TestServer::new(build_router(state.clone())).expect("test server");

        Self {
            server,
            state,
            sessions,
            clock,
        }
    }

    /// Register a fresh user through the API.
    pub async fn register_user(&self) -> TestUser {
        let email = unique_email();
        let response = self
            .server
            .post("/api/v1/auth/register")
            .json(&json!({
                "name": unique_name(),
                "email": email,
                "password": TEST_PASSWORD,
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);

        let body: AuthResponse = response.json();
        TestUser {
            id: body.user.id.parse().expect("user id"),
            email,
            token: body.tokens.access_token,
            session_id: body.tokens.session_id.parse().expect("session id"),
        }
    }
}

pub fn unique_email() -> String {
    let email: String = SafeEmail().fake();
    format!("{}.{}", Uuid::new_v4().simple(), email)
}

pub fn unique_name() -> String {
    Name().fake()
}
