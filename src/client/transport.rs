//! Client side of the session API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};

/// What session lookup reports for a live session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

/// Body of the session-update call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdate {
    pub session_id: String,
    pub total_active_time: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server answered {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Not signed in")]
    Unauthenticated,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionTransport: Send + Sync {
    /// Session lookup. `Ok(None)` when the caller has no live session.
    async fn fetch_session(&self) -> Result<Option<SessionSummary>, TransportError>;

    /// Report the accumulated total for a session.
    async fn update_session(&self, update: SessionUpdate) -> Result<(), TransportError>;

    async fn sign_out(&self) -> Result<(), TransportError>;
}

/// `reqwest` transport against the dashboard API.
pub struct HttpSessionTransport {
    client: Client,
    base_url: String,
    access_token: RwLock<Option<String>>,
}

impl HttpSessionTransport {
    /// `base_url` is the server root, e.g. `http://localhost:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: RwLock::new(None),
        }
    }

    pub fn with_access_token(self, token: impl Into<String>) -> Self {
        self.set_access_token(token);
        self
    }

    pub fn set_access_token(&self, token: impl Into<String>) {
        *self.access_token.write() = Some(token.into());
    }

    pub fn clear_access_token(&self) {
        *self.access_token.write() = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.access_token.read().as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn require_token(&self) -> Result<(), TransportError> {
        if self.access_token.read().is_some() {
            Ok(())
        } else {
            Err(TransportError::Unauthenticated)
        }
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(TransportError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl SessionTransport for HttpSessionTransport {
    async fn fetch_session(&self) -> Result<Option<SessionSummary>, TransportError> {
        let response = self
            .authorized(self.client.get(self.url("/auth/session")))
            .send()
            .await?;

        let response = ensure_success(response).await?;
        Ok(response.json::<Option<SessionSummary>>().await?)
    }

    async fn update_session(&self, update: SessionUpdate) -> Result<(), TransportError> {
        self.require_token()?;
        let response = self
            .authorized(self.client.post(self.url("/sessions/update")))
            .json(&update)
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), TransportError> {
        self.require_token()?;
        let response = self
            .authorized(self.client.post(self.url("/auth/logout")))
            .send()
            .await?;

        // Already signed out server-side counts as done
        if response.status() != StatusCode::UNAUTHORIZED {
            ensure_success(response).await?;
        }
        self.clear_access_token();
        Ok(())
    }
}
