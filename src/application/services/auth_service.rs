//! Authentication Service
//!
//! Handles registration, login, access token validation and sign-out.
//! Every login opens a server-side [`Session`]; the session id travels in the
//! access token so a token stops working once its session is logged out.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::Duration;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtSettings;
use crate::domain::{normalize_email, Session, SessionRepository, User, UserRepository};
use crate::infrastructure::metrics;
use crate::shared::clock::Clock;

/// Authentication service trait for dependency injection
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user and open their first session
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, AuthTokens), AuthError>;

    /// Authenticate user with credentials, opening a new session
    async fn authenticate(&self, email: &str, password: &str) -> Result<(User, AuthTokens), AuthError>;

    /// Validate an access token and check that its session is still logged in
    async fn authorize(&self, access_token: &str) -> Result<AuthenticatedSession, AuthError>;

    /// Log the given session out
    async fn sign_out(&self, session_id: Uuid) -> Result<(), AuthError>;
}

/// Authentication tokens response
#[derive(Debug, Clone, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub session_id: Uuid,
    pub expires_in: i64,
    pub token_type: String,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Session ID
    pub sid: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

/// Identity resolved from a valid access token with a live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub user_id: Uuid,
    pub session_id: Uuid,
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Email already exists")]
    EmailExists,

    #[error("Session not found or logged out")]
    SessionNotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// AuthService implementation
pub struct AuthServiceImpl<U, S>
where
    U: UserRepository + ?Sized,
    S: SessionRepository + ?Sized,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    clock: Arc<dyn Clock>,
    jwt_settings: JwtSettings,
}

impl<U, S> AuthServiceImpl<U, S>
where
    U: UserRepository + ?Sized,
    S: SessionRepository + ?Sized,
{
    /// Create a new AuthServiceImpl
    pub fn new(
        user_repo: Arc<U>,
        session_repo: Arc<S>,
        clock: Arc<dyn Clock>,
        jwt_settings: JwtSettings,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            clock,
            jwt_settings,
        }
    }

    /// Hash a password using Argon2id
    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// Verify a password against its hash
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Sign an access token bound to a session
    fn issue_token(&self, user_id: Uuid, session_id: Uuid) -> Result<AuthTokens, AuthError> {
        let now = self.clock.now();
        let expiry = now + Duration::minutes(self.jwt_settings.access_token_expiry_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            sid: session_id.to_string(),
            exp: expiry.timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_settings.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(AuthTokens {
            access_token,
            session_id,
            expires_in: self.jwt_settings.access_token_expiry_minutes * 60,
            token_type: "Bearer".to_string(),
        })
    }

    /// Create a session row for the user and sign a token for it
    async fn open_session(&self, user_id: Uuid) -> Result<AuthTokens, AuthError> {
        let session = Session::new(user_id, self.clock.now());
        let session = self
            .session_repo
            .create(&session)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        metrics::LOGINS_TOTAL.inc();
        tracing::info!(user_id = %user_id, session_id = %session.id, "Session opened");

        self.issue_token(user_id, session.id)
    }

    /// Decode and validate access token
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_settings.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

        Ok(token_data.claims)
    }
}

#[async_trait]
impl<U, S> AuthService for AuthServiceImpl<U, S>
where
    U: UserRepository + ?Sized + 'static,
    S: SessionRepository + ?Sized + 'static,
{
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, AuthTokens), AuthError> {
        let email = normalize_email(email);

        if self
            .user_repo
            .email_exists(&email)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
        {
            return Err(AuthError::EmailExists);
        }

        let password_hash = self.hash_password(password)?;
        let user = User::new(name, &email, password_hash, self.clock.now());

        let created_user = self.user_repo.create(&user).await.map_err(|e| match e {
            crate::shared::error::AppError::Conflict(_) => AuthError::EmailExists,
            e => AuthError::Internal(e.to_string()),
        })?;

        let tokens = self.open_session(created_user.id).await?;

        Ok((created_user, tokens))
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<(User, AuthTokens), AuthError> {
        let user = self
            .user_repo
            .find_by_email(&normalize_email(email))
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.verify_password(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.open_session(user.id).await?;

        Ok((user, tokens))
    }

    async fn authorize(&self, access_token: &str) -> Result<AuthenticatedSession, AuthError> {
        let claims = self.decode_access_token(access_token)?;

        let user_id = claims.sub.parse::<Uuid>().map_err(|_| AuthError::InvalidToken)?;
        let session_id = claims.sid.parse::<Uuid>().map_err(|_| AuthError::InvalidToken)?;

        let session = self
            .session_repo
            .find_by_id(session_id)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::SessionNotFound)?;

        if !session.is_logged_in || !session.is_owned_by(user_id) {
            return Err(AuthError::SessionNotFound);
        }

        Ok(AuthenticatedSession {
            user_id,
            session_id,
        })
    }

    async fn sign_out(&self, session_id: Uuid) -> Result<(), AuthError> {
        let changed = self
            .session_repo
            .log_out(session_id, self.clock.now())
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        if !changed {
            return Err(AuthError::SessionNotFound);
        }

        metrics::SIGN_OUTS_TOTAL.inc();
        tracing::info!(session_id = %session_id, "Session signed out");

        Ok(())
    }
}
