//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod auth;
pub mod health;
pub mod sessions;

use crate::application::services::{AuthError, SessionError};
use crate::shared::error::AppError;

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => AppError::Unauthorized("Invalid email or password".into()),
            AuthError::TokenExpired => AppError::Unauthorized("Token expired".into()),
            AuthError::InvalidToken => AppError::Unauthorized("Invalid token".into()),
            AuthError::SessionNotFound => AppError::Unauthorized("Session is no longer active".into()),
            AuthError::EmailExists => AppError::Conflict("Email already exists".into()),
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotFound => AppError::NotFound("Session not found or logged out".into()),
            SessionError::Forbidden => AppError::Forbidden("Session belongs to another user".into()),
            SessionError::InvalidActiveTime(value) => {
                AppError::BadRequest(format!("totalActiveTime out of range: {}", value))
            }
            SessionError::Internal(msg) => AppError::Internal(msg),
        }
    }
}
