//! Authentication Handlers

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::application::dto::request::{LoginRequest, RegisterRequest};
use crate::application::dto::response::{AuthResponse, SessionResponse};
use crate::application::services::{AuthError, AuthService, SessionService};
use crate::presentation::http::extractors::{AuthUser, MaybeAuthUser};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Register a new user and sign them in
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (user, tokens) = state
        .auth_service()
        .register(&body.name, &body.email, &body.password)
        .await?;

    let response = AuthResponse {
        user: user.into(),
        tokens: tokens.into(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with credentials, opening a new session
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (user, tokens) = state
        .auth_service()
        .authenticate(&body.email, &body.password)
        .await?;

    Ok(Json(AuthResponse {
        user: user.into(),
        tokens: tokens.into(),
    }))
}

/// Sign out the session the caller's token belongs to
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<StatusCode, AppError> {
    match state.auth_service().sign_out(auth.session_id).await {
        Ok(()) => {}
        // Another request logged the session out first
        Err(AuthError::SessionNotFound) => {
            tracing::debug!(session_id = %auth.session_id, "Session already logged out");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Session lookup: the caller's live session, or `null`
pub async fn current_session(
    State(state): State<AppState>,
    MaybeAuthUser(auth): MaybeAuthUser,
) -> Result<Json<Option<SessionResponse>>, AppError> {
    let Some(auth) = auth else {
        return Ok(Json(None));
    };

    let session = state
        .session_service()
        .current_session(auth.user_id, auth.session_id)
        .await?;

    Ok(Json(session.map(SessionResponse::from)))
}
