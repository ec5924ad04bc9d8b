//! Session Handlers

use axum::{extract::State, Json};

use crate::application::dto::request::SessionUpdateRequest;
use crate::application::dto::response::SessionResponse;
use crate::application::services::SessionService;
use crate::presentation::http::extractors::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Reconcile client-side active time for one of the caller's sessions
pub async fn update_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<SessionUpdateRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state
        .session_service()
        .record_active_time(auth.user_id, body.session_id, body.total_active_time)
        .await?;

    Ok(Json(session.into()))
}

/// List the caller's sessions
pub async fn list_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<SessionResponse>>, AppError> {
    let sessions = state.session_service().list_sessions(auth.user_id).await?;

    Ok(Json(sessions.into_iter().map(SessionResponse::from).collect()))
}
