//! Authentication Middleware
//!
//! Bearer token validation for protected routes. A token is only accepted
//! while the session it was issued for is still logged in.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::application::services::AuthService;
use crate::presentation::http::extractors::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Extract the bearer token from the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|Authorization(bearer)| bearer.token().to_string())
}

/// Authentication middleware that validates the token and its session
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".into()))?;

    let identity = state.auth_service().authorize(&token).await?;

    request.extensions_mut().insert(AuthUser::from(identity));

    Ok(next.run(request).await)
}

/// Optional authentication middleware (doesn't fail if no valid token)
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(request.headers()) {
        match state.auth_service().authorize(&token).await {
            Ok(identity) => {
                request.extensions_mut().insert(AuthUser::from(identity));
            }
            Err(e) => tracing::debug!(error = %e, "Ignoring unusable bearer token"),
        }
    }

    next.run(request).await
}
