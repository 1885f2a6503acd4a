use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use headers::{Cookie, HeaderMapExt};

use shared_config::AppConfig;
use shared_models::auth::Session;
use shared_models::error::AppError;

use crate::session::{validate_session_token, SESSION_COOKIE};

/// Pulls the session token from the session cookie, falling back to a bearer
/// header for scripted clients.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = headers.typed_get::<Cookie>() {
        if let Some(token) = cookie.get(SESSION_COOKIE) {
            return Some(token.to_string());
        }
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

pub fn current_session(headers: &HeaderMap, config: &AppConfig) -> Result<Session, AppError> {
    let token = session_token(headers)
        .ok_or_else(|| AppError::Auth("Not authenticated".to_string()))?;

    validate_session_token(&token, &config.session_secret, Utc::now()).map_err(AppError::Auth)
}

// Middleware guarding the dashboard routes
pub async fn session_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let session = current_session(request.headers(), &config)?;

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}
