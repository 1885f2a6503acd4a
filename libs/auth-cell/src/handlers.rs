use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::{header::SET_COOKIE, HeaderMap},
    response::{AppendHeaders, IntoResponse},
};
use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_models::auth::{LoginRequest, SessionResponse};
use shared_models::error::AppError;
use shared_utils::extractor::current_session;
use shared_utils::secret::secrets_match;
use shared_utils::session::{cleared_session_cookie, issue_session_token, session_cookie};

pub async fn login(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !secrets_match(&request.password, &config.admin_password) {
        warn!("Rejected dashboard login attempt");
        return Err(AppError::Auth("Invalid password".to_string()));
    }

    let (token, session) = issue_session_token(&config.session_secret, config.session_ttl_hours, Utc::now())
        .map_err(AppError::Internal)?;

    info!("Dashboard session issued, expires at {}", session.expires_at);

    Ok((
        AppendHeaders([(SET_COOKIE, session_cookie(&token, config.session_ttl_hours))]),
        Json(SessionResponse {
            authenticated: true,
            expires_at: Some(session.expires_at),
        }),
    ))
}

pub async fn logout() -> impl IntoResponse {
    debug!("Clearing dashboard session");

    (
        AppendHeaders([(SET_COOKIE, cleared_session_cookie())]),
        Json(json!({ "authenticated": false })),
    )
}

pub async fn session_status(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Json<SessionResponse> {
    match current_session(&headers, &config) {
        Ok(session) => Json(SessionResponse {
            authenticated: true,
            expires_at: Some(session.expires_at),
        }),
        Err(_) => Json(SessionResponse {
            authenticated: false,
            expires_at: None,
        }),
    }
}
