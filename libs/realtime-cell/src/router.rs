use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_config::AppConfig;
use shared_utils::extractor::session_middleware;

use crate::handlers::live_updates_socket;

/// Expects a `LiveUpdateHub` extension to be layered on by the caller.
pub fn create_realtime_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/ws", get(live_updates_socket))
        .layer(middleware::from_fn_with_state(state.clone(), session_middleware))
        .with_state(state)
}
