use std::sync::Arc;

use axum::{routing::post, Router};

use shared_config::AppConfig;

use crate::handlers::{receive_clinic_webhook, receive_nail_surgery_webhook};

/// Webhooks authenticate with per-clinic secrets, not the dashboard session.
/// Expects a `LiveUpdateHub` extension to be layered on by the caller.
pub fn create_webhook_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/nailsurgery", post(receive_nail_surgery_webhook))
        .route("/{clinic}", post(receive_clinic_webhook))
        .with_state(state)
}
