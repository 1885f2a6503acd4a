use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_config::AppConfig;
use shared_utils::extractor::session_middleware;

use crate::handlers;

pub fn create_settings_router(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/chatbot-settings", get(handlers::list_chatbot_settings))
        .route(
            "/chatbot-settings/{clinic_group}",
            get(handlers::get_chatbot_settings).put(handlers::update_chatbot_settings),
        )
        .route(
            "/clinic-email-settings/{clinic_group}",
            get(handlers::get_email_settings).put(handlers::update_email_settings),
        )
        .layer(middleware::from_fn_with_state(config.clone(), session_middleware))
        .with_state(config)
}
