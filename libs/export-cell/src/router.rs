use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_config::AppConfig;
use shared_utils::extractor::session_middleware;

use crate::handlers::export_dataset;

pub fn create_export_router(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/export/{dataset}", get(export_dataset))
        .layer(middleware::from_fn_with_state(config.clone(), session_middleware))
        .with_state(config)
}
