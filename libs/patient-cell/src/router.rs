use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_config::AppConfig;
use shared_utils::extractor::session_middleware;

use crate::handlers::*;

pub fn create_patient_router(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/patients", get(search_patients))
        .route("/patients/{id}", get(get_patient).patch(update_patient))
        .route("/patients/{id}/assessments", get(get_patient_assessments))
        .route("/communications", get(list_communications).post(create_communication))
        .layer(middleware::from_fn_with_state(config.clone(), session_middleware))
        .with_state(config)
}
