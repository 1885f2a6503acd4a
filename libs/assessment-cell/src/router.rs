use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::session_middleware;

use crate::handlers;

pub fn create_assessment_router(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/assessments", get(handlers::list_assessments))
        .route("/assessments/stats", get(handlers::get_assessment_stats))
        .route(
            "/assessments/{id}",
            get(handlers::get_assessment)
                .patch(handlers::update_assessment)
                .delete(handlers::delete_assessment),
        )
        .route("/consultations", get(handlers::list_consultations))
        .route("/consultations/{id}", get(handlers::get_consultation))
        .route("/consultations/{id}/images", get(handlers::get_consultation_images))
        .route(
            "/treatment-plans",
            get(handlers::list_treatment_plans).post(handlers::create_treatment_plan),
        )
        .route("/treatment-plans/{id}", patch(handlers::update_treatment_plan))
        .layer(middleware::from_fn_with_state(config.clone(), session_middleware))
        .with_state(config)
}
