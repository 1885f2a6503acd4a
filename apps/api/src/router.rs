use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::State,
    routing::get,
};
use serde_json::{Value, json};

use assessment_cell::create_assessment_router;
use auth_cell::auth_routes;
use export_cell::create_export_router;
use patient_cell::create_patient_router;
use realtime_cell::{LiveUpdateHub, create_realtime_router};
use settings_cell::create_settings_router;
use shared_config::AppConfig;
use webhook_cell::create_webhook_router;

async fn health(State(state): State<Arc<AppConfig>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "configured": state.is_configured()
    }))
}

pub fn create_router(state: Arc<AppConfig>, hub: LiveUpdateHub) -> Router {
    // Dashboard cells, all behind the session middleware
    let dashboard = Router::new()
        .merge(create_patient_router(state.clone()))
        .merge(create_assessment_router(state.clone()))
        .merge(create_settings_router(state.clone()))
        .merge(create_export_router(state.clone()))
        .merge(create_realtime_router(state.clone()));

    Router::new()
        .route("/", get(|| async { "Clinic portal API is running!" }))
        .route("/api/health", get(health).with_state(state.clone()))
        .nest("/api/auth", auth_routes(state.clone()))
        .nest("/api/webhooks", create_webhook_router(state.clone()))
        .nest("/api", dashboard)
        .layer(Extension(hub))
}
