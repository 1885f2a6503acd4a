use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::clinic::{ChatbotSettings, ClinicEmailSettings, ClinicGroup};
use shared_models::error::AppError;

use crate::models::{validate_chatbot_settings, UpdateChatbotSettingsRequest, UpdateEmailSettingsRequest};
use crate::services::{ChatbotSettingsService, EmailSettingsService};

fn parse_clinic_group(raw: &str) -> Result<ClinicGroup, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("Unknown clinic group: {}", raw)))
}

#[axum::debug_handler]
pub async fn list_chatbot_settings(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = ChatbotSettingsService::new(&config);

    let settings = service
        .list()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({ "settings": settings })))
}

#[axum::debug_handler]
pub async fn get_chatbot_settings(
    State(config): State<Arc<AppConfig>>,
    Path(clinic_group): Path<String>,
) -> Result<Json<ChatbotSettings>, AppError> {
    let clinic_group = parse_clinic_group(&clinic_group)?;
    let service = ChatbotSettingsService::new(&config);

    let settings = service
        .get(clinic_group)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(settings))
}

#[axum::debug_handler]
pub async fn update_chatbot_settings(
    State(config): State<Arc<AppConfig>>,
    Path(clinic_group): Path<String>,
    Json(request): Json<UpdateChatbotSettingsRequest>,
) -> Result<Json<ChatbotSettings>, AppError> {
    let clinic_group = parse_clinic_group(&clinic_group)?;
    let service = ChatbotSettingsService::new(&config);

    let current = service
        .get(clinic_group)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let updated = request.apply_to(current);
    validate_chatbot_settings(&updated)?;

    let saved = service
        .save(updated)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(saved))
}

#[axum::debug_handler]
pub async fn get_email_settings(
    State(config): State<Arc<AppConfig>>,
    Path(clinic_group): Path<String>,
) -> Result<Json<ClinicEmailSettings>, AppError> {
    let clinic_group = parse_clinic_group(&clinic_group)?;
    let service = EmailSettingsService::new(&config);

    let settings = service
        .get(clinic_group)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(settings))
}

#[axum::debug_handler]
pub async fn update_email_settings(
    State(config): State<Arc<AppConfig>>,
    Path(clinic_group): Path<String>,
    Json(request): Json<UpdateEmailSettingsRequest>,
) -> Result<Json<ClinicEmailSettings>, AppError> {
    let clinic_group = parse_clinic_group(&clinic_group)?;
    let request = request.normalize()?;
    let service = EmailSettingsService::new(&config);

    let current = service
        .get(clinic_group)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let updated = request.apply_to(current)?;

    let saved = service
        .save(updated)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(saved))
}
