use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::clinic::{Communication, Patient};
use shared_models::error::AppError;

use crate::models::{
    CommunicationQuery, CreateCommunicationRequest, PatientSearchQuery, PatientWithAssessments,
    UpdatePatientRequest,
};
use crate::services::{CommunicationService, PatientService};

fn patient_not_found(patient_id: i64) -> AppError {
    AppError::NotFound(format!("Patient {} not found", patient_id))
}

#[axum::debug_handler]
pub async fn search_patients(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<PatientSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&config);

    let patients = service
        .search_patients(query)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({
        "patients": patients,
        "total": patients.len()
    })))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(config): State<Arc<AppConfig>>,
    Path(patient_id): Path<i64>,
) -> Result<Json<PatientWithAssessments>, AppError> {
    let service = PatientService::new(&config);

    let patient = service
        .get_patient(patient_id)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| patient_not_found(patient_id))?;

    let assessments = service
        .patient_assessments(patient_id)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(PatientWithAssessments { patient, assessments }))
}

#[axum::debug_handler]
pub async fn get_patient_assessments(
    State(config): State<Arc<AppConfig>>,
    Path(patient_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&config);

    let assessments = service
        .patient_assessments(patient_id)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({
        "assessments": assessments,
        "total": assessments.len()
    })))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(config): State<Arc<AppConfig>>,
    Path(patient_id): Path<i64>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<Patient>, AppError> {
    if matches!(request.name.as_deref().map(str::trim), Some("")) {
        return Err(AppError::ValidationError("Patient name cannot be empty".to_string()));
    }

    let service = PatientService::new(&config);

    let patient = service
        .update_patient(patient_id, request)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| patient_not_found(patient_id))?;

    Ok(Json(patient))
}

#[axum::debug_handler]
pub async fn list_communications(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<CommunicationQuery>,
) -> Result<Json<Value>, AppError> {
    let service = CommunicationService::new(&config);

    let communications = service
        .list(query)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({
        "communications": communications,
        "total": communications.len()
    })))
}

#[axum::debug_handler]
pub async fn create_communication(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CreateCommunicationRequest>,
) -> Result<(StatusCode, Json<Communication>), AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::ValidationError("Message cannot be empty".to_string()));
    }

    let service = CommunicationService::new(&config);

    let communication = service
        .record(request)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(communication)))
}
