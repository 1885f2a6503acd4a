use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::clinic::{
    Assessment, AssessmentUpdate, Consultation, TreatmentPlan, TreatmentPlanUpdate,
};
use shared_models::error::AppError;

use crate::models::{
    AssessmentDetail, AssessmentListQuery, ConsultationListQuery, CreateTreatmentPlanRequest,
    TreatmentPlanQuery,
};
use crate::services::{AssessmentService, AssessmentStats, ConsultationService, TreatmentPlanService};

fn not_found(kind: &str, id: i64) -> AppError {
    AppError::NotFound(format!("{} {} not found", kind, id))
}

// ==============================================================================
// ASSESSMENTS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_assessments(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<AssessmentListQuery>,
) -> Result<Json<Value>, AppError> {
    let service = AssessmentService::new(&config);

    let assessments = service
        .list(&query.into())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({
        "assessments": assessments,
        "total": assessments.len()
    })))
}

#[axum::debug_handler]
pub async fn get_assessment_stats(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<AssessmentStats>, AppError> {
    let service = AssessmentService::new(&config);

    let stats = service
        .stats()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(stats))
}

#[axum::debug_handler]
pub async fn get_assessment(
    State(config): State<Arc<AppConfig>>,
    Path(assessment_id): Path<i64>,
) -> Result<Json<AssessmentDetail>, AppError> {
    let service = AssessmentService::new(&config);

    let detail = service
        .detail(assessment_id)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| not_found("Assessment", assessment_id))?;

    Ok(Json(detail))
}

#[axum::debug_handler]
pub async fn update_assessment(
    State(config): State<Arc<AppConfig>>,
    Path(assessment_id): Path<i64>,
    Json(changes): Json<AssessmentUpdate>,
) -> Result<Json<Assessment>, AppError> {
    if changes.is_empty() {
        return Err(AppError::ValidationError(
            "Provide at least one of status, risk_level or notes".to_string(),
        ));
    }

    let service = AssessmentService::new(&config);

    let assessment = service
        .update(assessment_id, &changes)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| not_found("Assessment", assessment_id))?;

    Ok(Json(assessment))
}

#[axum::debug_handler]
pub async fn delete_assessment(
    State(config): State<Arc<AppConfig>>,
    Path(assessment_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let service = AssessmentService::new(&config);

    let deleted = service
        .delete(assessment_id)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if !deleted {
        return Err(not_found("Assessment", assessment_id));
    }

    Ok(StatusCode::NO_CONTENT)
}

// ==============================================================================
// CONSULTATIONS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_consultations(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<ConsultationListQuery>,
) -> Result<Json<Value>, AppError> {
    let service = ConsultationService::new(&config);

    let consultations = service
        .list(&query.into())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({
        "consultations": consultations,
        "total": consultations.len()
    })))
}

#[axum::debug_handler]
pub async fn get_consultation(
    State(config): State<Arc<AppConfig>>,
    Path(consultation_id): Path<i64>,
) -> Result<Json<Consultation>, AppError> {
    let service = ConsultationService::new(&config);

    let consultation = service
        .get(consultation_id)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| not_found("Consultation", consultation_id))?;

    Ok(Json(consultation))
}

#[axum::debug_handler]
pub async fn get_consultation_images(
    State(config): State<Arc<AppConfig>>,
    Path(consultation_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = ConsultationService::new(&config);

    let images = service
        .images(consultation_id)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({
        "images": images,
        "total": images.len()
    })))
}

// ==============================================================================
// TREATMENT PLANS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_treatment_plans(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<TreatmentPlanQuery>,
) -> Result<Json<Value>, AppError> {
    let service = TreatmentPlanService::new(&config);

    let plans = service
        .list(&query)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({
        "treatment_plans": plans,
        "total": plans.len()
    })))
}

#[axum::debug_handler]
pub async fn create_treatment_plan(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CreateTreatmentPlanRequest>,
) -> Result<(StatusCode, Json<TreatmentPlan>), AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::ValidationError("Treatment plan title cannot be empty".to_string()));
    }

    let assessment_id = request.assessment_id;
    let service = TreatmentPlanService::new(&config);

    let plan = service
        .create(request)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| not_found("Assessment", assessment_id))?;

    Ok((StatusCode::CREATED, Json(plan)))
}

#[axum::debug_handler]
pub async fn update_treatment_plan(
    State(config): State<Arc<AppConfig>>,
    Path(plan_id): Path<i64>,
    Json(changes): Json<TreatmentPlanUpdate>,
) -> Result<Json<TreatmentPlan>, AppError> {
    if matches!(changes.title.as_deref().map(str::trim), Some("")) {
        return Err(AppError::ValidationError("Treatment plan title cannot be empty".to_string()));
    }

    let service = TreatmentPlanService::new(&config);

    let plan = service
        .update(plan_id, &changes)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| not_found("Treatment plan", plan_id))?;

    Ok(Json(plan))
}
