use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use serde_json::{json, Value};
use tracing::{debug, info};

use realtime_cell::{LiveEvent, LiveEventKind, LiveUpdateHub};
use shared_config::AppConfig;
use shared_models::clinic::ClinicGroup;
use shared_models::error::AppError;
use shared_utils::secret::verify_webhook_secret;

use crate::error::WebhookError;
use crate::normalize::parse_submission;
use crate::services::{ConsultationIngestService, IngestOutcome, NailSurgeryOutcome, NailSurgeryService};

fn secret_for(config: &AppConfig, clinic_group: ClinicGroup) -> &str {
    match clinic_group {
        ClinicGroup::FootCare => &config.footcare_webhook_secret,
        ClinicGroup::LaserCare => &config.lasercare_webhook_secret,
        ClinicGroup::NailSurgery => &config.nailsurgery_webhook_secret,
    }
}

fn duplicate_response(existing_id: i64) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "id": existing_id,
            "duplicate": true
        })),
    )
}

/// `POST /api/webhooks/{clinic}`
pub async fn receive_clinic_webhook(
    State(config): State<Arc<AppConfig>>,
    Extension(hub): Extension<LiveUpdateHub>,
    Path(clinic): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let clinic_group: ClinicGroup = clinic
        .parse()
        .map_err(|_| WebhookError::UnknownClinic(clinic.clone()))?;

    if clinic_group == ClinicGroup::NailSurgery {
        return receive_nail_surgery(&config, &hub, &headers, &body).await;
    }

    verify_webhook_secret(&headers, secret_for(&config, clinic_group), clinic_group.as_str())?;
    debug!("Received {} webhook ({} bytes)", clinic_group, body.len());

    let submission = parse_submission(&body)?;
    let service = ConsultationIngestService::new(&config);

    match service.ingest(clinic_group, submission).await? {
        IngestOutcome::Duplicate { existing_id } => Ok(duplicate_response(existing_id)),
        IngestOutcome::Created {
            patient,
            assessment,
            consultation,
            image,
        } => {
            hub.publish(&LiveEvent::new(
                LiveEventKind::AssessmentCreated,
                clinic_group,
                json!({
                    "assessment_id": assessment.id,
                    "consultation_id": consultation.id,
                    "patient_id": patient.id,
                    "patient_name": patient.name,
                    "risk_level": assessment.risk_level,
                    "status": assessment.status,
                    "primary_concern": assessment.primary_concern,
                    "clinic_location": assessment.clinic_location,
                    "has_image": image.is_some(),
                }),
            ));

            Ok((
                StatusCode::CREATED,
                Json(json!({
                    "id": consultation.id,
                    "patient_id": patient.id,
                    "assessment_id": assessment.id,
                    "duplicate": false
                })),
            ))
        }
    }
}

/// `POST /api/webhooks/nailsurgery`
pub async fn receive_nail_surgery_webhook(
    State(config): State<Arc<AppConfig>>,
    Extension(hub): Extension<LiveUpdateHub>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), AppError> {
    receive_nail_surgery(&config, &hub, &headers, &body).await
}

async fn receive_nail_surgery(
    config: &AppConfig,
    hub: &LiveUpdateHub,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<(StatusCode, Json<Value>), AppError> {
    verify_webhook_secret(headers, &config.nailsurgery_webhook_secret, ClinicGroup::NailSurgery.as_str())?;
    debug!("Received nail surgery webhook ({} bytes)", body.len());

    let submission = parse_submission(body)?;
    let service = NailSurgeryService::new(config);

    match service.ingest(submission).await? {
        NailSurgeryOutcome::Duplicate { existing_id } => Ok(duplicate_response(existing_id)),
        NailSurgeryOutcome::Created(consultation) => {
            hub.publish(&LiveEvent::new(
                LiveEventKind::ConsultationCreated,
                ClinicGroup::NailSurgery,
                json!({
                    "consultation_id": consultation.id,
                    "name": consultation.name,
                    "nail_issue": consultation.nail_issue,
                    "preferred_clinic": consultation.preferred_clinic,
                }),
            ));
            info!("Nail surgery consultation {} accepted", consultation.id);

            Ok((
                StatusCode::CREATED,
                Json(json!({
                    "id": consultation.id,
                    "duplicate": false
                })),
            ))
        }
    }
}
