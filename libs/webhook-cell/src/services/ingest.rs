use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::ClinicStore;
use shared_models::clinic::{
    Assessment, AssessmentStatus, ClinicGroup, Consultation, Image, NewAssessment,
    NewConsultation, NewImage, NewPatient, Patient, PatientUpdate,
};

use crate::duplicate::{find_duplicate, names_match, DuplicateWindow};
use crate::error::WebhookError;
use crate::images::{extension_for, file_name_from_url, ImageSource};
use crate::normalize::NormalizedSubmission;
use crate::risk::assess_risk;

#[derive(Debug)]
pub enum IngestOutcome {
    Duplicate {
        existing_id: i64,
    },
    Created {
        patient: Patient,
        assessment: Assessment,
        consultation: Consultation,
        image: Option<Image>,
    },
}

/// Image after it has been resolved to a stable URL.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub url: String,
    pub file_name: String,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
}

/// Uploads inline images to storage; hosted images pass through unchanged.
pub async fn resolve_image(
    store: &ClinicStore,
    bucket: &str,
    folder: &str,
    raw: Option<&str>,
) -> Result<Option<StoredImage>, WebhookError> {
    let Some(source) = raw.map(ImageSource::parse).transpose()?.flatten() else {
        return Ok(None);
    };

    match source {
        ImageSource::Inline { mime_type, bytes } => {
            let file_name = format!("{}.{}", Uuid::new_v4(), extension_for(&mime_type));
            let object_path = format!("{}/{}", folder, file_name);
            let size_bytes = bytes.len() as i64;

            let url = store
                .supabase()
                .upload_object(bucket, &object_path, bytes, &mime_type)
                .await?;
            debug!("Uploaded consultation image to {}", object_path);

            Ok(Some(StoredImage {
                url,
                file_name,
                mime_type: Some(mime_type),
                size_bytes: Some(size_bytes),
            }))
        }
        ImageSource::Remote(url) => Ok(Some(StoredImage {
            file_name: file_name_from_url(&url),
            url,
            mime_type: None,
            size_bytes: None,
        })),
    }
}

pub struct ConsultationIngestService {
    store: ClinicStore,
    bucket: String,
    window: DuplicateWindow,
}

impl ConsultationIngestService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: ClinicStore::new(config),
            bucket: config.supabase_storage_bucket.clone(),
            window: DuplicateWindow::from_seconds(config.duplicate_window_seconds),
        }
    }

    pub async fn ingest(
        &self,
        clinic_group: ClinicGroup,
        submission: NormalizedSubmission,
    ) -> Result<IngestOutcome, WebhookError> {
        self.ingest_at(clinic_group, submission, Utc::now()).await
    }

    pub async fn ingest_at(
        &self,
        clinic_group: ClinicGroup,
        submission: NormalizedSubmission,
        now: DateTime<Utc>,
    ) -> Result<IngestOutcome, WebhookError> {
        let since = self.window.since(now);

        let recent = self
            .store
            .recent_consultations_by_email(clinic_group, &submission.email, &since)
            .await?;
        if let Some(existing) = find_duplicate(&recent, &submission.name, &submission.email, self.window, now) {
            info!(
                "Suppressing duplicate {} submission, consultation {} created at {}",
                clinic_group, existing.id, existing.created_at
            );
            return Ok(IngestOutcome::Duplicate { existing_id: existing.id });
        }

        let existing_patient = self.store.find_patient_by_email(&submission.email).await?;

        if let Some(patient) = existing_patient.as_ref().filter(|p| names_match(&p.name, &submission.name)) {
            let recent_assessments = self
                .store
                .assessments_for_patient_since(patient.id, &since)
                .await?;
            if let Some(assessment) = recent_assessments
                .iter()
                .find(|a| a.clinic_group == clinic_group && self.window.contains(a.created_at, now))
            {
                info!(
                    "Suppressing duplicate {} submission, assessment {} created at {}",
                    clinic_group, assessment.id, assessment.created_at
                );
                return Ok(IngestOutcome::Duplicate { existing_id: assessment.id });
            }
        }

        let image = resolve_image(
            &self.store,
            &self.bucket,
            clinic_group.as_str(),
            submission.image.as_deref(),
        )
        .await?;

        let patient = self.upsert_patient(existing_patient, clinic_group, &submission).await?;

        let risk_level = assess_risk(
            submission.risk.as_deref(),
            &[
                submission.issue_category.as_deref(),
                submission.issue_specifics.as_deref(),
                submission.symptom_description.as_deref(),
            ],
        );

        let assessment = self
            .store
            .create_assessment(&NewAssessment {
                patient_id: patient.id,
                clinic_group,
                clinic_location: submission.preferred_clinic.clone(),
                primary_concern: submission.issue_category.clone(),
                risk_level,
                status: AssessmentStatus::New,
            })
            .await?;

        let consultation = self
            .store
            .create_consultation(&NewConsultation {
                patient_id: Some(patient.id),
                assessment_id: Some(assessment.id),
                clinic_group,
                name: submission.name,
                email: submission.email,
                phone: submission.phone,
                preferred_clinic: submission.preferred_clinic,
                issue_category: submission.issue_category,
                issue_specifics: submission.issue_specifics,
                symptom_description: submission.symptom_description,
                previous_treatment: submission.previous_treatment,
                has_image: image.is_some(),
                image_path: image.as_ref().map(|i| i.url.clone()),
                image_analysis: submission.image_analysis,
                calendar_booking: submission.calendar_booking,
                booking_confirmation: submission.booking_confirmation,
                final_question: submission.final_question,
                additional_help: submission.additional_help,
                emoji_survey: submission.emoji_survey,
                survey_response: submission.survey_response,
                conversation_log: submission.conversation_log,
                completed_steps: submission.completed_steps,
            })
            .await?;

        let image = match image {
            Some(stored) => Some(
                self.store
                    .create_image(&NewImage {
                        consultation_id: consultation.id,
                        file_name: stored.file_name,
                        mime_type: stored.mime_type,
                        size_bytes: stored.size_bytes,
                        url: stored.url,
                    })
                    .await?,
            ),
            None => None,
        };

        info!(
            "Stored {} consultation {} (patient {}, assessment {}, risk {})",
            clinic_group,
            consultation.id,
            patient.id,
            assessment.id,
            risk_level.as_str()
        );

        Ok(IngestOutcome::Created {
            patient,
            assessment,
            consultation,
            image,
        })
    }

    async fn upsert_patient(
        &self,
        existing: Option<Patient>,
        clinic_group: ClinicGroup,
        submission: &NormalizedSubmission,
    ) -> Result<Patient, WebhookError> {
        let Some(patient) = existing else {
            let created = self
                .store
                .create_patient(&NewPatient {
                    name: submission.name.clone(),
                    email: submission.email.clone(),
                    phone: submission.phone.clone(),
                    clinic_group,
                })
                .await?;
            debug!("Created patient {}", created.id);
            return Ok(created);
        };

        let changes = PatientUpdate {
            name: (patient.name != submission.name).then(|| submission.name.clone()),
            phone: submission
                .phone
                .clone()
                .filter(|phone| patient.phone.as_deref() != Some(phone.as_str())),
            clinic_group: (patient.clinic_group != clinic_group).then_some(clinic_group),
        };

        if changes.is_empty() {
            return Ok(patient);
        }

        debug!("Updating patient {} from new submission", patient.id);
        let id = patient.id;
        Ok(self.store.update_patient(id, &changes).await?.unwrap_or(patient))
    }
}
