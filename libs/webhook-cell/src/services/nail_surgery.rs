use chrono::{DateTime, Utc};
use tracing::info;

use shared_config::AppConfig;
use shared_database::ClinicStore;
use shared_models::clinic::{ClinicGroup, NailSurgeryConsultation, NewNailSurgeryConsultation};

use crate::duplicate::{find_duplicate, DuplicateWindow};
use crate::error::WebhookError;
use crate::normalize::NormalizedSubmission;
use crate::services::ingest::resolve_image;

#[derive(Debug)]
pub enum NailSurgeryOutcome {
    Duplicate { existing_id: i64 },
    Created(NailSurgeryConsultation),
}

/// Nail surgery submissions go straight into their own table without patient
/// or assessment linking.
pub struct NailSurgeryService {
    store: ClinicStore,
    bucket: String,
    window: DuplicateWindow,
}

impl NailSurgeryService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: ClinicStore::new(config),
            bucket: config.supabase_storage_bucket.clone(),
            window: DuplicateWindow::from_seconds(config.duplicate_window_seconds),
        }
    }

    pub async fn ingest(&self, submission: NormalizedSubmission) -> Result<NailSurgeryOutcome, WebhookError> {
        self.ingest_at(submission, Utc::now()).await
    }

    pub async fn ingest_at(
        &self,
        submission: NormalizedSubmission,
        now: DateTime<Utc>,
    ) -> Result<NailSurgeryOutcome, WebhookError> {
        let recent = self
            .store
            .recent_nail_surgery_by_email(&submission.email, &self.window.since(now))
            .await?;

        if let Some(existing) = find_duplicate(&recent, &submission.name, &submission.email, self.window, now) {
            info!("Suppressing duplicate nail surgery submission {}", existing.id);
            return Ok(NailSurgeryOutcome::Duplicate { existing_id: existing.id });
        }

        let image = resolve_image(
            &self.store,
            &self.bucket,
            ClinicGroup::NailSurgery.as_str(),
            submission.image.as_deref(),
        )
        .await?;

        let nail_issue = match (submission.issue_category, submission.issue_specifics) {
            (Some(category), Some(specifics)) => Some(format!("{}: {}", category, specifics)),
            (category, specifics) => category.or(specifics),
        };

        let created = self
            .store
            .create_nail_surgery_consultation(&NewNailSurgeryConsultation {
                name: submission.name,
                email: submission.email,
                phone: submission.phone,
                preferred_clinic: submission.preferred_clinic,
                nail_issue,
                symptom_description: submission.symptom_description,
                previous_treatment: submission.previous_treatment,
                image_url: image.map(|i| i.url),
                calendar_booking: submission.calendar_booking,
                survey_response: submission.survey_response,
                raw_payload: submission.raw,
            })
            .await?;

        info!("Stored nail surgery consultation {}", created.id);
        Ok(NailSurgeryOutcome::Created(created))
    }
}
