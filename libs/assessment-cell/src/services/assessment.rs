use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::ClinicStore;
use shared_models::clinic::{Assessment, AssessmentFilter, AssessmentUpdate};

use crate::models::AssessmentDetail;
use crate::services::stats::{summarize, AssessmentStats};

/// Supabase's default `max-rows`; a shorter page is the last one.
const STATS_PAGE_SIZE: i64 = 1000;

pub struct AssessmentService {
    store: ClinicStore,
}

impl AssessmentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: ClinicStore::new(config),
        }
    }

    pub async fn list(&self, filter: &AssessmentFilter) -> Result<Vec<Assessment>> {
        debug!("Listing assessments with filter: {:?}", filter);
        self.store.list_assessments(filter).await
    }

    pub async fn get(&self, assessment_id: i64) -> Result<Option<Assessment>> {
        self.store.get_assessment(assessment_id).await
    }

    /// Loads an assessment with its patient, consultation and images.
    pub async fn detail(&self, assessment_id: i64) -> Result<Option<AssessmentDetail>> {
        let Some(assessment) = self.store.get_assessment(assessment_id).await? else {
            return Ok(None);
        };

        let patient = self.store.get_patient(assessment.patient_id).await?;
        let consultation = self.store.consultation_for_assessment(assessment_id).await?;
        let images = match &consultation {
            Some(consultation) => self.store.images_for_consultation(consultation.id).await?,
            None => Vec::new(),
        };

        Ok(Some(AssessmentDetail {
            assessment,
            patient,
            consultation,
            images,
        }))
    }

    pub async fn update(
        &self,
        assessment_id: i64,
        changes: &AssessmentUpdate,
    ) -> Result<Option<Assessment>> {
        let updated = self.store.update_assessment(assessment_id, changes).await?;
        if let Some(assessment) = &updated {
            info!(
                "Assessment {} updated (status: {}, risk: {})",
                assessment.id,
                assessment.status.as_str(),
                assessment.risk_level.as_str()
            );
        }
        Ok(updated)
    }

    /// Returns false when there was nothing to delete.
    pub async fn delete(&self, assessment_id: i64) -> Result<bool> {
        if self.store.get_assessment(assessment_id).await?.is_none() {
            return Ok(false);
        }

        self.store.delete_assessment(assessment_id).await?;
        info!("Assessment {} deleted", assessment_id);
        Ok(true)
    }

    pub async fn stats(&self) -> Result<AssessmentStats> {
        let mut rows = Vec::new();
        let mut offset = 0;

        loop {
            let page = self.store.assessment_summaries(STATS_PAGE_SIZE, offset).await?;
            let fetched = page.len() as i64;
            rows.extend(page);

            if fetched < STATS_PAGE_SIZE {
                break;
            }
            offset += STATS_PAGE_SIZE;
        }

        debug!("Computing assessment stats over {} rows", rows.len());
        Ok(summarize(&rows, Utc::now()))
    }
}
