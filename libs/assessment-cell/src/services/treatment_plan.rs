use anyhow::Result;
use tracing::info;

use shared_config::AppConfig;
use shared_database::ClinicStore;
use shared_models::clinic::{
    NewTreatmentPlan, TreatmentPlan, TreatmentPlanStatus, TreatmentPlanUpdate,
};

use crate::models::{CreateTreatmentPlanRequest, TreatmentPlanQuery};

pub struct TreatmentPlanService {
    store: ClinicStore,
}

impl TreatmentPlanService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: ClinicStore::new(config),
        }
    }

    pub async fn list(&self, query: &TreatmentPlanQuery) -> Result<Vec<TreatmentPlan>> {
        self.store
            .list_treatment_plans(query.assessment_id, query.patient_id)
            .await
    }

    /// Creates a plan for an existing assessment. The patient is always taken
    /// from the assessment. Returns `None` when the assessment does not exist.
    pub async fn create(&self, request: CreateTreatmentPlanRequest) -> Result<Option<TreatmentPlan>> {
        let Some(assessment) = self.store.get_assessment(request.assessment_id).await? else {
            return Ok(None);
        };

        let plan = self
            .store
            .create_treatment_plan(&NewTreatmentPlan {
                assessment_id: assessment.id,
                patient_id: assessment.patient_id,
                title: request.title.trim().to_string(),
                description: request.description,
                treatments: request.treatments,
                status: request.status.unwrap_or(TreatmentPlanStatus::Draft),
            })
            .await?;

        info!("Treatment plan {} created for assessment {}", plan.id, assessment.id);
        Ok(Some(plan))
    }

    pub async fn update(
        &self,
        plan_id: i64,
        changes: &TreatmentPlanUpdate,
    ) -> Result<Option<TreatmentPlan>> {
        self.store.update_treatment_plan(plan_id, changes).await
    }
}
