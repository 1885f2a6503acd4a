use anyhow::Result;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::ClinicStore;
use shared_models::clinic::{Assessment, AssessmentFilter, Patient, PatientUpdate};

use crate::models::{PatientSearchQuery, UpdatePatientRequest};

pub struct PatientService {
    store: ClinicStore,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: ClinicStore::new(config),
        }
    }

    pub async fn get_patient(&self, patient_id: i64) -> Result<Option<Patient>> {
        debug!("Fetching patient {}", patient_id);
        self.store.get_patient(patient_id).await
    }

    pub async fn search_patients(&self, query: PatientSearchQuery) -> Result<Vec<Patient>> {
        debug!("Searching patients with query: {:?}", query);
        self.store
            .list_patients(query.search.as_deref(), query.clinic_group, query.limit, query.offset)
            .await
    }

    pub async fn patient_assessments(&self, patient_id: i64) -> Result<Vec<Assessment>> {
        self.store
            .list_assessments(&AssessmentFilter {
                patient_id: Some(patient_id),
                ..Default::default()
            })
            .await
    }

    pub async fn update_patient(
        &self,
        patient_id: i64,
        request: UpdatePatientRequest,
    ) -> Result<Option<Patient>> {
        let changes = PatientUpdate {
            name: request.name.map(|n| n.trim().to_string()),
            phone: request.phone.map(|p| p.trim().to_string()),
            clinic_group: None,
        };

        if changes.is_empty() {
            return self.get_patient(patient_id).await;
        }

        debug!("Updating patient {}", patient_id);
        self.store.update_patient(patient_id, &changes).await
    }
}
