use anyhow::Result;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::ClinicStore;
use shared_models::clinic::{Consultation, ConsultationFilter, Image};

pub struct ConsultationService {
    store: ClinicStore,
}

impl ConsultationService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: ClinicStore::new(config),
        }
    }

    pub async fn list(&self, filter: &ConsultationFilter) -> Result<Vec<Consultation>> {
        debug!("Listing consultations with filter: {:?}", filter);
        self.store.list_consultations(filter).await
    }

    pub async fn get(&self, consultation_id: i64) -> Result<Option<Consultation>> {
        self.store.get_consultation(consultation_id).await
    }

    pub async fn images(&self, consultation_id: i64) -> Result<Vec<Image>> {
        self.store.images_for_consultation(consultation_id).await
    }
}
