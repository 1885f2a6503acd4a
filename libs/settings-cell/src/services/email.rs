use anyhow::Result;
use chrono::Utc;
use tracing::info;

use shared_config::AppConfig;
use shared_database::ClinicStore;
use shared_models::clinic::{ClinicEmailSettings, ClinicGroup};

pub struct EmailSettingsService {
    store: ClinicStore,
}

impl EmailSettingsService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: ClinicStore::new(config),
        }
    }

    pub async fn get(&self, clinic_group: ClinicGroup) -> Result<ClinicEmailSettings> {
        Ok(self
            .store
            .get_email_settings(clinic_group)
            .await?
            .unwrap_or_else(|| ClinicEmailSettings::defaults_for(clinic_group)))
    }

    pub async fn save(&self, mut settings: ClinicEmailSettings) -> Result<ClinicEmailSettings> {
        settings.updated_at = Some(Utc::now());
        let saved = self.store.upsert_email_settings(&settings).await?;
        info!(
            "Email settings saved for {} ({} recipients)",
            saved.clinic_group,
            saved.recipient_emails.len()
        );
        Ok(saved)
    }
}
