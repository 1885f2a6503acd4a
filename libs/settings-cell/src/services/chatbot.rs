use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::ClinicStore;
use shared_models::clinic::{ChatbotSettings, ClinicGroup};

pub struct ChatbotSettingsService {
    store: ClinicStore,
}

impl ChatbotSettingsService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: ClinicStore::new(config),
        }
    }

    /// Stored settings for the group, or the built-in defaults.
    pub async fn get(&self, clinic_group: ClinicGroup) -> Result<ChatbotSettings> {
        let stored = self.store.get_chatbot_settings(clinic_group).await?;
        if stored.is_none() {
            debug!("No chatbot settings stored for {}, using defaults", clinic_group);
        }
        Ok(stored.unwrap_or_else(|| ChatbotSettings::defaults_for(clinic_group)))
    }

    /// One entry per clinic group, in a fixed order.
    pub async fn list(&self) -> Result<Vec<ChatbotSettings>> {
        let mut stored = self.store.list_chatbot_settings().await?;

        Ok(ClinicGroup::ALL
            .into_iter()
            .map(|group| {
                stored
                    .iter()
                    .position(|s| s.clinic_group == group)
                    .map(|i| stored.swap_remove(i))
                    .unwrap_or_else(|| ChatbotSettings::defaults_for(group))
            })
            .collect())
    }

    pub async fn save(&self, mut settings: ChatbotSettings) -> Result<ChatbotSettings> {
        settings.updated_at = Some(Utc::now());
        let saved = self.store.upsert_chatbot_settings(&settings).await?;
        info!("Chatbot settings saved for {}", saved.clinic_group);
        Ok(saved)
    }
}
