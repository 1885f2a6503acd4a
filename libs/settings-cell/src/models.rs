use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::clinic::{ChatbotSettings, ChatbotTone, ClinicEmailSettings};
use shared_models::error::AppError;
use shared_utils::validation::is_valid_email;

pub const MAX_BOT_NAME_LENGTH: usize = 40;
pub const MAX_WELCOME_MESSAGE_LENGTH: usize = 500;
pub const MAX_CTA_LABEL_LENGTH: usize = 40;
pub const MAX_RECIPIENTS: usize = 10;
pub const MAX_SUBJECT_PREFIX_LENGTH: usize = 60;

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Invalid recipient email: {0}")]
    InvalidEmail(String),

    #[error("At most {0} recipient emails are allowed")]
    TooManyRecipients(usize),

    #[error("Notifications need at least one recipient email")]
    NoRecipients,
}

impl From<SettingsError> for AppError {
    fn from(err: SettingsError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

/// Body of `PUT /chatbot-settings/{clinic_group}`. Omitted fields keep their
/// current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateChatbotSettingsRequest {
    pub tone: Option<ChatbotTone>,
    pub bot_name: Option<String>,
    pub welcome_message: Option<String>,
    pub cta_label: Option<String>,
}

impl UpdateChatbotSettingsRequest {
    pub fn apply_to(self, mut settings: ChatbotSettings) -> ChatbotSettings {
        if let Some(tone) = self.tone {
            settings.tone = tone;
        }
        if let Some(name) = self.bot_name {
            settings.bot_name = name.trim().to_string();
        }
        if let Some(message) = self.welcome_message {
            settings.welcome_message = message.trim().to_string();
        }
        if let Some(label) = self.cta_label {
            settings.cta_label = label.trim().to_string();
        }
        settings
    }
}

fn check_text(value: &str, field: &'static str, max: usize) -> Result<(), SettingsError> {
    if value.trim().is_empty() {
        return Err(SettingsError::Empty(field));
    }
    if value.chars().count() > max {
        return Err(SettingsError::TooLong { field, max });
    }
    Ok(())
}

pub fn validate_chatbot_settings(settings: &ChatbotSettings) -> Result<(), SettingsError> {
    check_text(&settings.bot_name, "bot_name", MAX_BOT_NAME_LENGTH)?;
    check_text(&settings.welcome_message, "welcome_message", MAX_WELCOME_MESSAGE_LENGTH)?;
    check_text(&settings.cta_label, "cta_label", MAX_CTA_LABEL_LENGTH)?;
    Ok(())
}

/// Body of `PUT /clinic-email-settings/{clinic_group}`. Omitted fields keep
/// their current value; an empty sender name or subject prefix clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEmailSettingsRequest {
    pub recipient_emails: Option<Vec<String>>,
    pub sender_name: Option<String>,
    pub subject_prefix: Option<String>,
    pub notifications_enabled: Option<bool>,
}

fn trimmed(value: &str) -> Option<String> {
    Some(value.trim().to_string()).filter(|v| !v.is_empty())
}

impl UpdateEmailSettingsRequest {
    /// Checks the fields present in the request. Recipient addresses are
    /// trimmed, lowercased and de-duplicated.
    pub fn normalize(mut self) -> Result<Self, SettingsError> {
        if let Some(raw_recipients) = self.recipient_emails.take() {
            let mut recipients: Vec<String> = Vec::with_capacity(raw_recipients.len());
            for raw in raw_recipients {
                let email = raw.trim().to_lowercase();
                if email.is_empty() {
                    continue;
                }
                if !is_valid_email(&email) {
                    return Err(SettingsError::InvalidEmail(raw));
                }
                if !recipients.contains(&email) {
                    recipients.push(email);
                }
            }

            if recipients.len() > MAX_RECIPIENTS {
                return Err(SettingsError::TooManyRecipients(MAX_RECIPIENTS));
            }
            self.recipient_emails = Some(recipients);
        }

        if self
            .subject_prefix
            .as_deref()
            .and_then(trimmed)
            .is_some_and(|p| p.chars().count() > MAX_SUBJECT_PREFIX_LENGTH)
        {
            return Err(SettingsError::TooLong {
                field: "subject_prefix",
                max: MAX_SUBJECT_PREFIX_LENGTH,
            });
        }

        Ok(self)
    }

    /// Merges a normalized request onto the current row.
    pub fn apply_to(
        self,
        mut settings: ClinicEmailSettings,
    ) -> Result<ClinicEmailSettings, SettingsError> {
        if let Some(recipients) = self.recipient_emails {
            settings.recipient_emails = recipients;
        }
        if let Some(name) = self.sender_name {
            settings.sender_name = trimmed(&name);
        }
        if let Some(prefix) = self.subject_prefix {
            settings.subject_prefix = trimmed(&prefix);
        }
        if let Some(enabled) = self.notifications_enabled {
            settings.notifications_enabled = enabled;
        }

        if settings.notifications_enabled && settings.recipient_emails.is_empty() {
            return Err(SettingsError::NoRecipients);
        }
        Ok(settings)
    }
}
