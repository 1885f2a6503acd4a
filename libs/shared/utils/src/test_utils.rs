use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::{json, Value};

use shared_config::AppConfig;

use crate::session::{issue_session_token, SESSION_COOKIE};

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub session_secret: String,
    pub admin_password: String,
    pub webhook_secret: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
            session_secret: "test-session-secret-must-be-long-enough".to_string(),
            admin_password: "clinic-admin".to_string(),
            webhook_secret: "test-webhook-secret".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_supabase_url(url: impl Into<String>) -> Self {
        Self {
            supabase_url: url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            supabase_storage_bucket: "consultation-images".to_string(),
            session_secret: self.session_secret.clone(),
            admin_password: self.admin_password.clone(),
            session_ttl_hours: 12,
            footcare_webhook_secret: self.webhook_secret.clone(),
            lasercare_webhook_secret: self.webhook_secret.clone(),
            nailsurgery_webhook_secret: format!("{}-nails", self.webhook_secret),
            duplicate_window_seconds: 60,
            port: 3000,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct SessionTestUtils;

impl SessionTestUtils {
    pub fn valid_token(config: &AppConfig) -> String {
        issue_session_token(&config.session_secret, config.session_ttl_hours, Utc::now())
            .map(|(token, _)| token)
            .expect("test config has a session secret")
    }

    pub fn expired_token(config: &AppConfig) -> String {
        issue_session_token(&config.session_secret, 1, Utc::now() - Duration::hours(2))
            .map(|(token, _)| token)
            .expect("test config has a session secret")
    }

    pub fn cookie_header(token: &str) -> String {
        format!("{}={}", SESSION_COOKIE, token)
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn patient(id: i64, name: &str, email: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "email": email,
            "phone": "07700 900123",
            "clinic_group": "footcare",
            "created_at": "2024-01-01T00:00:00+00:00",
            "updated_at": "2024-01-01T00:00:00+00:00"
        })
    }

    pub fn assessment(id: i64, patient_id: i64, status: &str, risk_level: &str) -> Value {
        json!({
            "id": id,
            "patient_id": patient_id,
            "clinic_group": "footcare",
            "clinic_location": "Dublin",
            "primary_concern": "Nail problems",
            "risk_level": risk_level,
            "status": status,
            "notes": null,
            "created_at": "2024-01-01T00:00:00+00:00",
            "updated_at": "2024-01-01T00:00:00+00:00"
        })
    }

    pub fn consultation(id: i64, patient_id: i64, assessment_id: i64, name: &str, email: &str) -> Value {
        json!({
            "id": id,
            "patient_id": patient_id,
            "assessment_id": assessment_id,
            "clinic_group": "footcare",
            "name": name,
            "email": email,
            "phone": "07700 900123",
            "preferred_clinic": "Dublin",
            "issue_category": "Nail problems",
            "issue_specifics": "Ingrown toenail",
            "symptom_description": "Painful, red, \"throbbing\" toe",
            "previous_treatment": null,
            "has_image": false,
            "image_path": null,
            "created_at": Utc::now().to_rfc3339()
        })
    }

    pub fn error_response(message: &str, code: &str) -> Value {
        json!({
            "message": message,
            "code": code
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::validate_session_token;

    #[test]
    fn test_config_creation() {
        let config = TestConfig::default().to_app_config();

        assert_eq!(config.supabase_url, "http://localhost:54321");
        assert!(config.is_configured());
        assert_ne!(config.footcare_webhook_secret, config.nailsurgery_webhook_secret);
    }

    #[test]
    fn test_session_tokens() {
        let config = TestConfig::default().to_app_config();

        let token = SessionTestUtils::valid_token(&config);
        assert!(validate_session_token(&token, &config.session_secret, Utc::now()).is_ok());

        let expired = SessionTestUtils::expired_token(&config);
        assert!(validate_session_token(&expired, &config.session_secret, Utc::now()).is_err());
    }
}
