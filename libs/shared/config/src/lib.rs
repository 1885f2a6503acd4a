use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub supabase_storage_bucket: String,
    pub session_secret: String,
    pub admin_password: String,
    pub session_ttl_hours: i64,
    pub footcare_webhook_secret: String,
    pub lasercare_webhook_secret: String,
    pub nailsurgery_webhook_secret: String,
    pub duplicate_window_seconds: i64,
    pub port: u16,
}

fn required(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        warn!("{} not set, using empty value", key);
        String::new()
    })
}

fn parsed_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} is not a valid value ({}), using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: required("SUPABASE_URL"),
            supabase_service_key: required("SUPABASE_SERVICE_KEY"),
            supabase_storage_bucket: env::var("SUPABASE_STORAGE_BUCKET")
                .unwrap_or_else(|_| "consultation-images".to_string()),
            session_secret: required("SESSION_SECRET"),
            admin_password: required("ADMIN_PASSWORD"),
            session_ttl_hours: parsed_or("SESSION_TTL_HOURS", 12),
            footcare_webhook_secret: required("FOOTCARE_WEBHOOK_SECRET"),
            lasercare_webhook_secret: required("LASERCARE_WEBHOOK_SECRET"),
            nailsurgery_webhook_secret: required("NAILSURGERY_WEBHOOK_SECRET"),
            duplicate_window_seconds: parsed_or("DUPLICATE_WINDOW_SECONDS", 60),
            port: parsed_or("PORT", 3000),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_service_key.is_empty()
            && !self.session_secret.is_empty()
            && !self.admin_password.is_empty()
    }
}
