use axum::http::HeaderMap;
use sha2::{Digest, Sha256};
use tracing::warn;

use shared_models::error::AppError;

pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// Compares digests so the comparison time does not depend on how much of the
/// presented secret matches.
pub fn secrets_match(presented: &str, expected: &str) -> bool {
    if expected.is_empty() {
        return false;
    }
    Sha256::digest(presented.as_bytes()) == Sha256::digest(expected.as_bytes())
}

pub fn verify_webhook_secret(headers: &HeaderMap, expected: &str, source: &str) -> Result<(), AppError> {
    if expected.is_empty() {
        warn!("Webhook secret for {} is not configured, rejecting request", source);
        return Err(AppError::Auth("Webhook secret not configured".to_string()));
    }

    let presented = headers
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            warn!("Webhook for {} is missing the secret header", source);
            AppError::Auth("Missing webhook secret".to_string())
        })?;

    if !secrets_match(presented.trim(), expected) {
        warn!("Webhook for {} presented an invalid secret", source);
        return Err(AppError::Auth("Invalid webhook secret".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::http::HeaderValue;

    #[test]
    fn matching_secret_passes() {
        let mut headers = HeaderMap::new();
        headers.insert(WEBHOOK_SECRET_HEADER, HeaderValue::from_static("s3cret"));

        assert!(verify_webhook_secret(&headers, "s3cret", "footcare").is_ok());
    }

    #[test]
    fn wrong_missing_or_unconfigured_secret_is_unauthorized() {
        let mut headers = HeaderMap::new();
        headers.insert(WEBHOOK_SECRET_HEADER, HeaderValue::from_static("guess"));

        assert_matches!(verify_webhook_secret(&headers, "s3cret", "footcare"), Err(AppError::Auth(_)));
        assert_matches!(verify_webhook_secret(&HeaderMap::new(), "s3cret", "footcare"), Err(AppError::Auth(_)));
        assert_matches!(verify_webhook_secret(&headers, "", "footcare"), Err(AppError::Auth(_)));
    }

    #[test]
    fn empty_expected_never_matches() {
        assert!(!secrets_match("", ""));
    }
}
