use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use shared_models::auth::{Session, SessionClaims};

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "clinic_session";
pub const SESSION_SUBJECT: &str = "admin";

fn sign(payload: &str, secret: &str) -> Result<Vec<u8>, String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| "Failed to create HMAC".to_string())?;
    mac.update(payload.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Issues a signed session token valid for `ttl_hours` from `now`.
pub fn issue_session_token(
    secret: &str,
    ttl_hours: i64,
    now: DateTime<Utc>,
) -> Result<(String, Session), String> {
    if secret.is_empty() {
        return Err("Session secret is not set".to_string());
    }

    let expires_at = now + Duration::hours(ttl_hours.max(1));
    let claims = SessionClaims {
        sub: SESSION_SUBJECT.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    let claims_json = serde_json::to_string(&claims).map_err(|e| e.to_string())?;
    let claims_b64 = URL_SAFE_NO_PAD.encode(claims_json);
    let signature_b64 = URL_SAFE_NO_PAD.encode(sign(&claims_b64, secret)?);

    let session = Session {
        subject: claims.sub,
        issued_at: now,
        expires_at,
    };

    Ok((format!("{}.{}", claims_b64, signature_b64), session))
}

pub fn validate_session_token(
    token: &str,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<Session, String> {
    if secret.is_empty() {
        return Err("Session secret is not set".to_string());
    }

    let (claims_b64, signature_b64) = token
        .split_once('.')
        .ok_or_else(|| "Invalid session format".to_string())?;

    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| "Invalid signature encoding".to_string())?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| "Failed to create HMAC".to_string())?;
    mac.update(claims_b64.as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Session signature verification failed");
        return Err("Invalid session signature".to_string());
    }

    let claims_json = URL_SAFE_NO_PAD
        .decode(claims_b64)
        .map_err(|_| "Invalid claims encoding".to_string())?;

    let claims: SessionClaims = serde_json::from_slice(&claims_json).map_err(|e| {
        debug!("Failed to parse session claims: {}", e);
        "Invalid claims format".to_string()
    })?;

    if claims.exp <= now.timestamp() {
        debug!("Session expired at {} (now: {})", claims.exp, now.timestamp());
        return Err("Session expired".to_string());
    }

    let issued_at = Utc
        .timestamp_opt(claims.iat, 0)
        .single()
        .ok_or_else(|| "Invalid issue time".to_string())?;
    let expires_at = Utc
        .timestamp_opt(claims.exp, 0)
        .single()
        .ok_or_else(|| "Invalid expiry time".to_string())?;

    Ok(Session {
        subject: claims.sub,
        issued_at,
        expires_at,
    })
}

pub fn session_cookie(token: &str, ttl_hours: i64) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE,
        token,
        ttl_hours.max(1) * 3600
    )
}

pub fn cleared_session_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "session-secret-for-tests";

    #[test]
    fn issued_token_validates() {
        let now = Utc::now();
        let (token, session) = issue_session_token(SECRET, 12, now).unwrap();

        let validated = validate_session_token(&token, SECRET, now).unwrap();
        assert_eq!(validated.subject, SESSION_SUBJECT);
        assert_eq!(validated.expires_at.timestamp(), session.expires_at.timestamp());
    }

    #[test]
    fn expired_token_is_rejected() {
        let issued = Utc::now() - Duration::hours(13);
        let (token, _) = issue_session_token(SECRET, 12, issued).unwrap();

        assert_eq!(
            validate_session_token(&token, SECRET, Utc::now()).unwrap_err(),
            "Session expired"
        );
    }

    #[test]
    fn tampered_or_foreign_tokens_are_rejected() {
        let now = Utc::now();
        let (token, _) = issue_session_token(SECRET, 12, now).unwrap();

        assert!(validate_session_token(&token, "another-secret", now).is_err());
        assert!(validate_session_token("not-a-token", SECRET, now).is_err());

        let (claims, signature) = token.split_once('.').unwrap();
        let forged = format!("{}x.{}", claims, signature);
        assert!(validate_session_token(&forged, SECRET, now).is_err());
    }

    #[test]
    fn empty_secret_never_issues() {
        assert!(issue_session_token("", 12, Utc::now()).is_err());
    }
}
