use std::sync::OnceLock;

use regex::Regex;

const MAX_EMAIL_LENGTH: usize = 254;

fn email_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
}

/// Loose shape check: something@something.tld with no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_LENGTH && email_pattern().is_some_and(|p| p.is_match(email))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("jane.doe+clinic@mail.example.ie"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email("jane"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane doe@example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn rejects_overlong_addresses() {
        let local = "a".repeat(250);
        assert!(!is_valid_email(&format!("{}@example.com", local)));
    }
}
