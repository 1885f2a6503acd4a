//! Resubmission suppression.
//!
//! Chatbots retry on slow responses and patients double-tap submit, so a
//! submission whose email and name match a record created within the window
//! is treated as already received. This is a best-effort check: two requests
//! racing inside the same instant can both pass it.

use chrono::{DateTime, Duration, Utc};

use shared_models::clinic::{Consultation, NailSurgeryConsultation};

#[derive(Debug, Clone, Copy)]
pub struct DuplicateWindow {
    length: Duration,
}

impl DuplicateWindow {
    pub fn from_seconds(seconds: i64) -> Self {
        Self {
            length: Duration::seconds(seconds.max(0)),
        }
    }

    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.length
    }

    pub fn contains(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        created_at >= self.since(now) && created_at <= now
    }
}

impl Default for DuplicateWindow {
    fn default() -> Self {
        Self::from_seconds(60)
    }
}

fn fold(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub fn names_match(a: &str, b: &str) -> bool {
    fold(a) == fold(b)
}

/// A stored submission that can be compared against an incoming one.
pub trait Submitted {
    fn id(&self) -> i64;
    fn name(&self) -> &str;
    fn email(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
}

impl Submitted for Consultation {
    fn id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn email(&self) -> &str {
        &self.email
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Submitted for NailSurgeryConsultation {
    fn id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn email(&self) -> &str {
        &self.email
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

pub fn find_duplicate<'a, S: Submitted>(
    candidates: &'a [S],
    name: &str,
    email: &str,
    window: DuplicateWindow,
    now: DateTime<Utc>,
) -> Option<&'a S> {
    candidates.iter().find(|candidate| {
        candidate.email().eq_ignore_ascii_case(email)
            && names_match(candidate.name(), name)
            && window.contains(candidate.created_at(), now)
    })
}
