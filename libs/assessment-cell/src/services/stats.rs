use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::Value;

use shared_models::clinic::{AssessmentStatus, ClinicGroup, RiskLevel};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssessmentStats {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_risk: BTreeMap<String, usize>,
    pub by_clinic_group: BTreeMap<String, usize>,
    pub last_7_days: usize,
}

/// Aggregates assessment summary rows. Every known status, risk level and
/// clinic group is present in the output, even with a zero count.
pub fn summarize(rows: &[Value], now: DateTime<Utc>) -> AssessmentStats {
    let mut stats = AssessmentStats {
        total: rows.len(),
        ..Default::default()
    };

    for status in AssessmentStatus::ALL {
        stats.by_status.insert(status.as_str().to_string(), 0);
    }
    for risk in RiskLevel::ALL {
        stats.by_risk.insert(risk.as_str().to_string(), 0);
    }
    for group in ClinicGroup::ALL {
        stats.by_clinic_group.insert(group.as_str().to_string(), 0);
    }

    let week_ago = now - Duration::days(7);

    for row in rows {
        if let Some(status) = row["status"].as_str() {
            *stats.by_status.entry(status.to_string()).or_default() += 1;
        }
        if let Some(risk) = row["risk_level"].as_str() {
            *stats.by_risk.entry(risk.to_string()).or_default() += 1;
        }
        if let Some(group) = row["clinic_group"].as_str() {
            *stats.by_clinic_group.entry(group.to_string()).or_default() += 1;
        }

        let recent = row["created_at"]
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .is_some_and(|at| at.with_timezone(&Utc) >= week_ago);
        if recent {
            stats.last_7_days += 1;
        }
    }

    stats
}
