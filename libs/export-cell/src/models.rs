use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use shared_models::clinic::ClinicGroup;
use shared_models::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportDataset {
    Consultations,
    Assessments,
    Patients,
}

impl ExportDataset {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportDataset::Consultations => "consultations",
            ExportDataset::Assessments => "assessments",
            ExportDataset::Patients => "patients",
        }
    }
}

impl fmt::Display for ExportDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportDataset {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "consultations" => Ok(ExportDataset::Consultations),
            "assessments" => Ok(ExportDataset::Assessments),
            "patients" => Ok(ExportDataset::Patients),
            other => Err(AppError::BadRequest(format!("Unknown export dataset: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(AppError::BadRequest(format!("Unknown export format: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
    pub clinic_group: Option<ClinicGroup>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Resolved export parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub dataset: ExportDataset,
    pub format: ExportFormat,
    pub clinic_group: Option<ClinicGroup>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl ExportRequest {
    pub fn parse(dataset: &str, query: ExportQuery) -> Result<Self, AppError> {
        let format = match query.format.as_deref() {
            Some(raw) => raw.parse()?,
            None => ExportFormat::default(),
        };

        let from = query.from.as_deref().map(|s| parse_bound(s, false)).transpose()?;
        let to = query.to.as_deref().map(|s| parse_bound(s, true)).transpose()?;
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(AppError::BadRequest("'from' must not be after 'to'".to_string()));
            }
        }

        Ok(Self {
            dataset: dataset.parse()?,
            format,
            clinic_group: query.clinic_group,
            from,
            to,
        })
    }
}

/// Accepts an RFC 3339 timestamp or a bare `YYYY-MM-DD` date. A bare date
/// used as an upper bound covers the whole day.
fn parse_bound(raw: &str, end_of_day: bool) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }

    let invalid = || AppError::BadRequest(format!("Invalid date: {}", raw));
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())?;
    let time = if end_of_day {
        date.and_hms_milli_opt(23, 59, 59, 999)
    } else {
        date.and_hms_opt(0, 0, 0)
    };

    time.map(|t| t.and_utc()).ok_or_else(invalid)
}
