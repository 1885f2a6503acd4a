//! Minimal RFC 4180 writer for dashboard exports.

use chrono::{DateTime, SecondsFormat, Utc};

use shared_models::clinic::{Assessment, Consultation, Patient};

/// A row type that can be written as CSV.
pub trait CsvRecord {
    fn header() -> &'static [&'static str];
    fn fields(&self) -> Vec<String>;
}

/// Quotes a field when it contains a delimiter, quote or line break.
pub fn escape_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn write_line(out: &mut String, fields: impl IntoIterator<Item = impl AsRef<str>>) {
    let line: Vec<String> = fields.into_iter().map(|f| escape_field(f.as_ref())).collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
}

pub fn to_csv<R: CsvRecord>(rows: &[R]) -> String {
    let mut out = String::new();
    write_line(&mut out, R::header().iter());
    for row in rows {
        write_line(&mut out, row.fields());
    }
    out
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn opt_id(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn ts(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl CsvRecord for Patient {
    fn header() -> &'static [&'static str] {
        &["id", "created_at", "name", "email", "phone", "clinic_group"]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            ts(&self.created_at),
            self.name.clone(),
            self.email.clone(),
            opt(&self.phone),
            self.clinic_group.to_string(),
        ]
    }
}

impl CsvRecord for Assessment {
    fn header() -> &'static [&'static str] {
        &[
            "id",
            "created_at",
            "clinic_group",
            "patient_id",
            "clinic_location",
            "primary_concern",
            "risk_level",
            "status",
            "notes",
        ]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            ts(&self.created_at),
            self.clinic_group.to_string(),
            self.patient_id.to_string(),
            opt(&self.clinic_location),
            opt(&self.primary_concern),
            self.risk_level.as_str().to_string(),
            self.status.as_str().to_string(),
            opt(&self.notes),
        ]
    }
}

impl CsvRecord for Consultation {
    fn header() -> &'static [&'static str] {
        &[
            "id",
            "created_at",
            "clinic_group",
            "patient_id",
            "assessment_id",
            "name",
            "email",
            "phone",
            "preferred_clinic",
            "issue_category",
            "issue_specifics",
            "symptom_description",
            "previous_treatment",
            "has_image",
            "image_path",
            "calendar_booking",
            "booking_confirmation",
            "survey_response",
        ]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            ts(&self.created_at),
            self.clinic_group.to_string(),
            opt_id(self.patient_id),
            opt_id(self.assessment_id),
            self.name.clone(),
            self.email.clone(),
            opt(&self.phone),
            opt(&self.preferred_clinic),
            opt(&self.issue_category),
            opt(&self.issue_specifics),
            opt(&self.symptom_description),
            opt(&self.previous_treatment),
            self.has_image.to_string(),
            opt(&self.image_path),
            opt(&self.calendar_booking),
            opt(&self.booking_confirmation),
            opt(&self.survey_response),
        ]
    }
}
