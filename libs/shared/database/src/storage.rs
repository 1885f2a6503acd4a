use anyhow::{anyhow, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Method,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_models::clinic::{
    Assessment, AssessmentFilter, AssessmentUpdate, ChatbotSettings, ClinicEmailSettings,
    ClinicGroup, Communication, Consultation, ConsultationFilter, Image, NailSurgeryConsultation,
    NewAssessment, NewCommunication, NewConsultation, NewImage, NewNailSurgeryConsultation,
    NewPatient, NewTreatmentPlan, Patient, PatientUpdate, TreatmentPlan, TreatmentPlanUpdate,
};

use crate::supabase::SupabaseClient;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 500;

pub fn eq(value: impl AsRef<str>) -> String {
    format!("eq.{}", urlencoding::encode(value.as_ref()))
}

pub fn timestamp(value: &DateTime<Utc>) -> String {
    urlencoding::encode(&value.to_rfc3339_opts(SecondsFormat::Millis, true)).into_owned()
}

fn page(limit: Option<i64>, offset: Option<i64>) -> String {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = offset.unwrap_or(0).max(0);
    format!("limit={}&offset={}", limit, offset)
}

fn representation() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static("return=representation"));
    headers
}

fn merge_duplicates() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "Prefer",
        HeaderValue::from_static("resolution=merge-duplicates,return=representation"),
    );
    headers
}

/// Typed CRUD access to the clinic tables over PostgREST.
pub struct ClinicStore {
    supabase: SupabaseClient,
}

impl ClinicStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub fn supabase(&self) -> &SupabaseClient {
        &self.supabase
    }

    // ---------------------------------------------------------------------------------
    // Generic helpers
    // ---------------------------------------------------------------------------------

    pub async fn select<R: DeserializeOwned>(&self, path: &str) -> Result<Vec<R>> {
        self.supabase.request(Method::GET, path, None).await
    }

    pub async fn select_one<R: DeserializeOwned>(&self, path: &str) -> Result<Option<R>> {
        let rows: Vec<R> = self.select(path).await?;
        Ok(rows.into_iter().next())
    }

    pub async fn insert<T: Serialize, R: DeserializeOwned>(&self, table: &str, row: &T) -> Result<R> {
        let rows: Vec<R> = self
            .supabase
            .request_with_headers(
                Method::POST,
                &format!("/rest/v1/{}", table),
                Some(serde_json::to_value(row)?),
                Some(representation()),
            )
            .await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Insert into {} returned no rows", table))
    }

    async fn patch<T: Serialize, R: DeserializeOwned>(
        &self,
        table: &str,
        id: i64,
        changes: &T,
    ) -> Result<Option<R>> {
        let mut body = serde_json::to_value(changes)?;
        if let Value::Object(map) = &mut body {
            map.insert("updated_at".to_string(), Value::String(Utc::now().to_rfc3339()));
        }

        let rows: Vec<R> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &format!("/rest/v1/{}?id=eq.{}", table, id),
                Some(body),
                Some(representation()),
            )
            .await?;

        Ok(rows.into_iter().next())
    }

    async fn upsert<T: Serialize, R: DeserializeOwned>(
        &self,
        table: &str,
        on_conflict: &str,
        row: &T,
    ) -> Result<R> {
        let rows: Vec<R> = self
            .supabase
            .request_with_headers(
                Method::POST,
                &format!("/rest/v1/{}?on_conflict={}", table, on_conflict),
                Some(serde_json::to_value(row)?),
                Some(merge_duplicates()),
            )
            .await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Upsert into {} returned no rows", table))
    }

    // ---------------------------------------------------------------------------------
    // Patients
    // ---------------------------------------------------------------------------------

    pub async fn find_patient_by_email(&self, email: &str) -> Result<Option<Patient>> {
        debug!("Looking up patient by email");
        self.select_one(&format!("/rest/v1/patients?email={}&limit=1", eq(email)))
            .await
    }

    pub async fn get_patient(&self, id: i64) -> Result<Option<Patient>> {
        self.select_one(&format!("/rest/v1/patients?id=eq.{}", id)).await
    }

    pub async fn create_patient(&self, patient: &NewPatient) -> Result<Patient> {
        self.insert("patients", patient).await
    }

    pub async fn update_patient(&self, id: i64, changes: &PatientUpdate) -> Result<Option<Patient>> {
        self.patch("patients", id, changes).await
    }

    pub async fn list_patients(
        &self,
        search: Option<&str>,
        clinic_group: Option<ClinicGroup>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Patient>> {
        let mut query = vec!["order=created_at.desc".to_string()];

        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            let pattern = urlencoding::encode(&format!("*{}*", term)).into_owned();
            query.push(format!("or=(name.ilike.{},email.ilike.{})", pattern, pattern));
        }
        if let Some(group) = clinic_group {
            query.push(format!("clinic_group=eq.{}", group));
        }
        query.push(page(limit, offset));

        self.select(&format!("/rest/v1/patients?{}", query.join("&"))).await
    }

    // ---------------------------------------------------------------------------------
    // Assessments
    // ---------------------------------------------------------------------------------

    pub async fn create_assessment(&self, assessment: &NewAssessment) -> Result<Assessment> {
        self.insert("assessments", assessment).await
    }

    pub async fn get_assessment(&self, id: i64) -> Result<Option<Assessment>> {
        self.select_one(&format!("/rest/v1/assessments?id=eq.{}", id)).await
    }

    pub async fn update_assessment(
        &self,
        id: i64,
        changes: &AssessmentUpdate,
    ) -> Result<Option<Assessment>> {
        self.patch("assessments", id, changes).await
    }

    pub async fn delete_assessment(&self, id: i64) -> Result<()> {
        self.supabase
            .execute(Method::DELETE, &format!("/rest/v1/assessments?id=eq.{}", id), None)
            .await
    }

    pub async fn list_assessments(&self, filter: &AssessmentFilter) -> Result<Vec<Assessment>> {
        let mut query = vec!["order=created_at.desc".to_string()];

        if let Some(group) = filter.clinic_group {
            query.push(format!("clinic_group=eq.{}", group));
        }
        if let Some(status) = filter.status {
            query.push(format!("status=eq.{}", status.as_str()));
        }
        if let Some(risk) = filter.risk_level {
            query.push(format!("risk_level=eq.{}", risk.as_str()));
        }
        if let Some(patient_id) = filter.patient_id {
            query.push(format!("patient_id=eq.{}", patient_id));
        }
        if let Some(from) = &filter.from {
            query.push(format!("created_at=gte.{}", timestamp(from)));
        }
        if let Some(to) = &filter.to {
            query.push(format!("created_at=lte.{}", timestamp(to)));
        }
        query.push(page(filter.limit, filter.offset));

        self.select(&format!("/rest/v1/assessments?{}", query.join("&"))).await
    }

    pub async fn assessments_for_patient_since(
        &self,
        patient_id: i64,
        since: &DateTime<Utc>,
    ) -> Result<Vec<Assessment>> {
        self.select(&format!(
            "/rest/v1/assessments?patient_id=eq.{}&created_at=gte.{}&order=created_at.desc",
            patient_id,
            timestamp(since)
        ))
        .await
    }

    /// Lightweight projection used for dashboard statistics.
    /// One page of the columns the dashboard stats aggregate over, in id order
    /// so consecutive pages do not overlap.
    pub async fn assessment_summaries(&self, limit: i64, offset: i64) -> Result<Vec<Value>> {
        self.select(&format!(
            "/rest/v1/assessments?select=status,risk_level,clinic_group,created_at&order=id.asc&limit={}&offset={}",
            limit.max(1),
            offset.max(0)
        ))
        .await
    }

    // ---------------------------------------------------------------------------------
    // Consultations & images
    // ---------------------------------------------------------------------------------

    pub async fn create_consultation(&self, consultation: &NewConsultation) -> Result<Consultation> {
        self.insert("consultations", consultation).await
    }

    pub async fn get_consultation(&self, id: i64) -> Result<Option<Consultation>> {
        self.select_one(&format!("/rest/v1/consultations?id=eq.{}", id)).await
    }

    pub async fn consultation_for_assessment(&self, assessment_id: i64) -> Result<Option<Consultation>> {
        self.select_one(&format!(
            "/rest/v1/consultations?assessment_id=eq.{}&limit=1",
            assessment_id
        ))
        .await
    }

    pub async fn list_consultations(&self, filter: &ConsultationFilter) -> Result<Vec<Consultation>> {
        let mut query = vec!["order=created_at.desc".to_string()];

        if let Some(group) = filter.clinic_group {
            query.push(format!("clinic_group=eq.{}", group));
        }
        if let Some(from) = &filter.from {
            query.push(format!("created_at=gte.{}", timestamp(from)));
        }
        if let Some(to) = &filter.to {
            query.push(format!("created_at=lte.{}", timestamp(to)));
        }
        query.push(page(filter.limit, filter.offset));

        self.select(&format!("/rest/v1/consultations?{}", query.join("&"))).await
    }

    pub async fn recent_consultations_by_email(
        &self,
        clinic_group: ClinicGroup,
        email: &str,
        since: &DateTime<Utc>,
    ) -> Result<Vec<Consultation>> {
        self.select(&format!(
            "/rest/v1/consultations?clinic_group=eq.{}&email={}&created_at=gte.{}&order=created_at.desc",
            clinic_group,
            eq(email),
            timestamp(since)
        ))
        .await
    }

    pub async fn create_image(&self, image: &NewImage) -> Result<Image> {
        self.insert("images", image).await
    }

    pub async fn images_for_consultation(&self, consultation_id: i64) -> Result<Vec<Image>> {
        self.select(&format!(
            "/rest/v1/images?consultation_id=eq.{}&order=created_at.asc",
            consultation_id
        ))
        .await
    }

    // ---------------------------------------------------------------------------------
    // Treatment plans
    // ---------------------------------------------------------------------------------

    pub async fn create_treatment_plan(&self, plan: &NewTreatmentPlan) -> Result<TreatmentPlan> {
        self.insert("treatment_plans", plan).await
    }

    pub async fn update_treatment_plan(
        &self,
        id: i64,
        changes: &TreatmentPlanUpdate,
    ) -> Result<Option<TreatmentPlan>> {
        self.patch("treatment_plans", id, changes).await
    }

    pub async fn list_treatment_plans(
        &self,
        assessment_id: Option<i64>,
        patient_id: Option<i64>,
    ) -> Result<Vec<TreatmentPlan>> {
        let mut query = vec!["order=created_at.desc".to_string()];
        if let Some(id) = assessment_id {
            query.push(format!("assessment_id=eq.{}", id));
        }
        if let Some(id) = patient_id {
            query.push(format!("patient_id=eq.{}", id));
        }

        self.select(&format!("/rest/v1/treatment_plans?{}", query.join("&"))).await
    }

    // ---------------------------------------------------------------------------------
    // Communications
    // ---------------------------------------------------------------------------------

    pub async fn create_communication(&self, communication: &NewCommunication) -> Result<Communication> {
        self.insert("communications", communication).await
    }

    pub async fn list_communications(
        &self,
        patient_id: Option<i64>,
        assessment_id: Option<i64>,
    ) -> Result<Vec<Communication>> {
        let mut query = vec!["order=created_at.desc".to_string()];
        if let Some(id) = patient_id {
            query.push(format!("patient_id=eq.{}", id));
        }
        if let Some(id) = assessment_id {
            query.push(format!("assessment_id=eq.{}", id));
        }

        self.select(&format!("/rest/v1/communications?{}", query.join("&"))).await
    }

    // ---------------------------------------------------------------------------------
    // Settings
    // ---------------------------------------------------------------------------------

    pub async fn get_chatbot_settings(&self, group: ClinicGroup) -> Result<Option<ChatbotSettings>> {
        self.select_one(&format!("/rest/v1/chatbot_settings?clinic_group=eq.{}", group))
            .await
    }

    pub async fn list_chatbot_settings(&self) -> Result<Vec<ChatbotSettings>> {
        self.select("/rest/v1/chatbot_settings").await
    }

    pub async fn upsert_chatbot_settings(&self, settings: &ChatbotSettings) -> Result<ChatbotSettings> {
        self.upsert("chatbot_settings", "clinic_group", settings).await
    }

    pub async fn get_email_settings(&self, group: ClinicGroup) -> Result<Option<ClinicEmailSettings>> {
        self.select_one(&format!(
            "/rest/v1/clinic_email_settings?clinic_group=eq.{}",
            group
        ))
        .await
    }

    pub async fn upsert_email_settings(
        &self,
        settings: &ClinicEmailSettings,
    ) -> Result<ClinicEmailSettings> {
        self.upsert("clinic_email_settings", "clinic_group", settings).await
    }

    // ---------------------------------------------------------------------------------
    // Nail surgery
    // ---------------------------------------------------------------------------------

    pub async fn create_nail_surgery_consultation(
        &self,
        consultation: &NewNailSurgeryConsultation,
    ) -> Result<NailSurgeryConsultation> {
        self.insert("nail_surgery_consultations", consultation).await
    }

    pub async fn recent_nail_surgery_by_email(
        &self,
        email: &str,
        since: &DateTime<Utc>,
    ) -> Result<Vec<NailSurgeryConsultation>> {
        self.select(&format!(
            "/rest/v1/nail_surgery_consultations?email={}&created_at=gte.{}&order=created_at.desc",
            eq(email),
            timestamp(since)
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn eq_filter_encodes_reserved_characters() {
        assert_eq!(eq("jane+test@example.com"), "eq.jane%2Btest%40example.com");
    }

    #[test]
    fn timestamp_filter_is_url_safe() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        assert_eq!(timestamp(&at), "2024-03-01T09%3A30%3A00.000Z");
    }

    #[test]
    fn page_clamps_limits() {
        assert_eq!(page(None, None), "limit=50&offset=0");
        assert_eq!(page(Some(10_000), Some(-5)), "limit=500&offset=0");
    }
}
