use serde::{Deserialize, Serialize};
use serde_json::Value;

use shared_models::clinic::{
    Assessment, AssessmentFilter, AssessmentStatus, ClinicGroup, Consultation, ConsultationFilter,
    Image, Patient, RiskLevel, TreatmentPlanStatus,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssessmentListQuery {
    pub clinic_group: Option<ClinicGroup>,
    pub status: Option<AssessmentStatus>,
    pub risk_level: Option<RiskLevel>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<AssessmentListQuery> for AssessmentFilter {
    fn from(query: AssessmentListQuery) -> Self {
        AssessmentFilter {
            clinic_group: query.clinic_group,
            status: query.status,
            risk_level: query.risk_level,
            limit: query.limit,
            offset: query.offset,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsultationListQuery {
    pub clinic_group: Option<ClinicGroup>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<ConsultationListQuery> for ConsultationFilter {
    fn from(query: ConsultationListQuery) -> Self {
        ConsultationFilter {
            clinic_group: query.clinic_group,
            limit: query.limit,
            offset: query.offset,
            ..Default::default()
        }
    }
}

/// An assessment together with everything linked to it.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentDetail {
    #[serde(flatten)]
    pub assessment: Assessment,
    pub patient: Option<Patient>,
    pub consultation: Option<Consultation>,
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreatmentPlanQuery {
    pub assessment_id: Option<i64>,
    pub patient_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTreatmentPlanRequest {
    pub assessment_id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub treatments: Vec<Value>,
    pub status: Option<TreatmentPlanStatus>,
}
