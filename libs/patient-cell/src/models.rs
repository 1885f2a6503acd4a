use serde::{Deserialize, Serialize};

use shared_models::clinic::{
    Assessment, ClinicGroup, CommunicationChannel, CommunicationDirection, Patient,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientSearchQuery {
    pub search: Option<String>,
    pub clinic_group: Option<ClinicGroup>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientWithAssessments {
    #[serde(flatten)]
    pub patient: Patient,
    pub assessments: Vec<Assessment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommunicationQuery {
    pub patient_id: Option<i64>,
    pub assessment_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommunicationRequest {
    pub patient_id: i64,
    pub assessment_id: Option<i64>,
    pub channel: CommunicationChannel,
    pub direction: CommunicationDirection,
    pub subject: Option<String>,
    pub message: String,
    pub sent_by: Option<String>,
}
