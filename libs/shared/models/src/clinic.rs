use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =====================================================================================
// ENUMS
// =====================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClinicGroup {
    FootCare,
    NailSurgery,
    LaserCare,
}

impl ClinicGroup {
    pub const ALL: [ClinicGroup; 3] = [
        ClinicGroup::FootCare,
        ClinicGroup::NailSurgery,
        ClinicGroup::LaserCare,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClinicGroup::FootCare => "footcare",
            ClinicGroup::NailSurgery => "nailsurgery",
            ClinicGroup::LaserCare => "lasercare",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ClinicGroup::FootCare => "The FootCare Clinic",
            ClinicGroup::NailSurgery => "Nail Surgery Clinic",
            ClinicGroup::LaserCare => "Laser Care Clinic",
        }
    }
}

impl fmt::Display for ClinicGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClinicGroup {
    type Err = String;

    /// Lenient: ignores case, dashes, underscores and spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match compact.as_str() {
            "footcare" | "footcareclinic" | "thefootcareclinic" => Ok(ClinicGroup::FootCare),
            "nailsurgery" | "nailsurgeryclinic" => Ok(ClinicGroup::NailSurgery),
            "lasercare" | "lasercareclinic" | "laser" => Ok(ClinicGroup::LaserCare),
            _ => Err(format!("Unknown clinic group: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(format!("Unknown risk level: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    New,
    InReview,
    Contacted,
    Booked,
    Completed,
    Archived,
}

impl AssessmentStatus {
    pub const ALL: [AssessmentStatus; 6] = [
        AssessmentStatus::New,
        AssessmentStatus::InReview,
        AssessmentStatus::Contacted,
        AssessmentStatus::Booked,
        AssessmentStatus::Completed,
        AssessmentStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentStatus::New => "new",
            AssessmentStatus::InReview => "in_review",
            AssessmentStatus::Contacted => "contacted",
            AssessmentStatus::Booked => "booked",
            AssessmentStatus::Completed => "completed",
            AssessmentStatus::Archived => "archived",
        }
    }
}

impl FromStr for AssessmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(AssessmentStatus::New),
            "in_review" => Ok(AssessmentStatus::InReview),
            "contacted" => Ok(AssessmentStatus::Contacted),
            "booked" => Ok(AssessmentStatus::Booked),
            "completed" => Ok(AssessmentStatus::Completed),
            "archived" => Ok(AssessmentStatus::Archived),
            other => Err(format!("Unknown assessment status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreatmentPlanStatus {
    Draft,
    Active,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunicationChannel {
    Email,
    Sms,
    Phone,
    Note,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunicationDirection {
    Inbound,
    Outbound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatbotTone {
    Friendly,
    Professional,
    Reassuring,
    Clinical,
}

// =====================================================================================
// PATIENTS
// =====================================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub clinic_group: ClinicGroup,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPatient {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub clinic_group: ClinicGroup,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic_group: Option<ClinicGroup>,
}

impl PatientUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.clinic_group.is_none()
    }
}

// =====================================================================================
// ASSESSMENTS
// =====================================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub id: i64,
    pub patient_id: i64,
    pub clinic_group: ClinicGroup,
    pub clinic_location: Option<String>,
    pub primary_concern: Option<String>,
    pub risk_level: RiskLevel,
    pub status: AssessmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewAssessment {
    pub patient_id: i64,
    pub clinic_group: ClinicGroup,
    pub clinic_location: Option<String>,
    pub primary_concern: Option<String>,
    pub risk_level: RiskLevel,
    pub status: AssessmentStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssessmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AssessmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AssessmentUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.risk_level.is_none() && self.notes.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssessmentFilter {
    pub clinic_group: Option<ClinicGroup>,
    pub status: Option<AssessmentStatus>,
    pub risk_level: Option<RiskLevel>,
    pub patient_id: Option<i64>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// =====================================================================================
// CONSULTATIONS & IMAGES
// =====================================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consultation {
    pub id: i64,
    pub patient_id: Option<i64>,
    pub assessment_id: Option<i64>,
    pub clinic_group: ClinicGroup,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub preferred_clinic: Option<String>,
    pub issue_category: Option<String>,
    pub issue_specifics: Option<String>,
    pub symptom_description: Option<String>,
    pub previous_treatment: Option<String>,
    #[serde(default)]
    pub has_image: bool,
    pub image_path: Option<String>,
    pub image_analysis: Option<String>,
    pub calendar_booking: Option<String>,
    pub booking_confirmation: Option<String>,
    pub final_question: Option<String>,
    pub additional_help: Option<String>,
    pub emoji_survey: Option<String>,
    pub survey_response: Option<String>,
    pub conversation_log: Option<Value>,
    pub completed_steps: Option<Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewConsultation {
    pub patient_id: Option<i64>,
    pub assessment_id: Option<i64>,
    pub clinic_group: ClinicGroup,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub preferred_clinic: Option<String>,
    pub issue_category: Option<String>,
    pub issue_specifics: Option<String>,
    pub symptom_description: Option<String>,
    pub previous_treatment: Option<String>,
    pub has_image: bool,
    pub image_path: Option<String>,
    pub image_analysis: Option<String>,
    pub calendar_booking: Option<String>,
    pub booking_confirmation: Option<String>,
    pub final_question: Option<String>,
    pub additional_help: Option<String>,
    pub emoji_survey: Option<String>,
    pub survey_response: Option<String>,
    pub conversation_log: Option<Value>,
    pub completed_steps: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsultationFilter {
    pub clinic_group: Option<ClinicGroup>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub id: i64,
    pub consultation_id: i64,
    pub file_name: String,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewImage {
    pub consultation_id: i64,
    pub file_name: String,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub url: String,
}

// =====================================================================================
// TREATMENT PLANS & COMMUNICATIONS
// =====================================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreatmentPlan {
    pub id: i64,
    pub assessment_id: i64,
    pub patient_id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub treatments: Vec<Value>,
    pub status: TreatmentPlanStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTreatmentPlan {
    pub assessment_id: i64,
    pub patient_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub treatments: Vec<Value>,
    pub status: TreatmentPlanStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreatmentPlanUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatments: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TreatmentPlanStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Communication {
    pub id: i64,
    pub patient_id: i64,
    pub assessment_id: Option<i64>,
    pub channel: CommunicationChannel,
    pub direction: CommunicationDirection,
    pub subject: Option<String>,
    pub message: String,
    pub sent_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCommunication {
    pub patient_id: i64,
    pub assessment_id: Option<i64>,
    pub channel: CommunicationChannel,
    pub direction: CommunicationDirection,
    pub subject: Option<String>,
    pub message: String,
    pub sent_by: Option<String>,
}

// =====================================================================================
// SETTINGS
// =====================================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatbotSettings {
    pub clinic_group: ClinicGroup,
    pub tone: ChatbotTone,
    pub bot_name: String,
    pub welcome_message: String,
    pub cta_label: String,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ChatbotSettings {
    pub fn defaults_for(clinic_group: ClinicGroup) -> Self {
        let (bot_name, welcome_message) = match clinic_group {
            ClinicGroup::FootCare => (
                "Fiona",
                "Hi, I'm Fiona from The FootCare Clinic. Tell me a little about what's troubling your feet and I'll help you find the right appointment.",
            ),
            ClinicGroup::NailSurgery => (
                "Nia",
                "Hello, I'm Nia. I can help you understand your nail surgery options and get you booked in.",
            ),
            ClinicGroup::LaserCare => (
                "Lara",
                "Hi there, I'm Lara from Laser Care. Let's find out whether laser treatment is right for you.",
            ),
        };

        Self {
            clinic_group,
            tone: ChatbotTone::Friendly,
            bot_name: bot_name.to_string(),
            welcome_message: welcome_message.to_string(),
            cta_label: "Start your consultation".to_string(),
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicEmailSettings {
    pub clinic_group: ClinicGroup,
    #[serde(default)]
    pub recipient_emails: Vec<String>,
    pub sender_name: Option<String>,
    pub subject_prefix: Option<String>,
    #[serde(default)]
    pub notifications_enabled: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ClinicEmailSettings {
    pub fn defaults_for(clinic_group: ClinicGroup) -> Self {
        Self {
            clinic_group,
            recipient_emails: Vec::new(),
            sender_name: Some(clinic_group.display_name().to_string()),
            subject_prefix: Some(format!("[{}]", clinic_group.display_name())),
            notifications_enabled: false,
            updated_at: None,
        }
    }
}

// =====================================================================================
// NAIL SURGERY
// =====================================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NailSurgeryConsultation {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub preferred_clinic: Option<String>,
    pub nail_issue: Option<String>,
    pub symptom_description: Option<String>,
    pub previous_treatment: Option<String>,
    pub image_url: Option<String>,
    pub calendar_booking: Option<String>,
    pub survey_response: Option<String>,
    pub raw_payload: Option<Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewNailSurgeryConsultation {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub preferred_clinic: Option<String>,
    pub nail_issue: Option<String>,
    pub symptom_description: Option<String>,
    pub previous_treatment: Option<String>,
    pub image_url: Option<String>,
    pub calendar_booking: Option<String>,
    pub survey_response: Option<String>,
    pub raw_payload: Value,
}
