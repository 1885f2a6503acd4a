//! Field normalization for chatbot payloads.
//!
//! The three clinic chatbots were built at different times and never agreed on
//! a payload shape: the same answer may arrive as `fullName`, `patient_name` or
//! `Name`, at the top level or nested under `data`/`answers`. Every logical
//! field therefore has a list of aliases, and keys are compared after folding
//! case and dropping `_`, `-` and spaces.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

use shared_utils::validation::is_valid_email;

use crate::error::WebhookError;

/// Nested objects searched after the top level, in order.
pub const CONTAINERS: [&str; 8] = [
    "data",
    "formData",
    "form_data",
    "answers",
    "responses",
    "patient",
    "contact",
    "consultation",
];

pub mod aliases {
    pub const NAME: &[&str] = &[
        "name", "fullName", "patientName", "customerName", "contactName", "userName",
        "clientName", "yourName", "full_name", "patient_name",
    ];
    pub const FIRST_NAME: &[&str] = &["firstName", "first_name", "forename", "givenName"];
    pub const LAST_NAME: &[&str] = &["lastName", "last_name", "surname", "familyName"];
    pub const EMAIL: &[&str] = &[
        "email", "emailAddress", "patientEmail", "contactEmail", "userEmail", "customerEmail",
        "clientEmail", "mail", "e_mail", "yourEmail",
    ];
    pub const PHONE: &[&str] = &[
        "phone", "phoneNumber", "mobile", "mobileNumber", "telephone", "tel", "contactNumber",
        "cell", "cellPhone", "yourPhone",
    ];
    pub const PREFERRED_CLINIC: &[&str] = &[
        "preferredClinic", "clinicLocation", "location", "clinic", "branch", "selectedClinic",
        "preferredLocation", "clinicName", "chosenClinic", "venue",
    ];
    pub const ISSUE_CATEGORY: &[&str] = &[
        "issueCategory", "issueType", "category", "concern", "primaryConcern", "problemType",
        "mainIssue", "issue", "condition", "reason",
    ];
    pub const ISSUE_SPECIFICS: &[&str] = &[
        "issueSpecifics", "specificIssue", "subCategory", "issueDetail", "nailSpecifics",
        "painSpecifics", "skinSpecifics", "laserSpecifics", "specificConcern", "details",
    ];
    pub const SYMPTOM_DESCRIPTION: &[&str] = &[
        "symptomDescription", "symptoms", "description", "issueDescription",
        "problemDescription", "symptomDetails", "message", "additionalInfo", "comments", "notes",
    ];
    pub const PREVIOUS_TREATMENT: &[&str] = &[
        "previousTreatment", "treatmentHistory", "priorTreatment", "previousTreatments",
        "triedTreatments", "pastTreatment", "treatmentsTried", "hadTreatment", "otherTreatment",
        "treatment",
    ];
    pub const IMAGE: &[&str] = &[
        "imageUrl", "imagePath", "photoUrl", "uploadedImageUrl", "image", "photo", "imageData",
        "nailImage", "footImage", "upload",
    ];
    pub const IMAGE_ANALYSIS: &[&str] = &[
        "imageAnalysis", "aiAnalysis", "analysis", "imageAssessment", "photoAnalysis",
        "visionAnalysis", "imageDescription", "imageResult", "aiResult", "imageNotes",
    ];
    pub const CALENDAR_BOOKING: &[&str] = &[
        "calendarBooking", "bookingDate", "appointmentDate", "preferredDate", "appointment",
        "booking", "bookingTime", "appointmentTime", "preferredTime", "scheduledFor",
    ];
    pub const BOOKING_CONFIRMATION: &[&str] = &[
        "bookingConfirmation", "bookingConfirmed", "confirmationNumber", "confirmation",
        "bookingReference", "bookingId", "confirmationCode", "bookingStatus",
        "appointmentConfirmed", "confirmed",
    ];
    pub const FINAL_QUESTION: &[&str] = &[
        "finalQuestion", "finalQuestions", "anyQuestions", "questions", "lastQuestion",
        "otherQuestions", "question", "finalComments", "anythingElse", "closingQuestion",
    ];
    pub const ADDITIONAL_HELP: &[&str] = &[
        "additionalHelp", "additionalQuestions", "furtherHelp", "moreHelp", "helpNeeded",
        "extraHelp", "needHelp", "additionalSupport", "otherHelp", "followUp",
    ];
    pub const EMOJI_SURVEY: &[&str] = &[
        "emojiSurvey", "surveyEmoji", "satisfactionEmoji", "emojiRating", "ratingEmoji", "emoji",
        "feedbackEmoji", "moodEmoji", "experienceEmoji", "emojiFeedback",
    ];
    pub const SURVEY_RESPONSE: &[&str] = &[
        "surveyResponse", "survey", "feedback", "satisfaction", "rating", "experienceRating",
        "surveyAnswer", "feedbackText", "review", "npsScore",
    ];
    pub const RISK: &[&str] = &[
        "riskLevel", "urgency", "urgencyLevel", "priority", "severity", "risk", "triageLevel",
        "triage", "severityLevel", "urgent",
    ];
    pub const CONVERSATION_LOG: &[&str] = &[
        "conversationLog", "transcript", "chatHistory", "messages", "conversation", "chatLog",
        "history",
    ];
    pub const COMPLETED_STEPS: &[&str] = &[
        "completedSteps", "steps", "progress", "stepsCompleted", "journey",
    ];
}

fn compact_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(scalar_text).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        other => scalar_text(other),
    }
}

fn as_json(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Array(items) if items.is_empty() => None,
        Value::Object(map) if map.is_empty() => None,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            if trimmed.starts_with('[') || trimmed.starts_with('{') {
                if let Ok(parsed) = serde_json::from_str::<Value>(trimmed) {
                    return Some(parsed);
                }
            }
            Some(Value::String(trimmed.to_string()))
        }
        other => Some(other.clone()),
    }
}

/// Alias-aware view over a payload object and its nested containers.
pub struct PayloadFields<'a> {
    scopes: Vec<HashMap<String, &'a Value>>,
}

impl<'a> PayloadFields<'a> {
    pub fn new(root: &'a Map<String, Value>) -> Self {
        let mut scopes = vec![Self::index(root)];

        for container in CONTAINERS {
            if let Some(Value::Object(nested)) = root.get(container) {
                scopes.push(Self::index(nested));
            }
        }

        Self { scopes }
    }

    fn index(map: &'a Map<String, Value>) -> HashMap<String, &'a Value> {
        let mut index = HashMap::with_capacity(map.len());
        for (key, value) in map {
            index.entry(compact_key(key)).or_insert(value);
        }
        index
    }

    fn find<T>(&self, aliases: &[&str], convert: impl Fn(&Value) -> Option<T>) -> Option<T> {
        let wanted: Vec<String> = aliases.iter().map(|a| compact_key(a)).collect();

        self.scopes.iter().find_map(|scope| {
            wanted
                .iter()
                .find_map(|key| scope.get(key).and_then(|value| convert(*value)))
        })
    }

    /// First non-empty textual value under any alias.
    pub fn text(&self, aliases: &[&str]) -> Option<String> {
        self.find(aliases, as_text)
    }

    /// First non-empty value under any alias, keeping arrays and objects.
    pub fn json(&self, aliases: &[&str]) -> Option<Value> {
        self.find(aliases, as_json)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NormalizedSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub preferred_clinic: Option<String>,
    pub issue_category: Option<String>,
    pub issue_specifics: Option<String>,
    pub symptom_description: Option<String>,
    pub previous_treatment: Option<String>,
    pub image: Option<String>,
    pub image_analysis: Option<String>,
    pub calendar_booking: Option<String>,
    pub booking_confirmation: Option<String>,
    pub final_question: Option<String>,
    pub additional_help: Option<String>,
    pub emoji_survey: Option<String>,
    pub survey_response: Option<String>,
    pub risk: Option<String>,
    pub conversation_log: Option<Value>,
    pub completed_steps: Option<Value>,
    #[serde(skip)]
    pub raw: Value,
}

/// Parses a raw webhook body. Anything other than a JSON object is rejected.
pub fn parse_submission(body: &[u8]) -> Result<NormalizedSubmission, WebhookError> {
    let payload: Value = serde_json::from_slice(body)
        .map_err(|e| WebhookError::MalformedPayload(format!("invalid JSON: {}", e)))?;

    normalize_submission(payload)
}

pub fn normalize_submission(payload: Value) -> Result<NormalizedSubmission, WebhookError> {
    let mut submission = {
        let root = payload
            .as_object()
            .ok_or_else(|| WebhookError::MalformedPayload("expected a JSON object".to_string()))?;

        extract_fields(&PayloadFields::new(root))?
    };

    submission.raw = payload;
    Ok(submission)
}

fn extract_fields(fields: &PayloadFields<'_>) -> Result<NormalizedSubmission, WebhookError> {
    let name = fields
        .text(aliases::NAME)
        .or_else(|| {
            let parts: Vec<String> = [fields.text(aliases::FIRST_NAME), fields.text(aliases::LAST_NAME)]
                .into_iter()
                .flatten()
                .collect();
            (!parts.is_empty()).then(|| parts.join(" "))
        })
        .ok_or(WebhookError::MissingField("name"))?;

    let email = fields
        .text(aliases::EMAIL)
        .map(|email| email.to_lowercase())
        .ok_or(WebhookError::MissingField("email"))?;

    if !is_valid_email(&email) {
        return Err(WebhookError::InvalidField {
            field: "email",
            reason: format!("'{}' is not an email address", email),
        });
    }

    Ok(NormalizedSubmission {
        name,
        email,
        phone: fields.text(aliases::PHONE),
        preferred_clinic: fields.text(aliases::PREFERRED_CLINIC),
        issue_category: fields.text(aliases::ISSUE_CATEGORY),
        issue_specifics: fields.text(aliases::ISSUE_SPECIFICS),
        symptom_description: fields.text(aliases::SYMPTOM_DESCRIPTION),
        previous_treatment: fields.text(aliases::PREVIOUS_TREATMENT),
        image: fields.text(aliases::IMAGE),
        image_analysis: fields.text(aliases::IMAGE_ANALYSIS),
        calendar_booking: fields.text(aliases::CALENDAR_BOOKING),
        booking_confirmation: fields.text(aliases::BOOKING_CONFIRMATION),
        final_question: fields.text(aliases::FINAL_QUESTION),
        additional_help: fields.text(aliases::ADDITIONAL_HELP),
        emoji_survey: fields.text(aliases::EMOJI_SURVEY),
        survey_response: fields.text(aliases::SURVEY_RESPONSE),
        risk: fields.text(aliases::RISK),
        conversation_log: fields.json(aliases::CONVERSATION_LOG),
        completed_steps: fields.json(aliases::COMPLETED_STEPS),
        raw: Value::Null,
    })
}
