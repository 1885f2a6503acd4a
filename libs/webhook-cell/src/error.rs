use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("Unknown clinic: {0}")]
    UnknownClinic(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl From<WebhookError> for AppError {
    fn from(err: WebhookError) -> Self {
        match err {
            WebhookError::UnknownClinic(_) => AppError::NotFound(err.to_string()),
            WebhookError::MalformedPayload(_)
            | WebhookError::MissingField(_)
            | WebhookError::InvalidField { .. }
            | WebhookError::InvalidImage(_) => AppError::BadRequest(err.to_string()),
            WebhookError::Storage(_) => AppError::Database(err.to_string()),
        }
    }
}
