use serde_json::Value;
use thiserror::Error;

use crate::core::config::ConfigError;
use crate::core::retry::{Classify, FailureKind};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("Fundraiser not found")]
    NotFound { details: Value },

    #[error("Gemini API returned {status}")]
    GeminiStatus { status: u16, body: String },

    #[error("Failed to access Gemini API: {0}")]
    GeminiError(String),

    #[error("Failed to send email")]
    EmailRejected { status: u16, details: Value },

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Operation cancelled after {0} attempts")]
    Cancelled(u32),
}

impl ServiceError {
    /// HTTP status a handler answers with when this error reaches it.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::MissingFields(_) | ServiceError::InvalidRequest(_) => 400,
            ServiceError::NotFound { .. } => 404,
            ServiceError::Configuration(_)
            | ServiceError::GeminiStatus { .. }
            | ServiceError::GeminiError(_)
            | ServiceError::EmailRejected { .. }
            | ServiceError::HttpError(_)
            | ServiceError::Cancelled(_) => 500,
        }
    }
}

impl Classify for ServiceError {
    fn failure_kind(&self) -> FailureKind {
        match self {
            ServiceError::GeminiStatus { .. } => FailureKind::Unavailable,
            ServiceError::GeminiError(_) | ServiceError::HttpError(_) => FailureKind::Fault,
            _ => FailureKind::Fatal,
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(error: reqwest::Error) -> Self {
        ServiceError::HttpError(error.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(error: serde_json::Error) -> Self {
        ServiceError::InvalidRequest(error.to_string())
    }
}
