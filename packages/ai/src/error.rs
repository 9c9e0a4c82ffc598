// ABOUTME: Error taxonomy for the AI gateway
// ABOUTME: Maps backend failures onto auth, empty-response and unknown categories

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Message shown when the backend rejects the configured credential
pub const INVALID_API_KEY_MESSAGE: &str = "Invalid API Key.";

/// Marker the backend places in error bodies for rejected keys
pub(crate) const API_KEY_INVALID_MARKER: &str = "API_KEY_INVALID";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Auth(String),

    #[error("AI generated an empty response.")]
    EmptyResponse,

    #[error("{0}")]
    Unknown(String),

    #[error("Video generation did not finish within {0:?}")]
    Timeout(Duration),

    #[error("Video generation was cancelled")]
    Cancelled,
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    pub fn invalid_api_key() -> Self {
        GatewayError::Auth(INVALID_API_KEY_MESSAGE.to_string())
    }

    /// Classify a free-form failure message the way the backend reports it
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains(API_KEY_INVALID_MARKER) {
            GatewayError::invalid_api_key()
        } else if message.trim().is_empty() {
            GatewayError::Unknown("An unexpected error occurred.".to_string())
        } else {
            GatewayError::Unknown(message)
        }
    }

    pub fn status(&self) -> ErrorStatus {
        match self {
            GatewayError::Auth(_) => ErrorStatus::AuthError,
            GatewayError::EmptyResponse => ErrorStatus::EmptyResponse,
            _ => ErrorStatus::Unknown,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Unknown(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            GatewayError::Unknown(format!(
                "Connection failed: {}. Please check your internet connection.",
                err
            ))
        } else {
            GatewayError::from_message(err.to_string())
        }
    }
}

/// Status label surfaced to users alongside a failure message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorStatus {
    AuthError,
    EmptyResponse,
    Unknown,
}

impl ErrorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorStatus::AuthError => "AUTH_ERROR",
            ErrorStatus::EmptyResponse => "EMPTY_RESPONSE",
            ErrorStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed failure record, as held by the document controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationError {
    pub status: ErrorStatus,
    pub message: String,
}

impl From<&GatewayError> for GenerationError {
    fn from(err: &GatewayError) -> Self {
        Self {
            status: err.status(),
            message: err.to_string(),
        }
    }
}
