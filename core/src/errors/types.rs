//! Error types for the storage and delivery seams, plus the wire error body

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use super::OtpError;

/// Failures reported by an `OtpStore` implementation
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Corrupt verification record: {0}")]
    Corrupt(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Failures reported by a `NotificationSender` implementation
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Provider rejected message: {0}")]
    Rejected(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Delivery timed out after {0:?}")]
    Timeout(Duration),

    #[error("Provider misconfigured: {0}")]
    Configuration(String),
}

/// Error body returned to API clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,

    /// Machine-readable error code
    pub error: String,

    /// Human-readable message
    pub message: String,

    /// Seconds to wait before retrying
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<u64>,

    /// Response timestamp
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: message.into(),
            retry_after_seconds: None,
            timestamp: Utc::now(),
        }
    }
}

impl From<&OtpError> for ErrorResponse {
    fn from(err: &OtpError) -> Self {
        Self {
            retry_after_seconds: err.retry_after_seconds(),
            ..Self::new(err.error_code(), err.user_message())
        }
    }
}
