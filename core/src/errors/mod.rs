//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

// Re-export all error types
pub use types::{DeliveryError, ErrorResponse, StoreError};

use thiserror::Error;

/// Errors surfaced by the OTP lifecycle operations
///
/// `Display` yields the user-facing message, except for `Internal` whose
/// detail is meant for logs only. Use [`OtpError::user_message`] when
/// building a response.
#[derive(Error, Debug)]
pub enum OtpError {
    #[error("Invalid phone number format. Please provide a valid mobile number.")]
    InvalidPhoneFormat,

    #[error("Maximum OTP attempts exceeded. Please try again later.")]
    AttemptsExceeded,

    #[error("Invalid or expired OTP code.")]
    InvalidOrExpired,

    #[error("Invalid OTP code. {remaining_attempts} attempt(s) remaining.")]
    InvalidCode { remaining_attempts: u32 },

    #[error("Failed to send OTP SMS. Please try again.")]
    DeliveryFailed,

    #[error("Please wait {retry_after_seconds} seconds before requesting a new OTP.")]
    CooldownActive { retry_after_seconds: u64 },

    #[error("Too many OTP requests. Please try again in {retry_after_seconds} seconds.")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl OtpError {
    /// Stable machine-readable code for clients
    pub fn error_code(&self) -> &'static str {
        match self {
            OtpError::InvalidPhoneFormat => "INVALID_PHONE_FORMAT",
            OtpError::AttemptsExceeded => "ATTEMPTS_EXCEEDED",
            OtpError::InvalidOrExpired => "INVALID_OR_EXPIRED",
            OtpError::InvalidCode { .. } => "INVALID_CODE",
            OtpError::DeliveryFailed => "DELIVERY_FAILED",
            OtpError::CooldownActive { .. } => "COOLDOWN_ACTIVE",
            OtpError::RateLimited { .. } => "RATE_LIMITED",
            OtpError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to the caller
    pub fn user_message(&self) -> String {
        match self {
            OtpError::Internal { .. } => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    /// Seconds the caller should wait before retrying, when known
    pub fn retry_after_seconds(&self) -> Option<u64> {
        match self {
            OtpError::CooldownActive { retry_after_seconds }
            | OtpError::RateLimited { retry_after_seconds } => Some(*retry_after_seconds),
            _ => None,
        }
    }

    /// True for expected outcomes of user input, false for infrastructure failures
    pub fn is_client_error(&self) -> bool {
        !matches!(self, OtpError::DeliveryFailed | OtpError::Internal { .. })
    }

    /// Build an internal error from any displayable cause
    pub fn internal(message: impl Into<String>) -> Self {
        OtpError::Internal {
            message: message.into(),
        }
    }
}

impl From<StoreError> for OtpError {
    fn from(err: StoreError) -> Self {
        OtpError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<DeliveryError> for OtpError {
    fn from(_: DeliveryError) -> Self {
        OtpError::DeliveryFailed
    }
}

pub type OtpResult<T> = Result<T, OtpError>;
