//! Types for OTP lifecycle results

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Result of issuing and delivering a passcode
#[derive(Debug, Clone)]
pub struct SendOtpResult {
    /// Id of the persisted verification record
    pub verification_id: Uuid,
    /// Confirmation message for the caller
    pub message: String,
    /// When the passcode stops being accepted
    pub expires_at: DateTime<Utc>,
    /// Provider message id
    pub message_id: String,
}

/// Result of a successful verification
#[derive(Debug, Clone)]
pub struct VerifyOtpResult {
    /// Id of the verified record
    pub verification_id: Uuid,
    /// Confirmation message for the caller
    pub message: String,
}
