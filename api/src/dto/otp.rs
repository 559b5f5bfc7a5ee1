use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendOtpRequest {
    /// Phone number in national or international form
    /// Examples: "9812345678", "+977 981-234-5678"
    #[validate(length(min = 1, max = 32, message = "Phone number is required"))]
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(length(min = 1, max = 32, message = "Phone number is required"))]
    pub phone_number: String,

    /// 6-digit verification code
    #[validate(length(equal = 6, message = "OTP code must be 6 digits"))]
    pub otp_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResendOtpRequest {
    #[validate(length(min = 1, max = 32, message = "Phone number is required"))]
    pub phone_number: String,
}

/// Success body shared by the send, verify and resend routes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_id: Option<Uuid>,
}

impl OtpResponse {
    pub fn success(message: impl Into<String>, verification_id: Uuid) -> Self {
        Self {
            success: true,
            message: message.into(),
            verification_id: Some(verification_id),
        }
    }
}

/// Body for requests rejected before reaching the lifecycle manager
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub errors: HashMap<String, Vec<String>>,
}

impl ValidationErrorResponse {
    pub const ERROR_CODE: &'static str = "VALIDATION_ERROR";

    pub fn new(errors: HashMap<String, Vec<String>>) -> Self {
        Self {
            success: false,
            error: Self::ERROR_CODE.to_string(),
            message: "Invalid request data".to_string(),
            errors,
        }
    }
}
