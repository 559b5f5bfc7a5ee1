//! Unit tests for OTP error types

use std::time::Duration;

use crate::errors::{DeliveryError, ErrorResponse, OtpError, StoreError};

#[test]
fn test_error_codes_are_stable() {
    assert_eq!(OtpError::InvalidPhoneFormat.error_code(), "INVALID_PHONE_FORMAT");
    assert_eq!(OtpError::AttemptsExceeded.error_code(), "ATTEMPTS_EXCEEDED");
    assert_eq!(OtpError::InvalidOrExpired.error_code(), "INVALID_OR_EXPIRED");
    assert_eq!(
        OtpError::InvalidCode { remaining_attempts: 2 }.error_code(),
        "INVALID_CODE"
    );
    assert_eq!(OtpError::DeliveryFailed.error_code(), "DELIVERY_FAILED");
    assert_eq!(
        OtpError::CooldownActive { retry_after_seconds: 30 }.error_code(),
        "COOLDOWN_ACTIVE"
    );
    assert_eq!(
        OtpError::RateLimited { retry_after_seconds: 30 }.error_code(),
        "RATE_LIMITED"
    );
    assert_eq!(OtpError::internal("boom").error_code(), "INTERNAL_ERROR");
}

#[test]
fn test_invalid_code_reports_remaining_attempts() {
    let error = OtpError::InvalidCode { remaining_attempts: 2 };
    assert!(error.to_string().contains("2 attempt(s) remaining"));
    assert!(error.is_client_error());
}

#[test]
fn test_internal_detail_is_hidden_from_users() {
    let error = OtpError::from(StoreError::Database("connection refused at 10.0.0.5".to_string()));

    assert!(error.to_string().contains("connection refused"));
    assert_eq!(error.user_message(), "Internal server error");
    assert!(!error.is_client_error());
}

#[test]
fn test_delivery_error_maps_to_delivery_failed() {
    let error: OtpError = DeliveryError::Timeout(Duration::from_secs(10)).into();
    assert!(matches!(error, OtpError::DeliveryFailed));
    assert!(!error.is_client_error());
}

#[test]
fn test_retry_after_only_for_throttling_errors() {
    assert_eq!(
        OtpError::RateLimited { retry_after_seconds: 42 }.retry_after_seconds(),
        Some(42)
    );
    assert_eq!(
        OtpError::CooldownActive { retry_after_seconds: 7 }.retry_after_seconds(),
        Some(7)
    );
    assert_eq!(OtpError::InvalidOrExpired.retry_after_seconds(), None);
}

#[test]
fn test_error_response_from_otp_error() {
    let response = ErrorResponse::from(&OtpError::RateLimited { retry_after_seconds: 15 });

    assert!(!response.success);
    assert_eq!(response.error, "RATE_LIMITED");
    assert_eq!(response.retry_after_seconds, Some(15));

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["retry_after_seconds"], 15);

    let response = ErrorResponse::from(&OtpError::InvalidOrExpired);
    let json = serde_json::to_value(&response).unwrap();
    assert!(json.get("retry_after_seconds").is_none());
    assert_eq!(json["message"], "Invalid or expired OTP code.");
}
