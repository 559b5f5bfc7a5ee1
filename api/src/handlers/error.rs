//! Mapping of lifecycle errors to HTTP responses
//!
//! Client mistakes are 400, throttling is 429 with a `Retry-After` header,
//! delivery outages are 503 and everything else is a 500 whose detail stays
//! in the logs.

use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::{header, StatusCode},
    HttpRequest, HttpResponse,
};
use std::collections::HashMap;
use validator::ValidationErrors;

use pv_core::errors::{ErrorResponse, OtpError};

use crate::dto::ValidationErrorResponse;

/// HTTP status for a lifecycle error
pub fn status_for(error: &OtpError) -> StatusCode {
    match error {
        OtpError::InvalidPhoneFormat
        | OtpError::AttemptsExceeded
        | OtpError::InvalidOrExpired
        | OtpError::InvalidCode { .. } => StatusCode::BAD_REQUEST,
        OtpError::RateLimited { .. } | OtpError::CooldownActive { .. } => {
            StatusCode::TOO_MANY_REQUESTS
        }
        OtpError::DeliveryFailed => StatusCode::SERVICE_UNAVAILABLE,
        OtpError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Build the response for a lifecycle error
pub fn error_response(error: &OtpError) -> HttpResponse {
    let status = status_for(error);

    match error {
        OtpError::Internal { message } => {
            tracing::error!(error_code = error.error_code(), "Request failed: {}", message);
        }
        _ if status.is_server_error() => {
            tracing::warn!(error_code = error.error_code(), "Request failed: {}", error);
        }
        _ => {
            tracing::info!(error_code = error.error_code(), "Request rejected: {}", error);
        }
    }

    let mut builder = HttpResponse::build(status);
    if let Some(seconds) = error.retry_after_seconds() {
        builder.insert_header((header::RETRY_AFTER, seconds.to_string()));
    }
    builder.json(ErrorResponse::from(error))
}

/// Build the 400 response for a body that failed field validation
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let field_errors: HashMap<String, Vec<String>> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect();

    tracing::info!(fields = ?field_errors.keys().collect::<Vec<_>>(), "Request validation failed");

    HttpResponse::BadRequest().json(ValidationErrorResponse::new(field_errors))
}

/// `JsonConfig` error handler: malformed or mistyped bodies become a 400 in
/// the validation error shape
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let mut errors = HashMap::new();
    errors.insert("body".to_string(), vec![err.to_string()]);

    let response = HttpResponse::BadRequest().json(ValidationErrorResponse::new(errors));
    InternalError::from_response(err, response).into()
}
