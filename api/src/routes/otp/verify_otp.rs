use actix_web::{web, HttpResponse};
use validator::Validate;

use pv_core::services::mask_phone;

use crate::app::AppState;
use crate::dto::{OtpResponse, VerifyOtpRequest};
use crate::handlers::{error_response, validation_error_response};

/// Handler for POST /store/auth/phone/verify-otp
///
/// Checks a submitted passcode against the most recent active one for the
/// phone number.
///
/// # Request Body
///
/// ```json
/// { "phone_number": "9812345678", "otp_code": "123456" }
/// ```
///
/// ## Errors
/// - 400 Bad Request: invalid body, wrong code, expired or exhausted passcode
pub async fn verify_otp(
    state: web::Data<AppState>,
    request: web::Json<VerifyOtpRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    tracing::info!(
        phone = %mask_phone(&request.phone_number),
        "Processing verify OTP request"
    );

    match state
        .otp_manager
        .verify_otp(&request.phone_number, &request.otp_code)
        .await
    {
        Ok(result) => {
            HttpResponse::Ok().json(OtpResponse::success(result.message, result.verification_id))
        }
        Err(error) => error_response(&error),
    }
}
