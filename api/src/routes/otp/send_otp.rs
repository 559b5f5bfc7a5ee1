use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use pv_core::services::mask_phone;

use crate::app::AppState;
use crate::dto::{OtpResponse, SendOtpRequest};
use crate::handlers::{error_response, validation_error_response};

use super::extract_client_ip;

/// Handler for POST /store/auth/phone/send-otp
///
/// Issues a passcode and delivers it by SMS. Rate limited per client IP and
/// phone number.
///
/// # Request Body
///
/// ```json
/// { "phone_number": "9812345678" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "message": "OTP sent successfully to your mobile number.",
///     "verification_id": "550e8400-e29b-41d4-a716-446655440000"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: invalid body or phone format, attempts exhausted
/// - 429 Too Many Requests: rate limited, with `Retry-After`
/// - 503 Service Unavailable: SMS delivery failed
pub async fn send_otp(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<SendOtpRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    let client_ip = extract_client_ip(&req, state.trust_forwarded_headers);

    tracing::info!(
        phone = %mask_phone(&request.phone_number),
        client = %client_ip,
        "Processing send OTP request"
    );

    match state
        .otp_manager
        .send_otp_for_client(&client_ip, &request.phone_number)
        .await
    {
        Ok(result) => {
            HttpResponse::Ok().json(OtpResponse::success(result.message, result.verification_id))
        }
        Err(error) => error_response(&error),
    }
}
