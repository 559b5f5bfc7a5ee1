use actix_web::{web, HttpResponse};
use validator::Validate;

use pv_core::services::mask_phone;

use crate::app::AppState;
use crate::dto::{OtpResponse, ResendOtpRequest};
use crate::handlers::{error_response, validation_error_response};

/// Handler for POST /store/auth/phone/resend-otp
///
/// Issues a fresh passcode once the resend cooldown has passed. Inside the
/// cooldown the response is 429 with the seconds left in `Retry-After`.
pub async fn resend_otp(
    state: web::Data<AppState>,
    request: web::Json<ResendOtpRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    tracing::info!(
        phone = %mask_phone(&request.phone_number),
        "Processing resend OTP request"
    );

    match state.otp_manager.resend_otp(&request.phone_number).await {
        Ok(result) => {
            HttpResponse::Ok().json(OtpResponse::success(result.message, result.verification_id))
        }
        Err(error) => error_response(&error),
    }
}
