//! Phone verification route handlers
//!
//! - `POST /store/auth/phone/send-otp`
//! - `POST /store/auth/phone/verify-otp`
//! - `POST /store/auth/phone/resend-otp`

pub mod resend_otp;
pub mod send_otp;
pub mod verify_otp;

use actix_web::HttpRequest;

pub use resend_otp::resend_otp;
pub use send_otp::send_otp;
pub use verify_otp::verify_otp;

/// Identify the requesting client for rate limiting
///
/// Forwarding headers are only honored when the server sits behind a proxy
/// that sets them; otherwise a client could pick its own identity.
pub fn extract_client_ip(req: &HttpRequest, trust_forwarded_headers: bool) -> String {
    if trust_forwarded_headers {
        // First hop of X-Forwarded-For is the original client
        if let Some(forwarded_for) = req.headers().get("X-Forwarded-For") {
            if let Ok(forwarded_str) = forwarded_for.to_str() {
                if let Some(ip) = forwarded_str.split(',').next() {
                    let ip = ip.trim();
                    if !ip.is_empty() {
                        return ip.to_string();
                    }
                }
            }
        }

        if let Some(real_ip) = req.headers().get("X-Real-IP") {
            if let Ok(ip_str) = real_ip.to_str() {
                let ip = ip_str.trim();
                if !ip.is_empty() {
                    return ip.to_string();
                }
            }
        }
    }

    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
