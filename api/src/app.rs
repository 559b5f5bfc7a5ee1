//! Application state and factory
//!
//! This module holds the shared state handed to every handler and builds
//! the Actix-web application around it.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, HttpResponse,
};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use pv_core::services::OtpLifecycleManager;

use crate::handlers::json_error_handler;
use crate::routes::otp::{resend_otp, send_otp, verify_otp};

/// Application state that holds shared services
pub struct AppState {
    pub otp_manager: Arc<OtpLifecycleManager>,
    /// Use `X-Forwarded-For` / `X-Real-IP` as the client identity
    pub trust_forwarded_headers: bool,
}

impl AppState {
    pub fn new(otp_manager: Arc<OtpLifecycleManager>, trust_forwarded_headers: bool) -> Self {
        Self {
            otp_manager,
            trust_forwarded_headers,
        }
    }
}

/// Create and configure the application with all dependencies
pub fn create_app(
    app_state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .configure(configure_routes)
        .default_service(web::route().to(not_found))
}

/// Register the phone verification routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/store/auth/phone")
            .route("/send-otp", web::post().to(send_otp))
            .route("/verify-otp", web::post().to(verify_otp))
            .route("/resend-otp", web::post().to(resend_otp)),
    );
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "phone-verify-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "success": false,
        "error": "NOT_FOUND",
        "message": "The requested resource was not found"
    }))
}
