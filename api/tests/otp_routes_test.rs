//! HTTP tests for the phone verification routes

#[cfg(test)]
mod tests {
    use actix_web::{http::header, http::StatusCode, test, web};
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::{Arc, Mutex};

    use pv_api::dto::{OtpResponse, SendOtpRequest, ValidationErrorResponse, VerifyOtpRequest};
    use pv_api::{create_app, AppState};
    use pv_core::errors::{DeliveryError, ErrorResponse};
    use pv_core::{
        DeliveryReceipt, InMemoryOtpStore, InMemoryRateLimiter, ManualClock, NotificationSender,
        OtpLifecycleManager, OtpServiceConfig, RateLimiterConfig, RegexPhoneCodec,
    };

    /// Keeps the last message so tests can read the passcode
    #[derive(Default)]
    struct CapturingSender {
        last_message: Mutex<Option<String>>,
        fail: bool,
    }

    impl CapturingSender {
        fn last_code(&self) -> String {
            let message = self.last_message.lock().unwrap().clone().expect("no message sent");
            message
                .trim_start_matches("Your OTP code is: ")
                .chars()
                .take(6)
                .collect()
        }
    }

    #[async_trait]
    impl NotificationSender for CapturingSender {
        async fn send(&self, _to: &str, message: &str) -> Result<DeliveryReceipt, DeliveryError> {
            if self.fail {
                return Err(DeliveryError::Transport("gateway unreachable".to_string()));
            }
            *self.last_message.lock().unwrap() = Some(message.to_string());
            Ok(DeliveryReceipt {
                message_id: "test".to_string(),
                provider: "capturing".to_string(),
            })
        }
    }

    struct TestContext {
        state: web::Data<AppState>,
        sender: Arc<CapturingSender>,
        clock: Arc<ManualClock>,
    }

    fn context_with(sender: CapturingSender) -> TestContext {
        let clock = Arc::new(ManualClock::starting_now());
        let sender = Arc::new(sender);
        let manager = OtpLifecycleManager::new(
            Arc::new(InMemoryOtpStore::new()),
            sender.clone(),
            Arc::new(RegexPhoneCodec::nepal()),
            Arc::new(InMemoryRateLimiter::with_clock(
                RateLimiterConfig::default(),
                clock.clone(),
            )),
            OtpServiceConfig::default(),
        )
        .with_clock(clock.clone());

        TestContext {
            state: web::Data::new(AppState::new(Arc::new(manager), true)),
            sender,
            clock,
        }
    }

    fn context() -> TestContext {
        context_with(CapturingSender::default())
    }

    fn send_request(phone: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/store/auth/phone/send-otp")
            .insert_header(("X-Forwarded-For", "198.51.100.20"))
            .set_json(&SendOtpRequest {
                phone_number: phone.to_string(),
            })
    }

    fn verify_request(phone: &str, code: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/store/auth/phone/verify-otp")
            .set_json(&VerifyOtpRequest {
                phone_number: phone.to_string(),
                otp_code: code.to_string(),
            })
    }

    #[actix_web::test]
    async fn test_health_check() {
        let ctx = context();
        let app = test::init_service(create_app(ctx.state.clone())).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_send_then_verify() {
        let ctx = context();
        let app = test::init_service(create_app(ctx.state.clone())).await;

        let resp = test::call_service(&app, send_request("9812345678").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: OtpResponse = test::read_body_json(resp).await;
        assert!(body.success);
        assert_eq!(body.message, "OTP sent successfully to your mobile number.");
        let verification_id = body.verification_id.unwrap();

        let code = ctx.sender.last_code();
        let req = verify_request("+9779812345678", &code).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: OtpResponse = test::read_body_json(resp).await;
        assert_eq!(body.message, "Phone number verified successfully.");
        assert_eq!(body.verification_id, Some(verification_id));

        // A verified code cannot be reused
        let resp = test::call_service(&app, verify_request("9812345678", &code).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "INVALID_OR_EXPIRED");
    }

    #[actix_web::test]
    async fn test_send_rejects_invalid_phone() {
        let ctx = context();
        let app = test::init_service(create_app(ctx.state.clone())).await;

        let resp = test::call_service(&app, send_request("12345").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(!body.success);
        assert_eq!(body.error, "INVALID_PHONE_FORMAT");
    }

    #[actix_web::test]
    async fn test_send_rejects_empty_phone_with_field_errors() {
        let ctx = context();
        let app = test::init_service(create_app(ctx.state.clone())).await;

        let resp = test::call_service(&app, send_request("").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ValidationErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "VALIDATION_ERROR");
        assert!(body.errors.contains_key("phone_number"));
    }

    #[actix_web::test]
    async fn test_malformed_json_is_bad_request() {
        let ctx = context();
        let app = test::init_service(create_app(ctx.state.clone())).await;

        let req = test::TestRequest::post()
            .uri("/store/auth/phone/send-otp")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{ \"phone\": 98 ")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ValidationErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "VALIDATION_ERROR");
    }

    #[actix_web::test]
    async fn test_verify_requires_six_character_code() {
        let ctx = context();
        let app = test::init_service(create_app(ctx.state.clone())).await;

        let req = verify_request("9812345678", "12345").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ValidationErrorResponse = test::read_body_json(resp).await;
        assert!(body.errors.contains_key("otp_code"));
    }

    #[actix_web::test]
    async fn test_wrong_code_reports_remaining_attempts() {
        let ctx = context();
        let app = test::init_service(create_app(ctx.state.clone())).await;

        test::call_service(&app, send_request("9812345678").to_request()).await;
        let wrong = if ctx.sender.last_code() == "000000" { "111111" } else { "000000" };

        let resp = test::call_service(&app, verify_request("9812345678", wrong).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "INVALID_CODE");
        assert_eq!(body.message, "Invalid OTP code. 2 attempt(s) remaining.");
    }

    #[actix_web::test]
    async fn test_fourth_send_is_rate_limited() {
        let ctx = context();
        let app = test::init_service(create_app(ctx.state.clone())).await;

        for _ in 0..3 {
            let resp = test::call_service(&app, send_request("9812345678").to_request()).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let resp = test::call_service(&app, send_request("9812345678").to_request()).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        let retry_after: u64 = resp
            .headers()
            .get(header::RETRY_AFTER)
            .unwrap()
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert!(retry_after > 0 && retry_after <= 60);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "RATE_LIMITED");
        assert_eq!(body.retry_after_seconds, Some(retry_after));
    }

    #[actix_web::test]
    async fn test_resend_respects_cooldown() {
        let ctx = context();
        let app = test::init_service(create_app(ctx.state.clone())).await;

        test::call_service(&app, send_request("9812345678").to_request()).await;

        let resend = || {
            test::TestRequest::post()
                .uri("/store/auth/phone/resend-otp")
                .set_json(serde_json::json!({ "phone_number": "9812345678" }))
                .to_request()
        };

        let resp = test::call_service(&app, resend()).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(resp.headers().contains_key(header::RETRY_AFTER));
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "COOLDOWN_ACTIVE");

        ctx.clock.advance(Duration::seconds(61));
        let resp = test::call_service(&app, resend()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_delivery_failure_is_service_unavailable() {
        let ctx = context_with(CapturingSender {
            fail: true,
            ..CapturingSender::default()
        });
        let app = test::init_service(create_app(ctx.state.clone())).await;

        let resp = test::call_service(&app, send_request("9812345678").to_request()).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "DELIVERY_FAILED");
    }

    #[actix_web::test]
    async fn test_unknown_route_is_not_found() {
        let ctx = context();
        let app = test::init_service(create_app(ctx.state.clone())).await;

        let req = test::TestRequest::get().uri("/store/auth/phone/unknown").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
