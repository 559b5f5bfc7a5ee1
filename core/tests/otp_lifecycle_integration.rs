//! Integration tests for the OTP lifecycle through the public API

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::{Arc, Mutex};

    use pv_core::{
        DeliveryError, DeliveryReceipt, InMemoryOtpStore, InMemoryRateLimiter, ManualClock,
        NotificationSender, OtpError, OtpLifecycleManager, OtpServiceConfig, RateLimiterConfig,
        RegexPhoneCodec,
    };

    // Captures the last passcode per destination
    #[derive(Default)]
    struct CapturingSender {
        last: Mutex<Option<(String, String)>>,
    }

    impl CapturingSender {
        fn code(&self) -> String {
            let guard = self.last.lock().unwrap();
            let (_, message) = guard.as_ref().expect("no message sent");
            message
                .trim_start_matches("Your OTP code is: ")
                .chars()
                .take(6)
                .collect()
        }
    }

    #[async_trait]
    impl NotificationSender for CapturingSender {
        async fn send(&self, to: &str, message: &str) -> Result<DeliveryReceipt, DeliveryError> {
            *self.last.lock().unwrap() = Some((to.to_string(), message.to_string()));
            Ok(DeliveryReceipt {
                message_id: "integration".to_string(),
                provider: "capturing".to_string(),
            })
        }
    }

    fn setup() -> (OtpLifecycleManager, Arc<CapturingSender>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_now());
        let sender = Arc::new(CapturingSender::default());
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
        (manager, sender, clock)
    }

    #[tokio::test]
    async fn test_full_verification_flow() {
        let (manager, sender, clock) = setup();
        let phone = "+977 981-234-5678";

        manager.send_otp_for_client("203.0.113.7", phone).await.unwrap();
        assert!(!manager.is_phone_verified(phone).await.unwrap());

        // Resend is refused inside the cooldown
        assert!(matches!(
            manager.resend_otp(phone).await,
            Err(OtpError::CooldownActive { .. })
        ));

        clock.advance(Duration::seconds(61));
        manager.resend_otp(phone).await.unwrap();

        let code = sender.code();
        manager.verify_otp("9812345678", &code).await.unwrap();
        assert!(manager.is_phone_verified(phone).await.unwrap());

        // Both records are gone once expired
        clock.advance(Duration::minutes(10));
        assert_eq!(manager.cleanup_expired_otps().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_expired_code_then_fresh_code() {
        let (manager, sender, clock) = setup();

        manager.send_otp("9712345678").await.unwrap();
        let stale = sender.code();

        clock.advance(Duration::minutes(6));
        assert!(matches!(
            manager.verify_otp("9712345678", &stale).await,
            Err(OtpError::InvalidOrExpired)
        ));

        manager.send_otp("9712345678").await.unwrap();
        let fresh = sender.code();
        assert!(manager.verify_otp("9712345678", &fresh).await.is_ok());
    }
}
