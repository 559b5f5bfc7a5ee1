//! OTP lifecycle manager implementation

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::domain::entities::{PhoneVerification, VerificationState};
use crate::errors::{DeliveryError, OtpError, OtpResult, StoreError};
use crate::repositories::otp::{OtpStore, UpdateGuard, VerificationQuery, VerificationUpdate};
use crate::services::phone::{mask_phone, PhoneNumberCodec};
use crate::services::rate_limit::{
    retry_after_from_millis, RateLimitDecision, RateLimitKey, RateLimiter,
};

use super::config::OtpServiceConfig;
use super::traits::NotificationSender;
use super::types::{SendOtpResult, VerifyOtpResult};

const SEND_SUCCESS_MESSAGE: &str = "OTP sent successfully to your mobile number.";
const VERIFY_SUCCESS_MESSAGE: &str = "Phone number verified successfully.";

/// Issues, delivers and verifies SMS passcodes
///
/// Every state change goes through a single store operation, so any number
/// of managers may share one store.
pub struct OtpLifecycleManager {
    store: Arc<dyn OtpStore>,
    sender: Arc<dyn NotificationSender>,
    codec: Arc<dyn PhoneNumberCodec>,
    rate_limiter: Arc<dyn RateLimiter>,
    clock: Arc<dyn Clock>,
    config: OtpServiceConfig,
}

impl OtpLifecycleManager {
    /// Create a new lifecycle manager on the system clock
    ///
    /// # Arguments
    ///
    /// * `store` - Verification record persistence
    /// * `sender` - SMS delivery channel
    /// * `codec` - Phone number validation and canonicalization
    /// * `rate_limiter` - Send-path limiter consulted by `send_otp_for_client`
    /// * `config` - Lifecycle configuration
    pub fn new(
        store: Arc<dyn OtpStore>,
        sender: Arc<dyn NotificationSender>,
        codec: Arc<dyn PhoneNumberCodec>,
        rate_limiter: Arc<dyn RateLimiter>,
        config: OtpServiceConfig,
    ) -> Self {
        Self {
            store,
            sender,
            codec,
            rate_limiter,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &OtpServiceConfig {
        &self.config
    }

    /// Send a passcode on behalf of a client, subject to the rate limiter
    ///
    /// The window is keyed by `client_id` and the canonical phone number, so
    /// different spellings of one number share a window.
    pub async fn send_otp_for_client(
        &self,
        client_id: &str,
        phone: &str,
    ) -> OtpResult<SendOtpResult> {
        let canonical = self.codec.normalize(phone);
        let key = RateLimitKey::new(client_id, canonical.as_str());

        match self.rate_limiter.check(&key).await {
            Ok(RateLimitDecision::Allowed) => {}
            Ok(RateLimitDecision::Limited {
                retry_after_seconds,
            }) => {
                return Err(OtpError::RateLimited {
                    retry_after_seconds,
                });
            }
            Err(e) => {
                // Limiter outages do not block sends
                tracing::warn!(
                    phone = %mask_phone(&canonical),
                    client = client_id,
                    error = %e,
                    event = "rate_limiter_unavailable",
                    "Rate limiter check failed, allowing request"
                );
            }
        }

        self.send_otp(phone).await
    }

    /// Issue a passcode and deliver it within the configured timeout
    pub async fn send_otp(&self, phone: &str) -> OtpResult<SendOtpResult> {
        self.send_otp_within(phone, self.config.delivery_timeout).await
    }

    /// Issue a passcode and deliver it within `timeout`
    ///
    /// This method:
    /// 1. Validates and canonicalizes the phone number
    /// 2. Refuses numbers whose current passcode has no attempts left
    /// 3. Persists a new pending record
    /// 4. Sends the passcode, deleting the record again if delivery fails
    ///
    /// # Returns
    ///
    /// * `Ok(SendOtpResult)` - The record id, expiry and provider message id
    /// * `Err(OtpError)` - `InvalidPhoneFormat`, `AttemptsExceeded`,
    ///   `DeliveryFailed` or `Internal`
    pub async fn send_otp_within(
        &self,
        phone: &str,
        timeout: Duration,
    ) -> OtpResult<SendOtpResult> {
        if !self.codec.validate(phone) {
            tracing::warn!(
                phone = %mask_phone(phone),
                event = "invalid_phone_format",
                "Rejected OTP request for invalid phone number"
            );
            return Err(OtpError::InvalidPhoneFormat);
        }

        let canonical = self.codec.normalize(phone);
        let masked = mask_phone(&canonical);
        let now = self.clock.now();

        let query = VerificationQuery::for_phone(&canonical).expiring_at_or_after(now);
        let current = self
            .store
            .find_most_recent(&query)
            .await
            .map_err(|e| store_failure("find_current", e))?;

        if let Some(current) = current {
            if current.is_exhausted() {
                tracing::warn!(
                    phone = %masked,
                    verification_id = %current.id,
                    event = "otp_attempts_exhausted",
                    "OTP requested while current code has no attempts left"
                );
                return Err(OtpError::AttemptsExceeded);
            }
        }

        let record = PhoneVerification::issue(
            canonical.clone(),
            PhoneVerification::generate_code(),
            now,
            self.config.code_ttl,
            self.config.max_attempts,
        );
        let record = self
            .store
            .create(record)
            .await
            .map_err(|e| store_failure("create", e))?;

        tracing::info!(
            phone = %masked,
            verification_id = %record.id,
            expires_at = %record.expires_at,
            event = "otp_generated",
            "Generated new OTP"
        );

        let message = self.config.compose_message(&record.otp_code);
        let destination = self.codec.to_international(&canonical);

        let send = self.sender.send(&destination, &message);
        let delivery = match tokio::time::timeout(timeout, send).await {
            Ok(result) => result,
            Err(_) => Err(DeliveryError::Timeout(timeout)),
        };

        match delivery {
            Ok(receipt) => {
                tracing::info!(
                    phone = %masked,
                    verification_id = %record.id,
                    provider = %receipt.provider,
                    message_id = %receipt.message_id,
                    event = "otp_sent",
                    "OTP delivered"
                );
                Ok(SendOtpResult {
                    verification_id: record.id,
                    message: SEND_SUCCESS_MESSAGE.to_string(),
                    expires_at: record.expires_at,
                    message_id: receipt.message_id,
                })
            }
            Err(e) => {
                tracing::error!(
                    phone = %masked,
                    verification_id = %record.id,
                    error = %e,
                    event = "otp_delivery_failed",
                    "Failed to deliver OTP"
                );
                self.discard_undelivered(record.id).await;
                Err(OtpError::DeliveryFailed)
            }
        }
    }

    /// Best-effort removal of a record whose passcode never reached the user
    async fn discard_undelivered(&self, id: Uuid) {
        if let Err(e) = self.store.delete_by_ids(&[id]).await {
            tracing::error!(
                verification_id = %id,
                error = %e,
                event = "otp_compensation_failed",
                "Failed to delete undelivered OTP record"
            );
        }
    }

    /// Check a submitted passcode against the phone's current record
    ///
    /// Each call that reaches the comparison consumes one attempt, whether
    /// the code matches or not. The attempt is claimed with a guarded update
    /// before comparing, so concurrent submissions can never consume more
    /// attempts than allowed.
    pub async fn verify_otp(&self, phone: &str, code: &str) -> OtpResult<VerifyOtpResult> {
        let canonical = self.codec.normalize(phone);
        let masked = mask_phone(&canonical);

        // Every lost round means another caller consumed an attempt, so
        // the record is exhausted after at most max_attempts + 1 rounds.
        let rounds = self.config.max_attempts.max(0) as usize + 1;

        for _ in 0..rounds {
            let now = self.clock.now();
            let query = VerificationQuery::for_phone(&canonical)
                .verified(false)
                .expiring_at_or_after(now);

            let record = self
                .store
                .find_most_recent(&query)
                .await
                .map_err(|e| store_failure("find_active", e))?
                .ok_or_else(|| {
                    tracing::warn!(
                        phone = %masked,
                        event = "otp_not_found",
                        "No active OTP for phone"
                    );
                    OtpError::InvalidOrExpired
                })?;

            match record.state_at(now) {
                VerificationState::Pending => {}
                VerificationState::Exhausted => {
                    tracing::warn!(
                        phone = %masked,
                        verification_id = %record.id,
                        event = "otp_attempts_exceeded",
                        "OTP verification refused, attempts exhausted"
                    );
                    return Err(OtpError::AttemptsExceeded);
                }
                VerificationState::Verified | VerificationState::Expired => {
                    return Err(OtpError::InvalidOrExpired);
                }
            }

            let consumed = record.attempts + 1;
            let claimed = self
                .store
                .update_if(
                    record.id,
                    UpdateGuard::default().attempts(record.attempts).unverified(),
                    VerificationUpdate::new(now).attempts(consumed),
                )
                .await
                .map_err(|e| store_failure("claim_attempt", e))?;

            if !claimed {
                tracing::debug!(
                    verification_id = %record.id,
                    "Concurrent verification claimed the attempt, retrying"
                );
                continue;
            }

            if !record.matches_code(code) {
                let remaining_attempts = (record.max_attempts - consumed).max(0) as u32;
                tracing::warn!(
                    phone = %masked,
                    verification_id = %record.id,
                    attempts = consumed,
                    remaining_attempts,
                    event = "otp_verification_failed",
                    "Invalid OTP submitted"
                );
                return Err(OtpError::InvalidCode { remaining_attempts });
            }

            let verified = self
                .store
                .update_if(
                    record.id,
                    UpdateGuard::default().unverified(),
                    VerificationUpdate::new(now).verified(),
                )
                .await
                .map_err(|e| store_failure("mark_verified", e))?;

            if !verified {
                tracing::warn!(
                    verification_id = %record.id,
                    event = "otp_already_verified",
                    "OTP was verified by a concurrent request"
                );
                return Err(OtpError::InvalidOrExpired);
            }

            tracing::info!(
                phone = %masked,
                verification_id = %record.id,
                event = "otp_verified",
                "Phone number verified"
            );
            return Ok(VerifyOtpResult {
                verification_id: record.id,
                message: VERIFY_SUCCESS_MESSAGE.to_string(),
            });
        }

        Err(OtpError::AttemptsExceeded)
    }

    /// Issue a fresh passcode unless one was issued within the cooldown
    pub async fn resend_otp(&self, phone: &str) -> OtpResult<SendOtpResult> {
        let canonical = self.codec.normalize(phone);
        let now = self.clock.now();
        let cooldown = self.config.resend_cooldown;

        let query = VerificationQuery::for_phone(&canonical).created_since(now - cooldown);
        let recent = self
            .store
            .find_most_recent(&query)
            .await
            .map_err(|e| store_failure("find_recent", e))?;

        if let Some(recent) = recent {
            let remaining = cooldown - (now - recent.created_at);
            let retry_after_seconds = retry_after_from_millis(remaining.num_milliseconds());
            tracing::warn!(
                phone = %mask_phone(&canonical),
                retry_after_seconds,
                event = "otp_resend_cooldown",
                "OTP resend requested during cooldown"
            );
            return Err(OtpError::CooldownActive {
                retry_after_seconds,
            });
        }

        self.send_otp(phone).await
    }

    /// Whether the phone completed a verification within the validity period
    pub async fn is_phone_verified(&self, phone: &str) -> OtpResult<bool> {
        let canonical = self.codec.normalize(phone);
        let cutoff = self.clock.now() - self.config.verified_validity;

        let verified = self
            .store
            .find_most_recent(
                &VerificationQuery::for_phone(canonical)
                    .verified(true)
                    .expiring_at_or_after(cutoff),
            )
            .await
            .map_err(|e| store_failure("find_verified", e))?;

        Ok(verified.is_some())
    }

    /// Delete every record past its expiry
    ///
    /// # Returns
    ///
    /// Number of records removed
    pub async fn cleanup_expired_otps(&self) -> OtpResult<u64> {
        let now = self.clock.now();

        let expired: Vec<Uuid> = self
            .store
            .find(&VerificationQuery::any().expired_before(now))
            .await
            .map_err(|e| store_failure("find_expired", e))?
            .into_iter()
            .map(|r| r.id)
            .collect();

        if expired.is_empty() {
            return Ok(0);
        }

        let deleted = self
            .store
            .delete_by_ids(&expired)
            .await
            .map_err(|e| store_failure("delete_expired", e))?;

        tracing::info!(
            deleted,
            event = "otp_cleanup",
            "Deleted expired OTP records"
        );
        Ok(deleted)
    }
}

fn store_failure(operation: &'static str, err: StoreError) -> OtpError {
    tracing::error!(
        operation,
        error = %err,
        event = "otp_store_failed",
        "OTP store operation failed"
    );
    OtpError::from(err)
}
