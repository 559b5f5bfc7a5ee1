//! # Phone Verify Core
//!
//! Core business logic for phone number ownership verification.
//! This crate contains the verification record entity, the error taxonomy,
//! the storage contract with an in-memory implementation, the phone number
//! codec, the send-path rate limiter, and the OTP lifecycle manager that
//! ties them together.

pub mod clock;
pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use domain::entities::{
    PhoneVerification, VerificationState, DEFAULT_MAX_ATTEMPTS, DEFAULT_TTL_MINUTES, OTP_LENGTH,
};
pub use errors::{DeliveryError, ErrorResponse, OtpError, OtpResult, StoreError};
pub use repositories::{
    InMemoryOtpStore, OtpStore, UpdateGuard, VerificationQuery, VerificationUpdate,
};
pub use services::{
    hash_phone, mask_phone, retry_after_from_millis, DeliveryReceipt, InMemoryRateLimiter,
    NotificationSender, OtpCleanupTask, OtpLifecycleManager, OtpServiceConfig, PhoneNumberCodec,
    RateLimitDecision, RateLimitKey, RateLimiter, RateLimiterConfig, RegexPhoneCodec,
    SendOtpResult, UnlimitedRateLimiter, VerifyOtpResult,
};
