//! Business services containing domain logic and use cases.

pub mod otp;
pub mod phone;
pub mod rate_limit;

// Re-export commonly used types
pub use otp::{
    DeliveryReceipt, NotificationSender, OtpCleanupTask, OtpLifecycleManager, OtpServiceConfig,
    SendOtpResult, VerifyOtpResult,
};
pub use phone::{hash_phone, mask_phone, PhoneNumberCodec, RegexPhoneCodec};
pub use rate_limit::{
    retry_after_from_millis, InMemoryRateLimiter, RateLimitDecision, RateLimitKey, RateLimiter,
    RateLimiterConfig, UnlimitedRateLimiter,
};
