//! Domain entities representing core business objects.

pub mod phone_verification;

// Re-export commonly used types
pub use phone_verification::{
    PhoneVerification, VerificationState,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_TTL_MINUTES, OTP_LENGTH,
};
