//! Phone verification record entity for SMS passcode verification.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::rngs::OsRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Number of digits in a passcode
pub const OTP_LENGTH: usize = 6;

/// Default passcode lifetime (5 minutes)
pub const DEFAULT_TTL_MINUTES: i64 = 5;

/// Default number of verification attempts per passcode
pub const DEFAULT_MAX_ATTEMPTS: i32 = 3;

/// Lifecycle state of a verification record, derived from its fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationState {
    /// Issued, unexpired, attempts left
    Pending,
    /// Correct passcode submitted
    Verified,
    /// All attempts consumed without success
    Exhausted,
    /// Past its expiry without being verified
    Expired,
}

/// One issued passcode for one canonical phone number
///
/// The passcode itself never leaves the process through `Debug` or
/// serialization.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneVerification {
    /// Unique identifier of the record
    pub id: Uuid,

    /// Canonical national phone number
    pub phone_number: String,

    /// The 6-digit passcode
    #[serde(skip_serializing, default)]
    pub otp_code: String,

    /// Instant after which the passcode is no longer accepted
    pub expires_at: DateTime<Utc>,

    /// Whether the passcode has been verified
    pub is_verified: bool,

    /// Verification attempts consumed so far
    pub attempts: i32,

    /// Attempts allowed for this passcode
    pub max_attempts: i32,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last mutation
    pub updated_at: DateTime<Utc>,

    /// Soft-deletion marker, excluded from every query
    pub deleted_at: Option<DateTime<Utc>>,
}

impl PhoneVerification {
    /// Creates a fresh pending record
    ///
    /// # Arguments
    ///
    /// * `phone_number` - Canonical phone number the passcode was issued for
    /// * `otp_code` - The generated passcode
    /// * `now` - Issuance instant
    /// * `ttl` - How long the passcode stays valid
    /// * `max_attempts` - Verification attempts allowed
    pub fn issue(
        phone_number: String,
        otp_code: String,
        now: DateTime<Utc>,
        ttl: Duration,
        max_attempts: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            phone_number,
            otp_code,
            expires_at: now + ttl,
            is_verified: false,
            attempts: 0,
            max_attempts,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Generates a uniformly distributed 6-digit passcode from the OS CSPRNG
    ///
    /// The first digit is never zero.
    pub fn generate_code() -> String {
        let code: u32 = OsRng.gen_range(100_000..=999_999);
        code.to_string()
    }

    /// True once `now` is strictly past `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// True when every allowed attempt has been consumed
    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }

    /// Attempts still available (0 when exhausted)
    pub fn remaining_attempts(&self) -> i32 {
        (self.max_attempts - self.attempts).max(0)
    }

    /// Lifecycle state at `now`
    pub fn state_at(&self, now: DateTime<Utc>) -> VerificationState {
        if self.is_verified {
            VerificationState::Verified
        } else if self.is_exhausted() {
            VerificationState::Exhausted
        } else if self.is_expired_at(now) {
            VerificationState::Expired
        } else {
            VerificationState::Pending
        }
    }

    /// Compares a submitted passcode against the stored one in constant time
    pub fn matches_code(&self, candidate: &str) -> bool {
        constant_time_eq(self.otp_code.as_bytes(), candidate.as_bytes())
    }
}

impl fmt::Debug for PhoneVerification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhoneVerification")
            .field("id", &self.id)
            .field("phone_number", &self.phone_number)
            .field("otp_code", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("is_verified", &self.is_verified)
            .field("attempts", &self.attempts)
            .field("max_attempts", &self.max_attempts)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .field("deleted_at", &self.deleted_at)
            .finish()
    }
}
