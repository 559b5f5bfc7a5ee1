//! Passcode lifecycle configuration module

use serde::{Deserialize, Serialize};

/// Passcode issuance and verification settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OtpConfig {
    /// Seconds a passcode stays valid after issuance
    pub code_ttl_seconds: u64,

    /// Verification attempts allowed per passcode
    pub max_attempts: u32,

    /// Minimum seconds between issuances through the resend path
    pub resend_cooldown_seconds: u64,

    /// Hours a successful verification keeps counting as proof
    pub verified_validity_hours: u64,

    /// Upper bound on a single SMS delivery call, in seconds
    pub delivery_timeout_seconds: u64,

    /// Signature appended to every passcode message
    pub message_signature: String,
}

impl OtpConfig {
    /// Longest accepted passcode lifetime (one day)
    pub const MAX_CODE_TTL_SECONDS: u64 = 86_400;

    /// Longest accepted resend cooldown (one day)
    pub const MAX_RESEND_COOLDOWN_SECONDS: u64 = 86_400;

    /// Longest accepted verified-status validity (one year)
    pub const MAX_VERIFIED_VALIDITY_HOURS: u64 = 8_760;

    /// Largest accepted attempt budget
    pub const MAX_ATTEMPTS: u32 = i32::MAX as u32;
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_ttl_seconds: 300,
            max_attempts: 3,
            resend_cooldown_seconds: 60,
            verified_validity_hours: 24,
            delivery_timeout_seconds: 10,
            message_signature: String::from("GAG Nepal"),
        }
    }
}

/// Expired record cleanup scheduling
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Whether the API process runs the periodic cleanup pass
    pub enabled: bool,

    /// Seconds between cleanup passes
    pub interval_seconds: u64,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 600,
        }
    }
}
