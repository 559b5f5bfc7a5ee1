//! Configuration for the OTP lifecycle manager

use chrono::Duration;
use pv_shared::OtpConfig;

use crate::domain::entities::{DEFAULT_MAX_ATTEMPTS, DEFAULT_TTL_MINUTES};

/// Configuration for the OTP lifecycle manager
#[derive(Debug, Clone)]
pub struct OtpServiceConfig {
    /// How long a passcode stays valid
    pub code_ttl: Duration,
    /// Verification attempts allowed per passcode
    pub max_attempts: i32,
    /// Minimum gap between issuances on the resend path
    pub resend_cooldown: Duration,
    /// How long a successful verification counts as proof
    pub verified_validity: Duration,
    /// Upper bound on one delivery call
    pub delivery_timeout: std::time::Duration,
    /// Appended to every passcode message
    pub message_signature: String,
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            code_ttl: Duration::minutes(DEFAULT_TTL_MINUTES),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            resend_cooldown: Duration::seconds(60),
            verified_validity: Duration::hours(24),
            delivery_timeout: std::time::Duration::from_secs(10),
            message_signature: "GAG Nepal".to_string(),
        }
    }
}

/// Out-of-range values are clamped to the `OtpConfig::MAX_*` bounds
impl From<&OtpConfig> for OtpServiceConfig {
    fn from(config: &OtpConfig) -> Self {
        Self {
            code_ttl: Duration::seconds(bounded(
                config.code_ttl_seconds,
                OtpConfig::MAX_CODE_TTL_SECONDS,
            )),
            max_attempts: i32::try_from(config.max_attempts).unwrap_or(i32::MAX),
            resend_cooldown: Duration::seconds(bounded(
                config.resend_cooldown_seconds,
                OtpConfig::MAX_RESEND_COOLDOWN_SECONDS,
            )),
            verified_validity: Duration::hours(bounded(
                config.verified_validity_hours,
                OtpConfig::MAX_VERIFIED_VALIDITY_HOURS,
            )),
            delivery_timeout: std::time::Duration::from_secs(config.delivery_timeout_seconds),
            message_signature: config.message_signature.clone(),
        }
    }
}

fn bounded(value: u64, max: u64) -> i64 {
    i64::try_from(value.min(max)).unwrap_or(i64::MAX)
}

impl OtpServiceConfig {
    /// Text of the SMS carrying `code`
    pub fn compose_message(&self, code: &str) -> String {
        let minutes = (self.code_ttl.num_seconds() + 59) / 60;
        let mut message = format!(
            "Your OTP code is: {}. This code will expire in {} minutes.",
            code, minutes
        );
        if !self.message_signature.is_empty() {
            message.push_str(" - ");
            message.push_str(&self.message_signature);
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_message() {
        let config = OtpServiceConfig::default();
        assert_eq!(
            config.compose_message("123456"),
            "Your OTP code is: 123456. This code will expire in 5 minutes. - GAG Nepal"
        );
    }

    #[test]
    fn test_message_without_signature() {
        let config = OtpServiceConfig {
            message_signature: String::new(),
            code_ttl: Duration::seconds(90),
            ..OtpServiceConfig::default()
        };
        assert_eq!(
            config.compose_message("654321"),
            "Your OTP code is: 654321. This code will expire in 2 minutes."
        );
    }

    #[test]
    fn test_from_shared_config() {
        let shared = OtpConfig {
            code_ttl_seconds: 120,
            max_attempts: 5,
            ..OtpConfig::default()
        };
        let config = OtpServiceConfig::from(&shared);
        assert_eq!(config.code_ttl, Duration::minutes(2));
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.resend_cooldown, Duration::seconds(60));
        assert_eq!(config.verified_validity, Duration::hours(24));
    }

    #[test]
    fn test_from_shared_config_clamps_out_of_range_values() {
        let shared = OtpConfig {
            code_ttl_seconds: 1_000_000_000_000_000,
            max_attempts: 3_000_000_000,
            resend_cooldown_seconds: u64::MAX,
            verified_validity_hours: 3_000_000_000_000,
            ..OtpConfig::default()
        };
        let config = OtpServiceConfig::from(&shared);
        assert_eq!(config.code_ttl, Duration::days(1));
        assert_eq!(config.max_attempts, i32::MAX);
        assert_eq!(config.resend_cooldown, Duration::days(1));
        assert_eq!(config.verified_validity, Duration::hours(8_760));
    }
}
