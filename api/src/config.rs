//! Layered configuration loading
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults for the detected environment
//! 2. Optional `config/{environment}.toml`
//! 3. Environment variables prefixed `PHONE_OTP__`, nested with `__`
//!    (for example `PHONE_OTP__OTP__MAX_ATTEMPTS=5`)

use config::{Config, ConfigError, File};
use pv_shared::{AppConfig, Environment, OtpConfig};

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "PHONE_OTP";

/// Separator between prefix and key, and between nested keys
pub const ENV_SEPARATOR: &str = "__";

/// Loading for the application configuration
pub trait LoadConfig: Sized {
    /// Load using the environment detected from `ENVIRONMENT`
    fn load() -> Result<Self, ConfigError>;

    /// Load for an explicit environment
    fn load_for(environment: Environment) -> Result<Self, ConfigError>;
}

impl LoadConfig for AppConfig {
    fn load() -> Result<Self, ConfigError> {
        Self::load_for(Environment::from_env())
    }

    fn load_for(environment: Environment) -> Result<Self, ConfigError> {
        tracing::debug!("Loading configuration for {} environment", environment);

        let defaults = AppConfig::for_environment(environment);

        let config: AppConfig = Config::builder()
            .add_source(Config::try_from(&defaults)?)
            .add_source(File::with_name(environment.config_file()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        validate(&config)?;
        Ok(config)
    }
}

/// Reject settings no component can run with
fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if config.otp.code_ttl_seconds == 0 {
        return Err(ConfigError::Message(
            "otp.code_ttl_seconds must be greater than zero".to_string(),
        ));
    }
    if config.otp.code_ttl_seconds > OtpConfig::MAX_CODE_TTL_SECONDS {
        return Err(ConfigError::Message(format!(
            "otp.code_ttl_seconds must be at most {}",
            OtpConfig::MAX_CODE_TTL_SECONDS
        )));
    }
    if config.otp.max_attempts == 0 {
        return Err(ConfigError::Message(
            "otp.max_attempts must be greater than zero".to_string(),
        ));
    }
    if config.otp.max_attempts > OtpConfig::MAX_ATTEMPTS {
        return Err(ConfigError::Message(format!(
            "otp.max_attempts must be at most {}",
            OtpConfig::MAX_ATTEMPTS
        )));
    }
    if config.otp.resend_cooldown_seconds > OtpConfig::MAX_RESEND_COOLDOWN_SECONDS {
        return Err(ConfigError::Message(format!(
            "otp.resend_cooldown_seconds must be at most {}",
            OtpConfig::MAX_RESEND_COOLDOWN_SECONDS
        )));
    }
    if config.otp.verified_validity_hours > OtpConfig::MAX_VERIFIED_VALIDITY_HOURS {
        return Err(ConfigError::Message(format!(
            "otp.verified_validity_hours must be at most {}",
            OtpConfig::MAX_VERIFIED_VALIDITY_HOURS
        )));
    }
    if config.rate_limit.enabled
        && (config.rate_limit.window_seconds == 0 || config.rate_limit.max_requests == 0)
    {
        return Err(ConfigError::Message(
            "rate_limit.window_seconds and rate_limit.max_requests must be greater than zero"
                .to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_ttl() {
        let mut config = AppConfig::default();
        config.otp.code_ttl_seconds = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_ttl_longer_than_a_day() {
        let mut config = AppConfig::default();
        config.otp.code_ttl_seconds = OtpConfig::MAX_CODE_TTL_SECONDS;
        assert!(validate(&config).is_ok());

        config.otp.code_ttl_seconds = 1_000_000_000_000_000;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_attempts_beyond_i32() {
        let mut config = AppConfig::default();
        config.otp.max_attempts = 3_000_000_000;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_cooldown_longer_than_a_day() {
        let mut config = AppConfig::default();
        config.otp.resend_cooldown_seconds = OtpConfig::MAX_RESEND_COOLDOWN_SECONDS + 1;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_verified_validity_longer_than_a_year() {
        let mut config = AppConfig::default();
        config.otp.verified_validity_hours = OtpConfig::MAX_VERIFIED_VALIDITY_HOURS;
        assert!(validate(&config).is_ok());

        config.otp.verified_validity_hours = 3_000_000_000_000;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_disabled_rate_limit_skips_window_checks() {
        let mut config = AppConfig::default();
        config.rate_limit.enabled = false;
        config.rate_limit.max_requests = 0;
        assert!(validate(&config).is_ok());
    }
}
