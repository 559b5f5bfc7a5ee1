//! Configuration module with business-specific sub-modules
//!
//! - `cache` - Redis connection used by the distributed rate limiter
//! - `database` - Storage backend selection and MySQL pool settings
//! - `environment` - Environment detection and logging configuration
//! - `otp` - Passcode lifetime, attempt limits, cooldown and cleanup
//! - `rate_limit` - Send-path request limiting
//! - `server` - HTTP server binding
//! - `sms` - Outbound SMS provider

pub mod cache;
pub mod database;
pub mod environment;
pub mod otp;
pub mod rate_limit;
pub mod server;
pub mod sms;

use serde::{Deserialize, Serialize};

pub use cache::CacheConfig;
pub use database::{DatabaseConfig, StorageBackend, StorageConfig};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use otp::{CleanupConfig, OtpConfig};
pub use rate_limit::{RateLimitBackend, RateLimitConfig};
pub use server::ServerConfig;
pub use sms::{SmsConfig, SmsProvider};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Deployment environment
    pub environment: Environment,

    /// HTTP server configuration
    pub server: ServerConfig,

    /// Verification record storage
    pub storage: StorageConfig,

    /// Redis configuration
    pub cache: CacheConfig,

    /// Passcode lifecycle settings
    pub otp: OtpConfig,

    /// Send-path rate limiting
    pub rate_limit: RateLimitConfig,

    /// SMS provider settings
    pub sms: SmsConfig,

    /// Expired record cleanup scheduling
    pub cleanup: CleanupConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Default configuration for an environment
    ///
    /// Production defaults to MySQL storage, the Redis rate limiter and the
    /// real SMS gateway; other environments run fully in memory with the mock
    /// sender.
    pub fn for_environment(environment: Environment) -> Self {
        let mut config = Self {
            environment,
            logging: LoggingConfig::for_environment(environment),
            ..Default::default()
        };

        if environment.is_production() {
            config.storage.backend = StorageBackend::MySql;
            config.rate_limit.backend = RateLimitBackend::Redis;
            config.sms.provider = SmsProvider::Spydo;
        }

        config
    }
}
