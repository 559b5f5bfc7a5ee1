//! Shared configuration types for the phone verification server
//!
//! This crate holds the configuration structures used across all server crates.
//! Every structure deserializes with defaults for missing fields, so a partial
//! TOML file or a handful of environment overrides is enough to configure a
//! deployment.

pub mod config;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, CleanupConfig, DatabaseConfig, Environment, LogFormat,
    LoggingConfig, OtpConfig, RateLimitBackend, RateLimitConfig, ServerConfig, SmsConfig,
    SmsProvider, StorageBackend, StorageConfig,
};
