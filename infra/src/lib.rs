//! # Infrastructure Layer
//!
//! Concrete implementations of the collaborator traits defined in `pv_core`:
//!
//! - **Database**: MySQL `OtpStore` using SQLx, with embedded migrations
//! - **Cache**: Redis client backing the distributed rate limiter
//! - **SMS**: Spydo bulk SMS gateway and a logging mock sender
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)
//! - `redis-cache`: Enable Redis support (default)

// Re-export core types for convenience
pub use pv_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// SMS module - outbound notification senders
pub mod sms;

/// Cache module - Redis client
#[cfg(feature = "redis-cache")]
pub mod cache;

/// Services module - Infrastructure service implementations
#[cfg(feature = "redis-cache")]
pub mod services;

/// Configuration types used by this crate
pub mod config {
    pub use pv_shared::{CacheConfig, DatabaseConfig, SmsConfig, SmsProvider};
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failure
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SMS service error
    #[error("SMS service error: {0}")]
    Sms(String),
}
