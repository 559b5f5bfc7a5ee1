//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

/// Where rate limit windows are tracked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitBackend {
    /// Per-process window map
    #[default]
    Memory,
    /// Shared counters in Redis, for multi-instance deployments
    Redis,
}

/// Send-path rate limiting configuration
///
/// Limits how many OTP sends one client may request for one phone number
/// within a fixed window.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    pub enabled: bool,

    /// Window backend
    pub backend: RateLimitBackend,

    /// Window length in seconds
    pub window_seconds: u64,

    /// Requests allowed per window
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: RateLimitBackend::Memory,
            window_seconds: 60,
            max_requests: 3,
        }
    }
}
