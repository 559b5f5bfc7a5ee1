//! Rate limiter contract and shared types

use async_trait::async_trait;
use pv_shared::RateLimitConfig;
use std::fmt;
use std::time::Duration;

use crate::errors::OtpResult;

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// The request fits in the current window and has been counted
    Allowed,
    /// The window is full
    Limited { retry_after_seconds: u64 },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed)
    }
}

/// Identity a window is tracked for: requesting client plus canonical phone
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateLimitKey {
    client_id: String,
    phone_number: String,
}

impl RateLimitKey {
    pub fn new(client_id: impl Into<String>, phone_number: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            phone_number: phone_number.into(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }
}

impl fmt::Display for RateLimitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.client_id, self.phone_number)
    }
}

/// Window parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Window length
    pub window: Duration,
    /// Requests allowed per window
    pub max_requests: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(60),
            max_requests: 3,
        }
    }
}

impl From<&RateLimitConfig> for RateLimiterConfig {
    fn from(config: &RateLimitConfig) -> Self {
        Self {
            window: Duration::from_secs(config.window_seconds),
            max_requests: config.max_requests,
        }
    }
}

/// Fixed-window request counter
///
/// `check` both tests and counts: an `Allowed` answer consumes one slot of
/// the window.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn check(&self, key: &RateLimitKey) -> OtpResult<RateLimitDecision>;
}

/// Whole seconds until a window with `remaining_ms` left reopens, at least 1
pub fn retry_after_from_millis(remaining_ms: i64) -> u64 {
    let seconds = (remaining_ms.max(0) + 999) / 1000;
    seconds.max(1) as u64
}
