//! Redis-based rate limiter implementation
//!
//! One counter per client and phone number, created by `INCR` and expired
//! with `PEXPIRE` on the first hit of each window. Counters live in Redis,
//! so every server instance shares the same windows.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use pv_core::errors::{OtpError, OtpResult};
use pv_core::services::{
    hash_phone, mask_phone, retry_after_from_millis, RateLimitDecision, RateLimitKey,
    RateLimiter, RateLimiterConfig,
};

use crate::cache::RedisClient;

/// Redis-based implementation of the rate limiter trait
pub struct RedisRateLimiter {
    redis_client: Arc<RedisClient>,
    config: RateLimiterConfig,
}

impl RedisRateLimiter {
    /// Create a new Redis-based rate limiter
    pub fn new(redis_client: Arc<RedisClient>, config: RateLimiterConfig) -> Self {
        Self {
            redis_client,
            config,
        }
    }

    /// Redis key for a window, namespaced by the client's prefix
    pub fn window_key(&self, key: &RateLimitKey) -> String {
        self.redis_client.key(&counter_key(key))
    }

    /// Forget the window for `key`
    pub async fn reset(&self, key: &RateLimitKey) -> OtpResult<()> {
        self.redis_client
            .delete(&self.window_key(key))
            .await
            .map_err(|e| OtpError::internal(format!("Failed to reset rate limit: {}", e)))?;
        Ok(())
    }
}

/// Counter key without prefix; the phone number is hashed so raw numbers
/// never reach Redis
pub(crate) fn counter_key(key: &RateLimitKey) -> String {
    format!(
        "otp_rate_limit:{}:{}",
        key.client_id(),
        hash_phone(key.phone_number())
    )
}

/// Decide from a post-increment counter value and the window's remaining ttl
pub(crate) fn decide(count: i64, ttl_ms: i64, max_requests: u32) -> RateLimitDecision {
    if count <= i64::from(max_requests) {
        RateLimitDecision::Allowed
    } else {
        RateLimitDecision::Limited {
            retry_after_seconds: retry_after_from_millis(ttl_ms),
        }
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(&self, key: &RateLimitKey) -> OtpResult<RateLimitDecision> {
        let (count, ttl_ms) = self
            .redis_client
            .increment_in_window(&self.window_key(key), self.config.window)
            .await
            .map_err(|e| OtpError::internal(format!("Failed to update rate limit: {}", e)))?;

        let decision = decide(count, ttl_ms, self.config.max_requests);

        if let RateLimitDecision::Limited { retry_after_seconds } = decision {
            warn!(
                client = %key.client_id(),
                phone = %mask_phone(key.phone_number()),
                retry_after_seconds,
                event = "rate_limit_exceeded",
                "OTP send rate limit exceeded"
            );
        }

        Ok(decision)
    }
}
