//! Process-local rate limiter

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

use crate::clock::{Clock, SystemClock};
use crate::errors::OtpResult;
use crate::services::phone::mask_phone;

use super::traits::{
    retry_after_from_millis, RateLimitDecision, RateLimitKey, RateLimiter, RateLimiterConfig,
};

#[derive(Debug)]
struct WindowEntry {
    count: u32,
    window_start: DateTime<Utc>,
}

/// Fixed-window limiter keeping its counters in a mutex-guarded map
///
/// Expired windows are evicted on every check, so memory stays bounded by
/// the keys seen in the last window.
pub struct InMemoryRateLimiter {
    config: RateLimiterConfig,
    clock: Arc<dyn Clock>,
    windows: Mutex<HashMap<RateLimitKey, WindowEntry>>,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: RateLimiterConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Number of keys with an open window
    pub async fn tracked_keys(&self) -> usize {
        self.windows.lock().await.len()
    }

    /// Forget the window for `key`
    pub async fn reset(&self, key: &RateLimitKey) {
        self.windows.lock().await.remove(key);
    }

    fn window_ms(&self) -> i64 {
        self.config.window.as_millis() as i64
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: &RateLimitKey) -> OtpResult<RateLimitDecision> {
        let now = self.clock.now();
        let window_ms = self.window_ms();
        let mut windows = self.windows.lock().await;

        windows.retain(|_, entry| (now - entry.window_start).num_milliseconds() < window_ms);

        match windows.get_mut(key) {
            Some(entry) if entry.count >= self.config.max_requests => {
                let elapsed_ms = (now - entry.window_start).num_milliseconds();
                let retry_after_seconds = retry_after_from_millis(window_ms - elapsed_ms);
                warn!(
                    client = %key.client_id(),
                    phone = %mask_phone(key.phone_number()),
                    retry_after_seconds,
                    event = "rate_limit_exceeded",
                    "OTP send rate limit exceeded"
                );
                Ok(RateLimitDecision::Limited { retry_after_seconds })
            }
            Some(entry) => {
                entry.count += 1;
                Ok(RateLimitDecision::Allowed)
            }
            None => {
                windows.insert(
                    key.clone(),
                    WindowEntry {
                        count: 1,
                        window_start: now,
                    },
                );
                Ok(RateLimitDecision::Allowed)
            }
        }
    }
}

/// Limiter that never limits, used when rate limiting is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct UnlimitedRateLimiter;

#[async_trait]
impl RateLimiter for UnlimitedRateLimiter {
    async fn check(&self, _key: &RateLimitKey) -> OtpResult<RateLimitDecision> {
        Ok(RateLimitDecision::Allowed)
    }
}
