//! Send-path rate limiting
//!
//! Caps how many passcode sends one client may trigger for one phone number
//! within a fixed window.

mod memory;
mod traits;


pub use memory::{InMemoryRateLimiter, UnlimitedRateLimiter};
pub use traits::{
    retry_after_from_millis, RateLimitDecision, RateLimitKey, RateLimiter, RateLimiterConfig,
};
