//! Infrastructure implementations of core service traits

pub mod rate_limit;

pub use rate_limit::RedisRateLimiter;
