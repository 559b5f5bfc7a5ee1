//! Redis-backed send-path rate limiting

pub mod redis_rate_limiter;

#[cfg(test)]
mod tests;

pub use redis_rate_limiter::RedisRateLimiter;
