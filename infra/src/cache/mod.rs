//! Cache module for Redis access
//!
//! Provides the Redis connection used by the distributed rate limiter,
//! with connection retry and key namespacing.

pub mod redis_client;

pub use redis_client::RedisClient;

// Re-export commonly used types
pub use crate::config::CacheConfig;
