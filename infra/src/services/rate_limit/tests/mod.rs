#[cfg(test)]
mod redis_rate_limiter_tests;
