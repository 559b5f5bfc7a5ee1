//! Unit tests for the Redis rate limiter's key and decision logic

use pv_core::services::{hash_phone, RateLimitDecision, RateLimitKey};

use crate::services::rate_limit::redis_rate_limiter::{counter_key, decide};

#[test]
fn test_counter_key_hashes_phone() {
    let key = RateLimitKey::new("203.0.113.7", "9812345678");
    let redis_key = counter_key(&key);

    assert_eq!(
        redis_key,
        format!("otp_rate_limit:203.0.113.7:{}", hash_phone("9812345678"))
    );
    assert!(!redis_key.contains("9812345678"));
}

#[test]
fn test_counter_key_separates_clients() {
    let a = counter_key(&RateLimitKey::new("10.0.0.1", "9812345678"));
    let b = counter_key(&RateLimitKey::new("10.0.0.2", "9812345678"));
    assert_ne!(a, b);
}

#[test]
fn test_requests_within_limit_are_allowed() {
    assert_eq!(decide(1, 60_000, 3), RateLimitDecision::Allowed);
    assert_eq!(decide(3, 12_000, 3), RateLimitDecision::Allowed);
}

#[test]
fn test_request_over_limit_reports_remaining_window() {
    assert_eq!(
        decide(4, 12_500, 3),
        RateLimitDecision::Limited {
            retry_after_seconds: 13
        }
    );
}

#[test]
fn test_retry_after_is_at_least_one_second() {
    assert_eq!(
        decide(9, 0, 3),
        RateLimitDecision::Limited {
            retry_after_seconds: 1
        }
    );
    assert_eq!(
        decide(9, -2, 3),
        RateLimitDecision::Limited {
            retry_after_seconds: 1
        }
    );
}
