//! Tests for expired record cleanup

use chrono::Duration;
use pv_shared::CleanupConfig;
use std::sync::Arc;

use super::mocks::*;

use crate::services::otp::OtpCleanupTask;

#[tokio::test]
async fn test_cleanup_removes_only_expired_records() {
    let h = harness();

    h.manager.send_otp("9812345678").await.unwrap();
    h.manager.send_otp("9712345678").await.unwrap();

    h.clock.advance(Duration::minutes(6));
    let live = h.manager.send_otp("9800000000").await.unwrap();

    assert_eq!(h.manager.cleanup_expired_otps().await.unwrap(), 2);
    assert_eq!(h.store.len().await, 1);
    assert!(h.store.get(live.verification_id).await.is_some());

    // Idempotent
    assert_eq!(h.manager.cleanup_expired_otps().await.unwrap(), 0);
}

#[tokio::test]
async fn test_cleanup_keeps_record_at_its_expiry_instant() {
    let h = harness();

    h.manager.send_otp("9812345678").await.unwrap();
    h.clock.advance(Duration::minutes(5));

    assert_eq!(h.manager.cleanup_expired_otps().await.unwrap(), 0);
    assert_eq!(h.store.len().await, 1);
}

#[tokio::test]
async fn test_cleanup_task_run_once() {
    let h = harness();
    h.manager.send_otp("9812345678").await.unwrap();
    h.clock.advance(Duration::minutes(10));

    let task = OtpCleanupTask::new(h.manager.clone(), CleanupConfig::default());
    assert_eq!(task.run_once().await.unwrap(), 1);
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn test_disabled_cleanup_task_does_not_start() {
    let h = harness();
    let task = Arc::new(OtpCleanupTask::new(
        h.manager.clone(),
        CleanupConfig {
            enabled: false,
            interval_seconds: 1,
        },
    ));

    assert!(task.start_background_task().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_background_task_runs_on_interval() {
    let h = harness();
    h.manager.send_otp("9812345678").await.unwrap();
    h.clock.advance(Duration::minutes(10));

    let task = Arc::new(OtpCleanupTask::new(
        h.manager.clone(),
        CleanupConfig {
            enabled: true,
            interval_seconds: 60,
        },
    ));
    let handle = task.start_background_task().unwrap();

    // First tick fires immediately
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    assert!(h.store.is_empty().await);

    handle.abort();
}
