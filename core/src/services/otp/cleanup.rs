//! Periodic removal of expired verification records

use pv_shared::CleanupConfig;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::errors::OtpResult;

use super::service::OtpLifecycleManager;

/// Runs `cleanup_expired_otps` on a fixed interval
pub struct OtpCleanupTask {
    manager: Arc<OtpLifecycleManager>,
    config: CleanupConfig,
}

impl OtpCleanupTask {
    pub fn new(manager: Arc<OtpLifecycleManager>, config: CleanupConfig) -> Self {
        Self { manager, config }
    }

    /// Run a single cleanup pass
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of expired records deleted
    /// * `Err(OtpError)` - If the store failed
    pub async fn run_once(&self) -> OtpResult<u64> {
        let deleted = self.manager.cleanup_expired_otps().await?;
        if deleted > 0 {
            info!("Expired OTP cleanup removed {} records", deleted);
        }
        Ok(deleted)
    }

    /// Start the cleanup as a background task
    ///
    /// Returns `None` when cleanup is disabled. The first pass runs
    /// immediately.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Expired OTP cleanup is disabled");
            return None;
        }

        let period = std::time::Duration::from_secs(self.config.interval_seconds.max(1));

        Some(tokio::spawn(async move {
            info!(
                "Expired OTP cleanup started - will run every {} seconds",
                period.as_secs()
            );

            let mut interval_timer = tokio::time::interval(period);

            loop {
                interval_timer.tick().await;

                if let Err(e) = self.run_once().await {
                    error!("Expired OTP cleanup cycle failed: {}", e);
                }
            }
        }))
    }
}
