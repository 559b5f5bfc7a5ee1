//! Startup wiring
//!
//! Builds the lifecycle manager from configuration: storage backend, rate
//! limiter backend, SMS provider and phone codec.

use std::sync::Arc;

use pv_core::repositories::{InMemoryOtpStore, OtpStore};
use pv_core::services::{
    InMemoryRateLimiter, OtpCleanupTask, OtpLifecycleManager, OtpServiceConfig, RateLimiter,
    RateLimiterConfig, RegexPhoneCodec, UnlimitedRateLimiter,
};
use pv_infra::cache::RedisClient;
use pv_infra::database::{DatabasePool, MySqlOtpStore};
use pv_infra::services::RedisRateLimiter;
use pv_infra::sms::create_notification_sender;
use pv_infra::InfrastructureError;
use pv_shared::{AppConfig, RateLimitBackend, StorageBackend};

/// Everything the HTTP server and background tasks share
pub struct Components {
    pub otp_manager: Arc<OtpLifecycleManager>,
    pub cleanup_task: Arc<OtpCleanupTask>,
    pub database: Option<DatabasePool>,
}

/// Build the application components
pub async fn build_components(config: &AppConfig) -> Result<Components, InfrastructureError> {
    let (store, database) = build_store(config).await?;
    let rate_limiter = build_rate_limiter(config).await?;
    let sender = create_notification_sender(&config.sms)?;

    let otp_manager = Arc::new(OtpLifecycleManager::new(
        store,
        sender,
        Arc::new(RegexPhoneCodec::nepal()),
        rate_limiter,
        OtpServiceConfig::from(&config.otp),
    ));

    let cleanup_task = Arc::new(OtpCleanupTask::new(
        otp_manager.clone(),
        config.cleanup.clone(),
    ));

    Ok(Components {
        otp_manager,
        cleanup_task,
        database,
    })
}

async fn build_store(
    config: &AppConfig,
) -> Result<(Arc<dyn OtpStore>, Option<DatabasePool>), InfrastructureError> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory verification store; records are lost on restart");
            Ok((Arc::new(InMemoryOtpStore::new()), None))
        }
        StorageBackend::MySql => {
            let pool = DatabasePool::new(config.storage.database.clone()).await?;
            if config.storage.database.run_migrations {
                pool.run_migrations().await?;
            }
            let store = Arc::new(MySqlOtpStore::new(pool.get_pool().clone()));
            Ok((store, Some(pool)))
        }
    }
}

async fn build_rate_limiter(
    config: &AppConfig,
) -> Result<Arc<dyn RateLimiter>, InfrastructureError> {
    if !config.rate_limit.enabled {
        tracing::warn!("Send rate limiting is disabled");
        return Ok(Arc::new(UnlimitedRateLimiter));
    }

    let limiter_config = RateLimiterConfig::from(&config.rate_limit);

    match config.rate_limit.backend {
        RateLimitBackend::Memory => Ok(Arc::new(InMemoryRateLimiter::new(limiter_config))),
        RateLimitBackend::Redis => {
            let client = RedisClient::new(config.cache.clone()).await?;
            Ok(Arc::new(RedisRateLimiter::new(Arc::new(client), limiter_config)))
        }
    }
}
