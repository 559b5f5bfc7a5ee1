//! SMS module
//!
//! Outbound `NotificationSender` implementations:
//!
//! - **Spydo**: bulk SMS HTTP gateway used in production
//! - **Mock**: logs masked deliveries for development

pub mod mock_sms;
pub mod spydo;

pub use mock_sms::MockSmsSender;
pub use spydo::SpydoSmsSender;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use pv_core::services::NotificationSender;

use crate::config::{SmsConfig, SmsProvider};
use crate::InfrastructureError;

/// Create the notification sender selected by configuration
///
/// # Errors
/// Fails when the Spydo provider is selected without valid options.
pub fn create_notification_sender(
    config: &SmsConfig,
) -> Result<Arc<dyn NotificationSender>, InfrastructureError> {
    match config.provider {
        SmsProvider::Mock => {
            tracing::warn!("Using mock SMS sender; messages will not be delivered");
            Ok(Arc::new(MockSmsSender::new()))
        }
        SmsProvider::Spydo => {
            tracing::info!("Using Spydo SMS gateway at {}", config.base_url);
            Ok(Arc::new(SpydoSmsSender::new(config)?))
        }
    }
}
