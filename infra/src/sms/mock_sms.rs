//! Mock SMS sender
//!
//! Logs deliveries instead of sending them. Used in development and tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use pv_core::errors::DeliveryError;
use pv_core::services::{mask_phone, DeliveryReceipt, NotificationSender};

pub const PROVIDER_NAME: &str = "mock";

/// Mock SMS sender for development and testing
///
/// This implementation:
/// - Logs the masked destination, never the message body
/// - Generates mock message IDs
/// - Tracks message count for testing
#[derive(Clone, Default)]
pub struct MockSmsSender {
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
    /// Whether to simulate failures (for testing)
    simulate_failure: Arc<AtomicBool>,
}

impl MockSmsSender {
    /// Create a new mock SMS sender
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock sender that fails every delivery
    pub fn failing() -> Self {
        let sender = Self::new();
        sender.set_simulate_failure(true);
        sender
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Reset the message counter
    pub fn reset_counter(&self) {
        self.message_count.store(0, Ordering::SeqCst);
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }
}

#[async_trait]
impl NotificationSender for MockSmsSender {
    async fn send(&self, to: &str, message: &str) -> Result<DeliveryReceipt, DeliveryError> {
        let masked_phone = mask_phone(to);

        if to.trim().is_empty() {
            return Err(DeliveryError::InvalidRecipient(
                "Recipient phone number is required".to_string(),
            ));
        }

        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(
                provider = PROVIDER_NAME,
                phone = %masked_phone,
                "Mock SMS sender simulating failure"
            );
            return Err(DeliveryError::Rejected(
                "Simulated SMS sending failure".to_string(),
            ));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        info!(
            provider = PROVIDER_NAME,
            phone = %masked_phone,
            message_id = %message_id,
            message_length = message.len(),
            message_number = count,
            event = "sms_sent",
            "SMS sent successfully (mock)"
        );

        Ok(DeliveryReceipt {
            message_id,
            provider: PROVIDER_NAME.to_string(),
        })
    }
}
