//! Trait for SMS delivery integration

use async_trait::async_trait;

use crate::errors::DeliveryError;

/// Acknowledgement from a delivery provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// Provider-assigned message id, or a locally generated one
    pub message_id: String,
    /// Name of the provider that accepted the message
    pub provider: String,
}

/// Outbound SMS channel
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Deliver `message` to `to`, given in international form (`+<cc><national>`)
    async fn send(&self, to: &str, message: &str) -> Result<DeliveryReceipt, DeliveryError>;
}
