//! Spydo bulk SMS gateway sender
//!
//! The gateway takes a single GET request with the credentials and message
//! in the query string and answers with `{"status": ..., "message": ...}`.
//! Anything other than `status == "success"` is a rejected delivery.

use async_trait::async_trait;
use phonenumber::{country, Mode};
use serde::Deserialize;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use uuid::Uuid;

use pv_core::errors::DeliveryError;
use pv_core::services::{mask_phone, DeliveryReceipt, NotificationSender};

use crate::config::SmsConfig;
use crate::InfrastructureError;

pub const PROVIDER_NAME: &str = "spydo";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Minimal HTTP seam so the sender can be exercised without a network
#[async_trait]
pub(crate) trait HttpTransport: Send + Sync {
    async fn get(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<HttpResponse, Box<dyn StdError + Send + Sync>>;
}

struct ReqwestTransport {
    client: reqwest::Client,
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<HttpResponse, Box<dyn StdError + Send + Sync>> {
        let response = self.client.get(url).query(params).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SpydoResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Sender delivering through the Spydo HTTP gateway
pub struct SpydoSmsSender {
    api_key: String,
    sender_id: String,
    base_url: String,
    http: Arc<dyn HttpTransport>,
}

impl fmt::Debug for SpydoSmsSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpydoSmsSender")
            .field("api_key", &"[REDACTED]")
            .field("sender_id", &self.sender_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl SpydoSmsSender {
    /// Create a sender from configuration
    ///
    /// # Errors
    /// * `InfrastructureError::Config` - API key or sender id missing
    /// * `InfrastructureError::Http` - HTTP client could not be built
    pub fn new(config: &SmsConfig) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Self::with_transport(config, Arc::new(ReqwestTransport { client }))
    }

    pub(crate) fn with_transport(
        config: &SmsConfig,
        http: Arc<dyn HttpTransport>,
    ) -> Result<Self, InfrastructureError> {
        validate_options(config)?;

        Ok(Self {
            api_key: config.api_key.trim().to_string(),
            sender_id: config.sender_id.trim().to_string(),
            base_url: config.base_url.clone(),
            http,
        })
    }

    fn query_params(&self, contacts: &str, message: &str) -> Vec<(String, String)> {
        vec![
            ("key".to_string(), self.api_key.clone()),
            ("contacts".to_string(), contacts.to_string()),
            ("senderid".to_string(), self.sender_id.clone()),
            ("msg".to_string(), message.to_string()),
            ("responsetype".to_string(), "json".to_string()),
        ]
    }
}

pub(crate) fn validate_options(config: &SmsConfig) -> Result<(), InfrastructureError> {
    if config.api_key.trim().is_empty() {
        return Err(InfrastructureError::Config(
            "Spydo SMS: API key is required".to_string(),
        ));
    }
    if config.sender_id.trim().is_empty() {
        return Err(InfrastructureError::Config(
            "Spydo SMS: Sender ID is required".to_string(),
        ));
    }
    if config.base_url.trim().is_empty() {
        return Err(InfrastructureError::Config(
            "Spydo SMS: base URL is required".to_string(),
        ));
    }
    Ok(())
}

/// Parse the destination and return its E.164 form
///
/// Numbers without a `+` prefix are read as Nepali numbers.
pub(crate) fn normalize_destination(to: &str) -> Result<String, DeliveryError> {
    let raw = to.trim();
    if raw.is_empty() {
        return Err(DeliveryError::InvalidRecipient(
            "Recipient phone number is required".to_string(),
        ));
    }

    let parsed = phonenumber::parse(Some(country::Id::NP), raw).map_err(|_| {
        DeliveryError::InvalidRecipient(format!("Unparseable phone number {}", mask_phone(raw)))
    })?;

    Ok(phonenumber::format(&parsed).mode(Mode::E164).to_string())
}

/// Interpret a gateway reply
pub(crate) fn decode_response(response: &HttpResponse) -> Result<SpydoResponse, DeliveryError> {
    if !(200..=299).contains(&response.status) {
        return Err(DeliveryError::Transport(format!(
            "SMS API returned HTTP {}",
            response.status
        )));
    }

    let parsed: SpydoResponse = serde_json::from_str(&response.body)
        .map_err(|e| DeliveryError::Rejected(format!("Unreadable gateway response: {}", e)))?;

    if !parsed.status.eq_ignore_ascii_case("success") {
        return Err(DeliveryError::Rejected(format!(
            "Gateway status '{}': {}",
            parsed.status, parsed.message
        )));
    }

    Ok(parsed)
}

#[async_trait]
impl NotificationSender for SpydoSmsSender {
    async fn send(&self, to: &str, message: &str) -> Result<DeliveryReceipt, DeliveryError> {
        if message.trim().is_empty() {
            return Err(DeliveryError::Rejected(
                "Message content is required".to_string(),
            ));
        }

        let destination = normalize_destination(to)?;
        let params = self.query_params(&destination, message);

        let response = self.http.get(&self.base_url, &params).await.map_err(|e| {
            error!(
                provider = PROVIDER_NAME,
                phone = %mask_phone(&destination),
                "SMS gateway request failed: {}",
                e
            );
            DeliveryError::Transport(e.to_string())
        })?;

        let reply = decode_response(&response).map_err(|e| {
            warn!(
                provider = PROVIDER_NAME,
                phone = %mask_phone(&destination),
                http_status = response.status,
                "SMS gateway refused delivery: {}",
                e
            );
            e
        })?;

        let message_id = format!("sms_{}", Uuid::new_v4());

        info!(
            provider = PROVIDER_NAME,
            phone = %mask_phone(&destination),
            message_id = %message_id,
            gateway_message = %reply.message,
            event = "sms_sent",
            "SMS sent successfully"
        );

        Ok(DeliveryReceipt {
            message_id,
            provider: PROVIDER_NAME.to_string(),
        })
    }
}
