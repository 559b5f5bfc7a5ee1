//! SMS provider configuration module

use serde::{Deserialize, Serialize};

/// Supported SMS providers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsProvider {
    /// Logs messages instead of sending them
    #[default]
    Mock,
    /// Spydo bulk SMS HTTP gateway
    Spydo,
}

/// SMS service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SmsConfig {
    /// Selected provider
    pub provider: SmsProvider,

    /// Gateway API key
    pub api_key: String,

    /// Registered sender id shown to recipients
    pub sender_id: String,

    /// Gateway endpoint
    pub base_url: String,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: SmsProvider::Mock,
            api_key: String::new(),
            sender_id: String::new(),
            base_url: String::from("https://bulk.bedbyaspokhrel.com.np/smsapi/index"),
        }
    }
}
