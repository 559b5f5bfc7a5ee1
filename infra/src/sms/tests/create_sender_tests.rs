//! Unit tests for notification sender selection

use crate::config::{SmsConfig, SmsProvider};
use crate::sms::create_notification_sender;
use crate::InfrastructureError;

#[tokio::test]
async fn test_create_mock_sender() {
    let sender = create_notification_sender(&SmsConfig::default()).unwrap();
    let receipt = sender.send("+9779812345678", "hello").await.unwrap();
    assert_eq!(receipt.provider, "mock");
}

#[test]
fn test_create_spydo_sender_requires_credentials() {
    let config = SmsConfig {
        provider: SmsProvider::Spydo,
        ..SmsConfig::default()
    };

    match create_notification_sender(&config) {
        Err(InfrastructureError::Config(msg)) => assert!(msg.contains("API key")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("sender created without credentials"),
    }
}

#[test]
fn test_create_spydo_sender_with_credentials() {
    let config = SmsConfig {
        provider: SmsProvider::Spydo,
        api_key: "key-123".to_string(),
        sender_id: "GAG".to_string(),
        ..SmsConfig::default()
    };

    assert!(create_notification_sender(&config).is_ok());
}
