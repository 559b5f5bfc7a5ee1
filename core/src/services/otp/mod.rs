//! OTP lifecycle module
//!
//! This module provides the complete passcode workflow:
//! - Passcode generation, persistence and SMS delivery
//! - Verification with guarded attempt counting
//! - Resend cooldown and send-path rate limiting
//! - Verified-phone lookup and expired record cleanup

mod cleanup;
mod config;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use cleanup::OtpCleanupTask;
pub use config::OtpServiceConfig;
pub use service::OtpLifecycleManager;
pub use traits::{DeliveryReceipt, NotificationSender};
pub use types::{SendOtpResult, VerifyOtpResult};
