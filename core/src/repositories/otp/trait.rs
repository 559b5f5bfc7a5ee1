//! OTP store trait defining the persistence contract for verification records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::PhoneVerification;
use crate::errors::StoreError;

/// Filter over verification records
///
/// Every set field must hold. Soft-deleted records never match. Results are
/// ordered by `created_at` descending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationQuery {
    pub phone_number: Option<String>,
    pub is_verified: Option<bool>,
    /// `expires_at >= t`
    pub expires_at_or_after: Option<DateTime<Utc>>,
    /// `expires_at < t`
    pub expires_before: Option<DateTime<Utc>>,
    /// `created_at >= t`
    pub created_at_or_after: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl VerificationQuery {
    /// Match every live record
    pub fn any() -> Self {
        Self::default()
    }

    /// Match records for one canonical phone number
    pub fn for_phone(phone_number: impl Into<String>) -> Self {
        Self {
            phone_number: Some(phone_number.into()),
            ..Self::default()
        }
    }

    pub fn verified(mut self, is_verified: bool) -> Self {
        self.is_verified = Some(is_verified);
        self
    }

    pub fn expiring_at_or_after(mut self, at: DateTime<Utc>) -> Self {
        self.expires_at_or_after = Some(at);
        self
    }

    pub fn expired_before(mut self, at: DateTime<Utc>) -> Self {
        self.expires_before = Some(at);
        self
    }

    pub fn created_since(mut self, at: DateTime<Utc>) -> Self {
        self.created_at_or_after = Some(at);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Evaluate the filter against a single record
    pub fn matches(&self, record: &PhoneVerification) -> bool {
        record.deleted_at.is_none()
            && self
                .phone_number
                .as_deref()
                .map_or(true, |phone| record.phone_number == phone)
            && self.is_verified.map_or(true, |v| record.is_verified == v)
            && self
                .expires_at_or_after
                .map_or(true, |t| record.expires_at >= t)
            && self.expires_before.map_or(true, |t| record.expires_at < t)
            && self
                .created_at_or_after
                .map_or(true, |t| record.created_at >= t)
    }
}

/// Preconditions for a conditional update
///
/// The update applies only if every set field still equals the stored value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateGuard {
    pub expected_attempts: Option<i32>,
    pub expected_is_verified: Option<bool>,
}

impl UpdateGuard {
    pub fn attempts(mut self, attempts: i32) -> Self {
        self.expected_attempts = Some(attempts);
        self
    }

    pub fn unverified(mut self) -> Self {
        self.expected_is_verified = Some(false);
        self
    }

    pub fn holds_for(&self, record: &PhoneVerification) -> bool {
        self.expected_attempts.map_or(true, |a| record.attempts == a)
            && self
                .expected_is_verified
                .map_or(true, |v| record.is_verified == v)
    }
}

/// Field changes applied by a conditional update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationUpdate {
    pub attempts: Option<i32>,
    pub is_verified: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

impl VerificationUpdate {
    pub fn new(updated_at: DateTime<Utc>) -> Self {
        Self {
            attempts: None,
            is_verified: None,
            updated_at,
        }
    }

    pub fn attempts(mut self, attempts: i32) -> Self {
        self.attempts = Some(attempts);
        self
    }

    pub fn verified(mut self) -> Self {
        self.is_verified = Some(true);
        self
    }

    pub fn apply_to(&self, record: &mut PhoneVerification) {
        if let Some(attempts) = self.attempts {
            record.attempts = attempts;
        }
        if let Some(is_verified) = self.is_verified {
            record.is_verified = is_verified;
        }
        record.updated_at = self.updated_at;
    }
}

/// Persistence contract for verification records
///
/// Implementations must make `update_if` atomic: the guard check and the
/// write happen as one step, so two concurrent callers holding the same
/// guard cannot both succeed.
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Persist a new record and return it as stored
    async fn create(&self, record: PhoneVerification) -> Result<PhoneVerification, StoreError>;

    /// Apply `update` to record `id` only if `guard` still holds
    ///
    /// # Returns
    /// * `Ok(true)` - The update was applied
    /// * `Ok(false)` - The record is missing or the guard no longer holds
    async fn update_if(
        &self,
        id: Uuid,
        guard: UpdateGuard,
        update: VerificationUpdate,
    ) -> Result<bool, StoreError>;

    /// Remove records by id, returning how many were removed
    async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<u64, StoreError>;

    /// Records matching `query`, most recent first
    async fn find(&self, query: &VerificationQuery) -> Result<Vec<PhoneVerification>, StoreError>;

    /// Most recent record matching `query`
    async fn find_most_recent(
        &self,
        query: &VerificationQuery,
    ) -> Result<Option<PhoneVerification>, StoreError> {
        let query = query.clone().limit(1);
        Ok(self.find(&query).await?.into_iter().next())
    }
}
