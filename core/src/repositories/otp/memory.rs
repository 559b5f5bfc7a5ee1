//! In-memory implementation of OtpStore
//!
//! Backs development deployments and tests. State lives for the life of the
//! process.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::PhoneVerification;
use crate::errors::StoreError;

use super::r#trait::{OtpStore, UpdateGuard, VerificationQuery, VerificationUpdate};

/// Process-local verification record store
///
/// Records are kept in insertion order so that records created within the
/// same instant still come back newest first.
#[derive(Clone)]
pub struct InMemoryOtpStore {
    records: Arc<RwLock<Vec<PhoneVerification>>>,
}

impl InMemoryOtpStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Look up a record by id, including soft-deleted ones
    pub async fn get(&self, id: Uuid) -> Option<PhoneVerification> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    /// Number of records held
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for InMemoryOtpStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OtpStore for InMemoryOtpStore {
    async fn create(&self, record: PhoneVerification) -> Result<PhoneVerification, StoreError> {
        let mut records = self.records.write().await;

        if records.iter().any(|r| r.id == record.id) {
            return Err(StoreError::Database(format!(
                "duplicate verification id {}",
                record.id
            )));
        }

        records.push(record.clone());
        Ok(record)
    }

    async fn update_if(
        &self,
        id: Uuid,
        guard: UpdateGuard,
        update: VerificationUpdate,
    ) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;

        match records.iter_mut().find(|r| r.id == id) {
            Some(record) if record.deleted_at.is_none() && guard.holds_for(record) => {
                update.apply_to(record);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<u64, StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| !ids.contains(&r.id));
        Ok((before - records.len()) as u64)
    }

    async fn find(&self, query: &VerificationQuery) -> Result<Vec<PhoneVerification>, StoreError> {
        let records = self.records.read().await;

        let mut matching: Vec<PhoneVerification> = records
            .iter()
            .rev()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = query.limit {
            matching.truncate(limit);
        }

        Ok(matching)
    }
}
