//! MySQL implementation of the OtpStore trait.
//!
//! Every mutation is a single statement. Conditional updates put their
//! guard in the `WHERE` clause and report success through the affected row
//! count, which makes them atomic without explicit transactions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, MySql, MySqlPool, QueryBuilder, Row};
use uuid::Uuid;

use pv_core::domain::entities::PhoneVerification;
use pv_core::errors::StoreError;
use pv_core::repositories::{OtpStore, UpdateGuard, VerificationQuery, VerificationUpdate};

const SELECT_COLUMNS: &str = "SELECT id, phone_number, otp_code, expires_at, is_verified, \
     attempts, max_attempts, created_at, updated_at, deleted_at FROM phone_verification";

/// MySQL implementation of OtpStore
pub struct MySqlOtpStore {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlOtpStore {
    /// Create a new MySQL OTP store
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to PhoneVerification entity
    fn row_to_verification(row: &MySqlRow) -> Result<PhoneVerification, StoreError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| StoreError::Corrupt(format!("Failed to get id: {}", e)))?;

        Ok(PhoneVerification {
            id: Uuid::parse_str(&id)
                .map_err(|e| StoreError::Corrupt(format!("Invalid verification UUID: {}", e)))?,
            phone_number: row
                .try_get("phone_number")
                .map_err(|e| StoreError::Corrupt(format!("Failed to get phone_number: {}", e)))?,
            otp_code: row
                .try_get("otp_code")
                .map_err(|e| StoreError::Corrupt(format!("Failed to get otp_code: {}", e)))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| StoreError::Corrupt(format!("Failed to get expires_at: {}", e)))?,
            is_verified: row
                .try_get("is_verified")
                .map_err(|e| StoreError::Corrupt(format!("Failed to get is_verified: {}", e)))?,
            attempts: row
                .try_get("attempts")
                .map_err(|e| StoreError::Corrupt(format!("Failed to get attempts: {}", e)))?,
            max_attempts: row
                .try_get("max_attempts")
                .map_err(|e| StoreError::Corrupt(format!("Failed to get max_attempts: {}", e)))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| StoreError::Corrupt(format!("Failed to get created_at: {}", e)))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| StoreError::Corrupt(format!("Failed to get updated_at: {}", e)))?,
            deleted_at: row
                .try_get::<Option<DateTime<Utc>>, _>("deleted_at")
                .map_err(|e| StoreError::Corrupt(format!("Failed to get deleted_at: {}", e)))?,
        })
    }
}

/// `SELECT` for a verification query
pub(crate) fn build_find_query(query: &VerificationQuery) -> QueryBuilder<'static, MySql> {
    let mut builder = QueryBuilder::new(SELECT_COLUMNS);
    builder.push(" WHERE deleted_at IS NULL");

    if let Some(phone) = &query.phone_number {
        builder.push(" AND phone_number = ").push_bind(phone.clone());
    }
    if let Some(is_verified) = query.is_verified {
        builder.push(" AND is_verified = ").push_bind(is_verified);
    }
    if let Some(at) = query.expires_at_or_after {
        builder.push(" AND expires_at >= ").push_bind(at);
    }
    if let Some(at) = query.expires_before {
        builder.push(" AND expires_at < ").push_bind(at);
    }
    if let Some(at) = query.created_at_or_after {
        builder.push(" AND created_at >= ").push_bind(at);
    }

    builder.push(" ORDER BY created_at DESC");

    if let Some(limit) = query.limit {
        builder.push(" LIMIT ").push_bind(limit as u64);
    }

    builder
}

/// Guarded `UPDATE` for one record
pub(crate) fn build_update_query(
    id: Uuid,
    guard: &UpdateGuard,
    update: &VerificationUpdate,
) -> QueryBuilder<'static, MySql> {
    let mut builder = QueryBuilder::new("UPDATE phone_verification SET updated_at = ");
    builder.push_bind(update.updated_at);

    if let Some(attempts) = update.attempts {
        builder.push(", attempts = ").push_bind(attempts);
    }
    if let Some(is_verified) = update.is_verified {
        builder.push(", is_verified = ").push_bind(is_verified);
    }

    builder
        .push(" WHERE id = ")
        .push_bind(id.to_string())
        .push(" AND deleted_at IS NULL");

    if let Some(attempts) = guard.expected_attempts {
        builder.push(" AND attempts = ").push_bind(attempts);
    }
    if let Some(is_verified) = guard.expected_is_verified {
        builder.push(" AND is_verified = ").push_bind(is_verified);
    }

    builder
}

/// `DELETE` for a non-empty id list
pub(crate) fn build_delete_query(ids: &[Uuid]) -> QueryBuilder<'static, MySql> {
    let mut builder = QueryBuilder::new("DELETE FROM phone_verification WHERE id IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id.to_string());
    }
    separated.push_unseparated(")");
    builder
}

#[async_trait]
impl OtpStore for MySqlOtpStore {
    async fn create(&self, record: PhoneVerification) -> Result<PhoneVerification, StoreError> {
        let query = r#"
            INSERT INTO phone_verification (
                id, phone_number, otp_code, expires_at, is_verified, attempts,
                max_attempts, created_at, updated_at, deleted_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(record.id.to_string())
            .bind(&record.phone_number)
            .bind(&record.otp_code)
            .bind(record.expires_at)
            .bind(record.is_verified)
            .bind(record.attempts)
            .bind(record.max_attempts)
            .bind(record.created_at)
            .bind(record.updated_at)
            .bind(record.deleted_at)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to insert verification: {}", e)))?;

        Ok(record)
    }

    async fn update_if(
        &self,
        id: Uuid,
        guard: UpdateGuard,
        update: VerificationUpdate,
    ) -> Result<bool, StoreError> {
        let result = build_update_query(id, &guard, &update)
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to update verification: {}", e)))?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<u64, StoreError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = build_delete_query(ids)
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to delete verifications: {}", e)))?;

        Ok(result.rows_affected())
    }

    async fn find(&self, query: &VerificationQuery) -> Result<Vec<PhoneVerification>, StoreError> {
        let rows = build_find_query(query)
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to query verifications: {}", e)))?;

        rows.iter().map(Self::row_to_verification).collect()
    }
}
