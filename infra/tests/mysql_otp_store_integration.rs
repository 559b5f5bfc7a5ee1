//! Integration tests for the MySQL OTP store
//!
//! Require a MySQL server; set `DATABASE_URL` and run with `--ignored`.

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use pv_core::domain::entities::PhoneVerification;
    use pv_core::repositories::{OtpStore, UpdateGuard, VerificationQuery, VerificationUpdate};
    use pv_infra::config::DatabaseConfig;
    use pv_infra::database::{DatabasePool, MySqlOtpStore};

    async fn store() -> MySqlOtpStore {
        dotenvy::dotenv().ok();
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let pool = DatabasePool::new(DatabaseConfig::new(url))
            .await
            .expect("Failed to create database pool");
        pool.run_migrations().await.expect("Failed to run migrations");

        MySqlOtpStore::new(pool.get_pool().clone())
    }

    // Unique per test run so parallel runs don't see each other's rows
    fn test_phone() -> String {
        let suffix = Uuid::new_v4().as_u128() % 100_000_000;
        format!("98{:08}", suffix)
    }

    #[tokio::test]
    #[ignore] // Requires MySQL to be running
    async fn test_create_and_find_most_recent() {
        let store = store().await;
        let phone = test_phone();
        let now = Utc::now();

        let older = PhoneVerification::issue(
            phone.clone(),
            "111111".to_string(),
            now - Duration::seconds(30),
            Duration::minutes(5),
            3,
        );
        let newer =
            PhoneVerification::issue(phone.clone(), "222222".into(), now, Duration::minutes(5), 3);
        store.create(older.clone()).await.unwrap();
        store.create(newer.clone()).await.unwrap();

        let query = VerificationQuery::for_phone(phone.as_str())
            .verified(false)
            .expiring_at_or_after(now);
        let found = store.find_most_recent(&query).await.unwrap().unwrap();

        assert_eq!(found.id, newer.id);
        assert_eq!(found.otp_code, "222222");

        store.delete_by_ids(&[older.id, newer.id]).await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires MySQL to be running
    async fn test_guarded_update_applies_once() {
        let store = store().await;
        let phone = test_phone();
        let now = Utc::now();

        let record =
            PhoneVerification::issue(phone.clone(), "333333".into(), now, Duration::minutes(5), 3);
        store.create(record.clone()).await.unwrap();

        let claim = || VerificationUpdate::new(Utc::now()).attempts(1);
        let guard = || UpdateGuard::default().attempts(0);
        assert!(store.update_if(record.id, guard(), claim()).await.unwrap());
        assert!(!store.update_if(record.id, guard(), claim()).await.unwrap());

        let verified = VerificationUpdate::new(Utc::now()).verified();
        assert!(store
            .update_if(record.id, UpdateGuard::default().unverified(), verified)
            .await
            .unwrap());

        let found = store
            .find(&VerificationQuery::for_phone(phone.as_str()).verified(true))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].attempts, 1);

        store.delete_by_ids(&[record.id]).await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires MySQL to be running
    async fn test_expired_records_are_selected_for_cleanup() {
        let store = store().await;
        let phone = test_phone();
        let now = Utc::now();

        let expired = PhoneVerification::issue(
            phone.clone(),
            "444444".to_string(),
            now - Duration::minutes(10),
            Duration::minutes(5),
            3,
        );
        let live =
            PhoneVerification::issue(phone.clone(), "555555".into(), now, Duration::minutes(5), 3);
        store.create(expired.clone()).await.unwrap();
        store.create(live.clone()).await.unwrap();

        let stale = store
            .find(&VerificationQuery::for_phone(phone.as_str()).expired_before(now))
            .await
            .unwrap();
        let ids: Vec<Uuid> = stale.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![expired.id]);

        assert_eq!(store.delete_by_ids(&ids).await.unwrap(), 1);
        assert_eq!(
            store.find(&VerificationQuery::for_phone(phone.as_str())).await.unwrap().len(),
            1
        );

        store.delete_by_ids(&[live.id]).await.unwrap();
    }
}
