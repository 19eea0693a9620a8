//! SQLite persistence layer for the Daily Brief service.
//!
//! Stores users, weather subscriptions, countdowns and the inbound message
//! ledger using SQLx with SQLite. Query functions are free functions per
//! table that accept any executor: the pool, or `&mut *tx` when several
//! writes must commit together.
//!
//! # Example
//!
//! ```no_run
//! use database::{Database, user};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:data/app.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     user::ensure_user(db.pool(), "alice@example.com", "Europe/Bratislava").await?;
//!     let alice = user::get_user(db.pool(), "alice@example.com").await?;
//!     assert!(!alice.weather_enabled);
//!
//!     Ok(())
//! }
//! ```

pub mod countdown;
pub mod error;
pub mod inbox_log;
pub mod models;
pub mod user;
pub mod validation;
pub mod weather_subscription;

pub use error::{DatabaseError, Result};
pub use models::{
    CountdownEvent, CountdownUpsert, DigestCandidate, InboxLedgerEntry, SubscriptionUpsert,
    User, WeatherSubscription,
};
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::str::FromStr;
use std::time::Duration;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 5;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// A bare path is accepted too and created if missing.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let url = if url.starts_with("sqlite:") {
            url.to_string()
        } else {
            format!("sqlite:{url}")
        };

        let options = SqliteConnectOptions::from_str(&url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!("Connected to database: {} (pool size: {})", url, pool_size);

        Ok(Self { pool })
    }

    /// Open a migrated in-memory database.
    ///
    /// Every pooled connection to `sqlite::memory:` is a separate database,
    /// so the pool is pinned to a single connection.
    pub async fn in_memory() -> Result<Self> {
        let db = Self::connect_with_pool_size("sqlite::memory:", 1).await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Start a transaction.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await?)
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    const ALICE: &str = "alice@example.com";

    fn subscription(email: &str, location: &str) -> SubscriptionUpsert {
        SubscriptionUpsert {
            email: email.to_string(),
            location: location.to_string(),
            latitude: 48.1486,
            longitude: 17.1077,
            personality: "cute".to_string(),
            language: "sk".to_string(),
        }
    }

    fn countdown(name: &str, date: NaiveDate) -> CountdownUpsert {
        CountdownUpsert {
            email: ALICE.to_string(),
            name: name.to_string(),
            date,
            time: None,
            yearly: false,
            message_before: Some("{days} to go".to_string()),
            message_after: None,
        }
    }

    #[tokio::test]
    async fn test_user_crud() {
        let db = Database::in_memory().await.unwrap();

        user::ensure_user(db.pool(), ALICE, "UTC").await.unwrap();
        // Second call must not overwrite.
        user::ensure_user(db.pool(), ALICE, "Europe/Madrid").await.unwrap();

        let fetched = user::get_user(db.pool(), ALICE).await.unwrap();
        assert_eq!(fetched.timezone, "UTC");
        assert!(!fetched.weather_enabled);
        assert!(!fetched.countdown_enabled);

        user::set_weather_enabled(db.pool(), ALICE, true).await.unwrap();
        user::set_timezone(db.pool(), ALICE, "Europe/Bratislava").await.unwrap();
        let fetched = user::get_user(db.pool(), ALICE).await.unwrap();
        assert!(fetched.weather_enabled);
        assert_eq!(fetched.timezone, "Europe/Bratislava");

        assert_eq!(user::list_users(db.pool()).await.unwrap().len(), 1);

        user::delete_user(db.pool(), ALICE).await.unwrap();
        let result = user::get_user(db.pool(), ALICE).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_subscription_upsert_keeps_last_sent_date() {
        let db = Database::in_memory().await.unwrap();
        user::ensure_user(db.pool(), ALICE, "UTC").await.unwrap();

        weather_subscription::upsert_subscription(db.pool(), &subscription(ALICE, "Bratislava"))
            .await
            .unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert!(weather_subscription::mark_digest_sent(db.pool(), ALICE, day)
            .await
            .unwrap());

        weather_subscription::upsert_subscription(db.pool(), &subscription(ALICE, "Košice"))
            .await
            .unwrap();

        let sub = weather_subscription::get_subscription(db.pool(), ALICE)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sub.location, "Košice");
        assert_eq!(sub.personality, "cute");
        assert_eq!(sub.last_sent_date, Some(day));
    }

    #[tokio::test]
    async fn test_mark_digest_sent_claims_once_per_day() {
        let db = Database::in_memory().await.unwrap();
        user::ensure_user(db.pool(), ALICE, "UTC").await.unwrap();
        weather_subscription::upsert_subscription(db.pool(), &subscription(ALICE, "Bratislava"))
            .await
            .unwrap();

        let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let next = day.succ_opt().unwrap();

        assert!(weather_subscription::mark_digest_sent(db.pool(), ALICE, day).await.unwrap());
        assert!(!weather_subscription::mark_digest_sent(db.pool(), ALICE, day).await.unwrap());
        assert!(weather_subscription::mark_digest_sent(db.pool(), ALICE, next).await.unwrap());
        // Never moves backwards.
        assert!(!weather_subscription::mark_digest_sent(db.pool(), ALICE, day).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_fields_require_subscription() {
        let db = Database::in_memory().await.unwrap();
        user::ensure_user(db.pool(), ALICE, "UTC").await.unwrap();

        let result = weather_subscription::update_personality(db.pool(), ALICE, "brutal").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));

        weather_subscription::upsert_subscription(db.pool(), &subscription(ALICE, "Bratislava"))
            .await
            .unwrap();
        weather_subscription::update_personality(db.pool(), ALICE, "brutal")
            .await
            .unwrap();
        weather_subscription::update_language(db.pool(), ALICE, "es")
            .await
            .unwrap();

        let sub = weather_subscription::get_subscription(db.pool(), ALICE)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sub.personality, "brutal");
        assert_eq!(sub.language, "es");
        assert_eq!(sub.location, "Bratislava");
    }

    #[tokio::test]
    async fn test_digest_candidates_require_flag_and_row() {
        let db = Database::in_memory().await.unwrap();
        let bob = "bob@example.com";
        user::ensure_user(db.pool(), ALICE, "Europe/Bratislava").await.unwrap();
        user::ensure_user(db.pool(), bob, "UTC").await.unwrap();

        weather_subscription::upsert_subscription(db.pool(), &subscription(ALICE, "Bratislava"))
            .await
            .unwrap();
        weather_subscription::upsert_subscription(db.pool(), &subscription(bob, "Vienna"))
            .await
            .unwrap();
        user::set_weather_enabled(db.pool(), ALICE, true).await.unwrap();

        let candidates = weather_subscription::list_digest_candidates(db.pool())
            .await
            .unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].email, ALICE);
        assert_eq!(candidates[0].timezone, "Europe/Bratislava");
    }

    #[tokio::test]
    async fn test_subscription_without_user_is_integrity_error() {
        let db = Database::in_memory().await.unwrap();
        let result = weather_subscription::upsert_subscription(
            db.pool(),
            &subscription("ghost@example.com", "Nowhere"),
        )
        .await;
        assert!(matches!(result, Err(DatabaseError::Integrity { .. })));
    }

    #[tokio::test]
    async fn test_countdown_upsert_by_name() {
        let db = Database::in_memory().await.unwrap();
        user::ensure_user(db.pool(), ALICE, "UTC").await.unwrap();

        let first = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let second = NaiveDate::from_ymd_opt(2025, 8, 15).unwrap();
        countdown::upsert_countdown(db.pool(), &countdown("Vacation", first))
            .await
            .unwrap();

        let mut replacement = countdown("Vacation", second);
        replacement.time = NaiveTime::from_hms_opt(9, 30, 0);
        replacement.message_after = Some("Enjoy!".to_string());
        countdown::upsert_countdown(db.pool(), &replacement).await.unwrap();

        let rows = countdown::get_user_countdowns(db.pool(), ALICE).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, second);
        assert_eq!(rows[0].time, NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(rows[0].message_after.as_deref(), Some("Enjoy!"));
    }

    #[tokio::test]
    async fn test_delete_last_countdown_clears_flag() {
        let db = Database::in_memory().await.unwrap();
        user::ensure_user(db.pool(), ALICE, "UTC").await.unwrap();
        user::set_countdown_enabled(db.pool(), ALICE, true).await.unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 12, 24).unwrap();
        countdown::upsert_countdown(db.pool(), &countdown("Christmas", date))
            .await
            .unwrap();
        countdown::upsert_countdown(db.pool(), &countdown("Party", date))
            .await
            .unwrap();

        let mut tx = db.begin().await.unwrap();
        countdown::delete_countdown(&mut *tx, ALICE, "Christmas").await.unwrap();
        tx.commit().await.unwrap();
        assert!(user::get_user(db.pool(), ALICE).await.unwrap().countdown_enabled);

        let mut tx = db.begin().await.unwrap();
        countdown::delete_countdown(&mut *tx, ALICE, "Party").await.unwrap();
        tx.commit().await.unwrap();
        assert!(!user::get_user(db.pool(), ALICE).await.unwrap().countdown_enabled);

        let mut tx = db.begin().await.unwrap();
        let missing = countdown::delete_countdown(&mut *tx, ALICE, "Party").await;
        assert!(matches!(missing, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_all_countdowns() {
        let db = Database::in_memory().await.unwrap();
        user::ensure_user(db.pool(), ALICE, "UTC").await.unwrap();
        user::set_countdown_enabled(db.pool(), ALICE, true).await.unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 12, 24).unwrap();
        for name in ["A", "B", "C"] {
            countdown::upsert_countdown(db.pool(), &countdown(name, date))
                .await
                .unwrap();
        }

        let mut tx = db.begin().await.unwrap();
        let removed = countdown::delete_all_countdowns(&mut *tx, ALICE).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(removed, 3);
        assert_eq!(countdown::count_user_countdowns(db.pool(), ALICE).await.unwrap(), 0);
        assert!(!user::get_user(db.pool(), ALICE).await.unwrap().countdown_enabled);
    }

    #[tokio::test]
    async fn test_delete_user_cascades() {
        let db = Database::in_memory().await.unwrap();
        user::ensure_user(db.pool(), ALICE, "UTC").await.unwrap();
        weather_subscription::upsert_subscription(db.pool(), &subscription(ALICE, "Bratislava"))
            .await
            .unwrap();
        countdown::upsert_countdown(
            db.pool(),
            &countdown("Trip", NaiveDate::from_ymd_opt(2025, 5, 5).unwrap()),
        )
        .await
        .unwrap();

        user::delete_user(db.pool(), ALICE).await.unwrap();

        assert!(weather_subscription::get_subscription(db.pool(), ALICE)
            .await
            .unwrap()
            .is_none());
        assert_eq!(countdown::count_user_countdowns(db.pool(), ALICE).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_inbox_log_dedup_and_prune() {
        let db = Database::in_memory().await.unwrap();

        assert!(!inbox_log::contains(db.pool(), "uid-1").await.unwrap());
        assert!(inbox_log::record(db.pool(), "uid-1", ALICE, Some("hi"), Some("abc"))
            .await
            .unwrap());
        assert!(!inbox_log::record(db.pool(), "uid-1", ALICE, Some("again"), None)
            .await
            .unwrap());
        assert!(inbox_log::contains(db.pool(), "uid-1").await.unwrap());

        let entry = inbox_log::get_entry(db.pool(), "uid-1").await.unwrap().unwrap();
        assert_eq!(entry.subject.as_deref(), Some("hi"));

        sqlx::query(
            "INSERT INTO inbox_log (uid, from_email, received_at) \
             VALUES ('uid-old', 'x@example.com', datetime('now', '-120 days'))",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let pruned = inbox_log::prune_older_than(db.pool(), 90).await.unwrap();
        assert_eq!(pruned, 1);
        assert!(!inbox_log::contains(db.pool(), "uid-old").await.unwrap());
        assert!(inbox_log::contains(db.pool(), "uid-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_file_database_uses_wal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brief.db");
        let db = Database::connect(&path.display().to_string()).await.unwrap();

        let (mode,): (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");

        let (fk,): (i64,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(fk, 1);
        db.close().await;
    }
}
