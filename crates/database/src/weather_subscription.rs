//! Weather subscription operations.

use chrono::NaiveDate;
use sqlx::SqliteExecutor;

use crate::error::{DatabaseError, Result};
use crate::models::{DigestCandidate, SubscriptionUpsert, WeatherSubscription};

/// Create or replace the subscription for `upsert.email`.
///
/// `last_sent_date` survives updates so that changing location does not
/// re-trigger a digest on the same day.
pub async fn upsert_subscription<'e, E>(executor: E, upsert: &SubscriptionUpsert) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO weather_subscriptions
            (email, location, latitude, longitude, personality, language)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(email) DO UPDATE SET
            location = excluded.location,
            latitude = excluded.latitude,
            longitude = excluded.longitude,
            personality = excluded.personality,
            language = excluded.language,
            updated_at = datetime('now')
        "#,
    )
    .bind(&upsert.email)
    .bind(&upsert.location)
    .bind(upsert.latitude)
    .bind(upsert.longitude)
    .bind(&upsert.personality)
    .bind(&upsert.language)
    .execute(executor)
    .await
    .map_err(|e| DatabaseError::from_write("WeatherSubscription", &upsert.email, e))?;

    Ok(())
}

/// Get the subscription for a user, if any.
pub async fn get_subscription<'e, E>(executor: E, email: &str) -> Result<Option<WeatherSubscription>>
where
    E: SqliteExecutor<'e>,
{
    let record = sqlx::query_as::<_, WeatherSubscription>(
        r#"
        SELECT email, location, latitude, longitude, personality, language,
               last_sent_date, updated_at
        FROM weather_subscriptions
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(executor)
    .await?;

    Ok(record)
}

/// Change the personality of an existing subscription.
pub async fn update_personality<'e, E>(executor: E, email: &str, personality: &str) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    update_field(executor, email, "personality", personality).await
}

/// Change the language of an existing subscription.
pub async fn update_language<'e, E>(executor: E, email: &str, language: &str) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    update_field(executor, email, "language", language).await
}

async fn update_field<'e, E>(executor: E, email: &str, column: &'static str, value: &str) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!(
        "UPDATE weather_subscriptions SET {column} = ?, updated_at = datetime('now') WHERE email = ?"
    );
    let result = sqlx::query(&sql)
        .bind(value)
        .bind(email)
        .execute(executor)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "WeatherSubscription",
            id: email.to_string(),
        });
    }

    Ok(())
}

/// Delete the subscription. Returns whether a row existed.
pub async fn delete_subscription<'e, E>(executor: E, email: &str) -> Result<bool>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        DELETE FROM weather_subscriptions
        WHERE email = ?
        "#,
    )
    .bind(email)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Users actively receiving digests: weather enabled and a subscription row.
pub async fn list_digest_candidates<'e, E>(executor: E) -> Result<Vec<DigestCandidate>>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query_as::<_, DigestCandidate>(
        r#"
        SELECT u.email, u.timezone, u.countdown_enabled,
               ws.location, ws.latitude, ws.longitude, ws.personality,
               ws.language, ws.last_sent_date
        FROM users u
        INNER JOIN weather_subscriptions ws ON ws.email = u.email
        WHERE u.weather_enabled = 1
        ORDER BY u.email
        "#,
    )
    .fetch_all(executor)
    .await?;

    Ok(rows)
}

/// Record that the digest for `date` went out.
///
/// Only moves `last_sent_date` forward. Returns `false` when the date was
/// already recorded (or the subscription is gone), so a second sender for
/// the same day can tell it lost.
pub async fn mark_digest_sent<'e, E>(executor: E, email: &str, date: NaiveDate) -> Result<bool>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        UPDATE weather_subscriptions
        SET last_sent_date = ?
        WHERE email = ? AND (last_sent_date IS NULL OR last_sent_date < ?)
        "#,
    )
    .bind(date)
    .bind(email)
    .bind(date)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}
