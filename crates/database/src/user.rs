//! User operations.
//!
//! Every function takes any SQLite executor, so callers can pass the pool
//! or `&mut *tx` inside a transaction.

use sqlx::SqliteExecutor;

use crate::error::{DatabaseError, Result};
use crate::models::User;

const USER_COLUMNS: &str = "email, name, timezone, weather_enabled, countdown_enabled, \
                            reminder_enabled, created_at, updated_at";

/// Create the user if absent. Existing rows are left untouched.
pub async fn ensure_user<'e, E>(executor: E, email: &str, timezone: &str) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO users (email, timezone)
        VALUES (?, ?)
        ON CONFLICT(email) DO NOTHING
        "#,
    )
    .bind(email)
    .bind(timezone)
    .execute(executor)
    .await?;

    Ok(())
}

/// Get a user by email.
pub async fn get_user<'e, E>(executor: E, email: &str) -> Result<User>
where
    E: SqliteExecutor<'e>,
{
    find_user(executor, email)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "User",
            id: email.to_string(),
        })
}

/// Get a user by email, `None` if absent.
pub async fn find_user<'e, E>(executor: E, email: &str) -> Result<Option<User>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .fetch_optional(executor)
        .await?;

    Ok(user)
}

/// Toggle the weather module flag. Missing users are ignored.
pub async fn set_weather_enabled<'e, E>(executor: E, email: &str, enabled: bool) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        r#"
        UPDATE users
        SET weather_enabled = ?, updated_at = datetime('now')
        WHERE email = ?
        "#,
    )
    .bind(enabled)
    .bind(email)
    .execute(executor)
    .await?;

    Ok(())
}

/// Toggle the countdown module flag. Missing users are ignored.
pub async fn set_countdown_enabled<'e, E>(executor: E, email: &str, enabled: bool) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        r#"
        UPDATE users
        SET countdown_enabled = ?, updated_at = datetime('now')
        WHERE email = ?
        "#,
    )
    .bind(enabled)
    .bind(email)
    .execute(executor)
    .await?;

    Ok(())
}

/// Set the user's timezone.
pub async fn set_timezone<'e, E>(executor: E, email: &str, timezone: &str) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        UPDATE users
        SET timezone = ?, updated_at = datetime('now')
        WHERE email = ?
        "#,
    )
    .bind(timezone)
    .bind(email)
    .execute(executor)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: email.to_string(),
        });
    }

    Ok(())
}

/// Delete a user. Subscriptions and countdowns go with it.
pub async fn delete_user<'e, E>(executor: E, email: &str) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        DELETE FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .execute(executor)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: email.to_string(),
        });
    }

    Ok(())
}

/// List all users.
pub async fn list_users<'e, E>(executor: E) -> Result<Vec<User>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY email");
    let users = sqlx::query_as::<_, User>(&sql).fetch_all(executor).await?;

    Ok(users)
}
