//! Countdown event operations.

use sqlx::{SqliteConnection, SqliteExecutor};

use crate::error::{DatabaseError, Result};
use crate::models::{CountdownEvent, CountdownUpsert};

const COUNTDOWN_COLUMNS: &str = "id, email, name, date, time, yearly, message_before, \
                                 message_after, created_at, updated_at";

/// Insert a countdown, or replace the one with the same name for this user.
pub async fn upsert_countdown<'e, E>(executor: E, upsert: &CountdownUpsert) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO countdowns
            (email, name, date, time, yearly, message_before, message_after)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(email, name) DO UPDATE SET
            date = excluded.date,
            time = excluded.time,
            yearly = excluded.yearly,
            message_before = excluded.message_before,
            message_after = excluded.message_after,
            updated_at = datetime('now')
        "#,
    )
    .bind(&upsert.email)
    .bind(&upsert.name)
    .bind(upsert.date)
    .bind(upsert.time)
    .bind(upsert.yearly)
    .bind(&upsert.message_before)
    .bind(&upsert.message_after)
    .execute(executor)
    .await
    .map_err(|e| DatabaseError::from_write("Countdown", &upsert.name, e))?;

    Ok(())
}

/// All countdowns for a user, ordered by target date.
pub async fn get_user_countdowns<'e, E>(executor: E, email: &str) -> Result<Vec<CountdownEvent>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!(
        "SELECT {COUNTDOWN_COLUMNS} FROM countdowns WHERE email = ? ORDER BY date, name"
    );
    let rows = sqlx::query_as::<_, CountdownEvent>(&sql)
        .bind(email)
        .fetch_all(executor)
        .await?;

    Ok(rows)
}

/// Number of countdowns a user has.
pub async fn count_user_countdowns<'e, E>(executor: E, email: &str) -> Result<i64>
where
    E: SqliteExecutor<'e>,
{
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM countdowns WHERE email = ?")
        .bind(email)
        .fetch_one(executor)
        .await?;

    Ok(count)
}

/// Delete one countdown by name.
///
/// When it was the user's last countdown, `countdown_enabled` is cleared
/// in the same connection. Run inside a transaction to make the pair atomic.
pub async fn delete_countdown(conn: &mut SqliteConnection, email: &str, name: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM countdowns
        WHERE email = ? AND name = ?
        "#,
    )
    .bind(email)
    .bind(name)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Countdown",
            id: name.to_string(),
        });
    }

    if count_user_countdowns(&mut *conn, email).await? == 0 {
        crate::user::set_countdown_enabled(&mut *conn, email, false).await?;
    }

    Ok(())
}

/// Delete every countdown for a user and clear the module flag.
///
/// Returns the number of countdowns removed.
pub async fn delete_all_countdowns(conn: &mut SqliteConnection, email: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM countdowns WHERE email = ?")
        .bind(email)
        .execute(&mut *conn)
        .await?;

    crate::user::set_countdown_enabled(&mut *conn, email, false).await?;

    Ok(result.rows_affected())
}
