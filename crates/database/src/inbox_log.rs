//! Inbound message ledger.
//!
//! A uid present here has been fully handled: its reply (if any) went out.
//! Rows are insert-only apart from retention pruning.

use sqlx::SqliteExecutor;

use crate::error::Result;
use crate::models::InboxLedgerEntry;

/// Whether a message uid was already processed.
pub async fn contains<'e, E>(executor: E, uid: &str) -> Result<bool>
where
    E: SqliteExecutor<'e>,
{
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM inbox_log WHERE uid = ?")
        .bind(uid)
        .fetch_optional(executor)
        .await?;

    Ok(found.is_some())
}

/// Record a processed message. Returns `false` when the uid was already
/// present; the existing row is kept.
pub async fn record<'e, E>(
    executor: E,
    uid: &str,
    from_email: &str,
    subject: Option<&str>,
    body_hash: Option<&str>,
) -> Result<bool>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO inbox_log (uid, from_email, subject, body_hash)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(uid) DO NOTHING
        "#,
    )
    .bind(uid)
    .bind(from_email)
    .bind(subject)
    .bind(body_hash)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Fetch a ledger entry by uid.
pub async fn get_entry<'e, E>(executor: E, uid: &str) -> Result<Option<InboxLedgerEntry>>
where
    E: SqliteExecutor<'e>,
{
    let entry = sqlx::query_as::<_, InboxLedgerEntry>(
        r#"
        SELECT uid, from_email, received_at, subject, body_hash
        FROM inbox_log
        WHERE uid = ?
        "#,
    )
    .bind(uid)
    .fetch_optional(executor)
    .await?;

    Ok(entry)
}

/// Delete entries older than `days`. Returns the number removed.
pub async fn prune_older_than<'e, E>(executor: E, days: u32) -> Result<u64>
where
    E: SqliteExecutor<'e>,
{
    let modifier = format!("-{days} days");
    let result = sqlx::query(
        r#"
        DELETE FROM inbox_log
        WHERE received_at < datetime('now', ?)
        "#,
    )
    .bind(modifier)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}
