//! Store error types.

use thiserror::Error;

/// Errors raised by the message store.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLx error (connection, query, decode).
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Embedded migrations failed to apply.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Row not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A write referenced a parent row that does not exist, e.g. a
    /// countdown for a user deleted in between.
    #[error("{entity} integrity violation for {id}")]
    Integrity { entity: &'static str, id: String },
}

impl DatabaseError {
    /// Map a raw SQLx error, turning foreign-key failures into
    /// [`DatabaseError::Integrity`].
    pub(crate) fn from_write(entity: &'static str, id: &str, err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_foreign_key_violation() {
                return DatabaseError::Integrity {
                    entity,
                    id: id.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(err)
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
