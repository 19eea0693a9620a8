//! Error types for command dispatch.

use database::DatabaseError;
use thiserror::Error;

/// Errors that abort a single command.
///
/// Everything recoverable (unknown location, weather service down, no
/// subscription yet) is answered with a reply instead.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Store read or write failed; the command's transaction was rolled back.
    #[error("store error: {0}")]
    Database(#[from] DatabaseError),
}

/// Result type for dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;
