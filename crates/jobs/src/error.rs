//! Error types for the background tasks.

use database::DatabaseError;
use dispatcher::DispatchError;
use mail_gateway::MailError;
use thiserror::Error;

/// Errors that end a whole poll or digest pass.
///
/// Failures of a single message or subscriber are logged and counted
/// instead; only errors that make the rest of the pass pointless surface
/// here.
#[derive(Debug, Error)]
pub enum JobError {
    /// Mailbox could not be read or updated.
    #[error("mail error: {0}")]
    Mail(#[from] MailError),

    /// Store read or write failed.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// A command could not be applied.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Result type for job operations.
pub type Result<T> = std::result::Result<T, JobError>;
