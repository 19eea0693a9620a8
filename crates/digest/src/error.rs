//! Error types for digest rendering.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Unknown personality: {0}")]
    UnknownPersonality(String),

    /// A message or name day file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data line did not follow the expected format.
    #[error("{file}:{line}: {reason}")]
    Format {
        file: String,
        line: usize,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, DigestError>;
