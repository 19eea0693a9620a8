use thiserror::Error;

/// Errors that can occur when talking to the mail server.
#[derive(Debug, Error)]
pub enum MailError {
    /// IMAP connection could not be established
    #[error("IMAP connection error: {0}")]
    ImapConnection(String),

    /// IMAP command failed
    #[error("IMAP error: {0}")]
    Imap(String),

    /// IMAP login rejected
    #[error("IMAP authentication failed: {0}")]
    ImapAuth(String),

    /// TLS handshake or STARTTLS upgrade failed
    #[error("TLS error: {0}")]
    Tls(String),

    /// Failed to build SMTP transport
    #[error("SMTP transport error: {0}")]
    Transport(String),

    /// Failed to send email
    #[error("Failed to send email: {0}")]
    Send(String),

    /// Failed to build email message
    #[error("Failed to build email: {0}")]
    BuildEmail(String),

    /// Invalid email address
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Raw message could not be parsed
    #[error("Failed to parse message: {0}")]
    ParseMessage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing required environment variable
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// Operation exceeded the configured timeout
    #[error("Mail operation timed out: {0}")]
    Timeout(String),
}

/// Result type for mail operations.
pub type Result<T> = std::result::Result<T, MailError>;
