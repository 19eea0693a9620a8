//! # mail-gateway
//!
//! IMAP fetch and SMTP send for a single service mailbox.
//!
//! ## Sending Email
//!
//! ```no_run
//! use mail_gateway::{Email, MailConfig, SmtpClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mail_gateway::MailError> {
//!     let config = MailConfig::from_env()?;
//!     let client = SmtpClient::new(&config)?;
//!
//!     let email = Email::new("someone@example.com", "Hello", "Plain text body");
//!     client.send(&email).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Polling for Commands
//!
//! ```no_run
//! use mail_gateway::{ImapMailbox, MailConfig, MailSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mail_gateway::MailError> {
//!     let mailbox = ImapMailbox::new(MailConfig::from_env()?);
//!
//!     let messages = mailbox.fetch_unseen().await?;
//!     for msg in &messages {
//!         println!("{}: {}", msg.uid, msg.subject);
//!     }
//!     let uids: Vec<u32> = messages.iter().map(|m| m.uid).collect();
//!     mailbox.mark_seen(&uids).await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod gateway;
mod imap_client;
pub mod mock;
mod types;

pub use client::SmtpClient;
pub use config::{ImapTls, MailConfig, SmtpTls};
pub use error::{MailError, Result};
pub use gateway::{ImapMailbox, LoggingSender, MailSender, MailSource};
pub use imap_client::{parse_message, ImapClient};
pub use mock::{InMemoryMailbox, RecordingSender};
pub use types::{Email, InboxMessage};
