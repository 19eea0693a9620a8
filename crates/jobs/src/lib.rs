//! Background tasks of the Daily Brief service.
//!
//! Two time-driven loops share one store:
//!
//! - [`InboxProcessor`] polls the mailbox, answers command mail and records
//!   each handled message in the dedup ledger.
//! - [`DigestRunner`] sends each subscriber their brief at the configured
//!   local hour and prunes the ledger.
//!
//! Both process items one at a time and check a [`Shutdown`] flag between
//! items, so a stop request never interrupts a half-written command.
//!
//! # Example
//!
//! ```rust,ignore
//! use jobs::{DigestConfig, DigestRunner, InboxConfig, InboxProcessor, Shutdown};
//!
//! let shutdown = Shutdown::new();
//! let inbox = InboxProcessor::new(mailbox, sender.clone(), dispatcher, InboxConfig::new(address));
//! let digests = DigestRunner::new(db, weather, sender, catalog, DigestConfig::default());
//!
//! tokio::join!(inbox.run(shutdown.clone()), digests.run(shutdown.clone()));
//! ```

mod daily;
mod error;
mod inbox;
mod prefilter;
mod shutdown;

pub use daily::{DigestConfig, DigestRunner, DigestSummary};
pub use error::{JobError, Result};
pub use inbox::{InboxConfig, InboxProcessor, PollSummary, ProcessResult, DEFAULT_POLL_INTERVAL};
pub use prefilter::automated_reason;
pub use shutdown::Shutdown;
