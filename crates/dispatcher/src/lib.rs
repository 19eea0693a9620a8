//! Command parsing and the subscription state machine.
//!
//! This crate turns the free-text body of an inbound email into a typed
//! [`Command`] and applies it to the store through [`Dispatcher`], which
//! returns the localized [`Reply`] to send back.
//!
//! # Architecture
//!
//! ```text
//! Email body (from the inbox job)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        PARSER                               │
//! │  1. Strip quoted replies, signatures and attributions       │
//! │  2. Exact phrases: "delete", "delete countdowns"            │
//! │  3. Labeled fields: location=, language=, date=, message=   │
//! │  4. Token scan: language / personality / location words     │
//! └─────────────────────────────────────────────────────────────┘
//!          ↓ Command
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      DISPATCHER                             │
//! │  Geocode → one transaction per command → Reply              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use dispatcher::{parse, Dispatcher, DispatcherConfig};
//!
//! let dispatcher = Dispatcher::new(db, Arc::new(weather), Arc::new(catalog), DispatcherConfig::default());
//! let reply = dispatcher.apply("alice@example.com", parse("Bratislava sk cute")).await?;
//! println!("{}\n\n{}", reply.subject, reply.body);
//! ```

mod command;
mod dispatcher;
mod error;
mod parser;
mod replies;
mod vocabulary;

pub use command::Command;
pub use dispatcher::{local_today, Dispatcher, DispatcherConfig};
pub use error::{DispatchError, Result};
pub use parser::{parse, strip_reply_noise, Parser};
pub use replies::{strings, Reply, ReplyStrings};
pub use vocabulary::{Vocabulary, CALENDAR_FIELDS, SUBSCRIPTION_FIELDS};
