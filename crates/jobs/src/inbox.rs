//! Inbound command mail processing.
//!
//! Each poll walks the unseen messages in UID order:
//!
//! ```text
//! fetched → automated? ──yes──→ mark seen, no reply
//!    │
//!    └─→ in ledger? ──yes──→ mark seen, no reply
//!           │
//!           └─→ parse → dispatch → reply → ledger → mark seen
//! ```
//!
//! A message is in the ledger only once its reply was attempted, so a crash
//! between dispatch and ledger insert re-applies the command on the next
//! poll. Every command is idempotent, so that costs at most a second reply.

use std::sync::Arc;
use std::time::Duration;

use database::inbox_log;
use database::validation::normalize_email;
use dispatcher::{Dispatcher, Parser, Reply};
use mail_gateway::{Email, InboxMessage, MailSender, MailSource};
use sha2::{Digest, Sha256};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};
use weather_gateway::WeatherProvider;

use crate::error::Result;
use crate::prefilter::automated_reason;
use crate::shutdown::Shutdown;

/// Default delay between inbox polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Configuration for the inbox processor.
#[derive(Debug, Clone)]
pub struct InboxConfig {
    /// The service's own address; mail from it is never answered.
    pub own_address: String,

    /// Delay between polls in [`InboxProcessor::run`].
    pub poll_interval: Duration,
}

impl InboxConfig {
    pub fn new(own_address: impl Into<String>) -> Self {
        Self {
            own_address: own_address.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Outcome of handling one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessResult {
    /// Command applied and a reply attempted.
    Replied {
        uid: u32,
        sender: String,
        subject: String,
        /// `false` when the reply could not be sent.
        delivered: bool,
    },
    /// Automated or empty mail, dropped without a ledger entry.
    Filtered { uid: u32, reason: &'static str },
    /// Already handled in an earlier poll.
    Duplicate { uid: u32 },
}

/// Counters for one poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub fetched: usize,
    pub replied: usize,
    pub filtered: usize,
    pub duplicates: usize,
    pub failed: usize,
}

impl PollSummary {
    fn record(&mut self, result: &ProcessResult) {
        match result {
            ProcessResult::Replied { .. } => self.replied += 1,
            ProcessResult::Filtered { .. } => self.filtered += 1,
            ProcessResult::Duplicate { .. } => self.duplicates += 1,
        }
    }
}

/// Polls a mailbox and answers command mail through the dispatcher.
pub struct InboxProcessor<W> {
    source: Arc<dyn MailSource>,
    sender: Arc<dyn MailSender>,
    dispatcher: Arc<Dispatcher<W>>,
    parser: Parser,
    config: InboxConfig,
}

impl<W: WeatherProvider> InboxProcessor<W> {
    pub fn new(
        source: Arc<dyn MailSource>,
        sender: Arc<dyn MailSender>,
        dispatcher: Arc<Dispatcher<W>>,
        config: InboxConfig,
    ) -> Self {
        Self {
            source,
            sender,
            dispatcher,
            parser: Parser::default(),
            config,
        }
    }

    /// Use a custom parser, e.g. one with an extended vocabulary.
    pub fn with_parser(mut self, parser: Parser) -> Self {
        self.parser = parser;
        self
    }

    pub fn dispatcher(&self) -> &Dispatcher<W> {
        &self.dispatcher
    }

    /// Handle one message. Does not mark it seen.
    #[instrument(skip(self, message), fields(uid = message.uid))]
    pub async fn process_message(&self, message: &InboxMessage) -> Result<ProcessResult> {
        let uid = message.uid;

        if let Some(reason) = automated_reason(message, &self.config.own_address) {
            debug!(reason, "Skipping automated message");
            return Ok(ProcessResult::Filtered { uid, reason });
        }
        let Some(sender) = message.from.as_deref().map(normalize_email) else {
            return Ok(ProcessResult::Filtered { uid, reason: "no sender" });
        };

        let key = message.dedup_key();
        let pool = self.dispatcher.database().pool();
        if inbox_log::contains(pool, &key).await? {
            debug!(key = %key, "Message already processed");
            return Ok(ProcessResult::Duplicate { uid });
        }

        let body = message.text();
        let command = self.parser.parse(&body);
        info!(sender = %sender, command = %command.description(), "Processing command");

        let reply = match self.dispatcher.apply(&sender, command).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(sender = %sender, error = %e, "Command failed");
                let language = self
                    .dispatcher
                    .reply_language(&sender)
                    .await
                    .unwrap_or_default();
                Reply::error(language)
            }
        };

        let subject = reply.subject.clone();
        let mut email = Email::new(sender.clone(), reply.subject, reply.body);
        if let Some(message_id) = &message.message_id {
            email = email.in_reply_to(message_id.clone());
        }

        // A failed reply is not retried: the command was applied, and
        // reprocessing would only repeat the same failure.
        let delivered = match self.sender.send(&email).await {
            Ok(()) => true,
            Err(e) => {
                error!(sender = %sender, error = %e, "Failed to send reply");
                false
            }
        };

        inbox_log::record(
            pool,
            &key,
            &sender,
            Some(message.subject.as_str()),
            Some(sha256_hex(body.as_bytes()).as_str()),
        )
        .await?;

        Ok(ProcessResult::Replied {
            uid,
            sender,
            subject,
            delivered,
        })
    }

    /// Fetch and handle every unseen message once.
    ///
    /// Messages are handled one at a time and `shutdown` is checked between
    /// them. Handled messages are marked seen in one batch at the end; a
    /// message whose handling failed stays unseen and is retried next poll.
    pub async fn poll_once(&self, shutdown: &Shutdown) -> Result<PollSummary> {
        let messages = self.source.fetch_unseen().await?;
        let mut summary = PollSummary {
            fetched: messages.len(),
            ..Default::default()
        };
        let mut handled = Vec::with_capacity(messages.len());

        for message in &messages {
            if shutdown.is_triggered() {
                info!(remaining = messages.len() - handled.len(), "Shutdown requested, stopping poll");
                break;
            }

            match self.process_message(message).await {
                Ok(result) => {
                    summary.record(&result);
                    handled.push(message.uid);
                }
                Err(e) => {
                    error!(uid = message.uid, error = %e, "Failed to process message");
                    summary.failed += 1;
                }
            }
        }

        if !handled.is_empty() {
            self.source.mark_seen(&handled).await?;
        }

        if summary.fetched > 0 {
            info!(
                fetched = summary.fetched,
                replied = summary.replied,
                filtered = summary.filtered,
                duplicates = summary.duplicates,
                failed = summary.failed,
                "Inbox poll complete"
            );
        }
        Ok(summary)
    }

    /// Poll every `poll_interval` until `shutdown` is triggered.
    ///
    /// A poll in progress always finishes its current message first.
    pub async fn run(&self, shutdown: Shutdown) {
        info!(
            interval_secs = self.config.poll_interval.as_secs(),
            address = %self.config.own_address,
            "Starting inbox processor"
        );

        let mut ticker = tokio::time::interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                () = shutdown.wait() => {
                    info!("Shutdown signal received, stopping inbox processor");
                    return;
                }

                _ = ticker.tick() => {
                    if let Err(e) = self.poll_once(&shutdown).await {
                        warn!(error = %e, "Inbox poll failed");
                    }
                }
            }
        }
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
