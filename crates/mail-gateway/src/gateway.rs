//! Transport-neutral mail traits and their IMAP/SMTP implementations.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::client::SmtpClient;
use crate::config::MailConfig;
use crate::imap_client::ImapClient;
use crate::{Email, InboxMessage, MailError, Result};

/// Source of inbound command mail.
#[async_trait]
pub trait MailSource: Send + Sync {
    /// Fetch unseen messages without marking them seen, ascending by UID.
    async fn fetch_unseen(&self) -> Result<Vec<InboxMessage>>;

    /// Flag the given UIDs as seen.
    async fn mark_seen(&self, uids: &[u32]) -> Result<()>;
}

/// Outbound mail transport.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, email: &Email) -> Result<()>;
}

async fn with_timeout<T, F>(limit: Duration, what: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| MailError::Timeout(format!("{} after {}s", what, limit.as_secs())))?
}

/// IMAP mailbox that opens a fresh session for every call.
///
/// Polls are a minute or more apart, so holding a session open between
/// them only invites idle disconnects.
pub struct ImapMailbox {
    config: MailConfig,
}

impl ImapMailbox {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    async fn session(&self) -> Result<ImapClient> {
        let mut client = with_timeout(self.config.timeout, "IMAP connect", ImapClient::connect(&self.config)).await?;
        with_timeout(self.config.timeout, "IMAP select", client.select_folder(&self.config.imap_folder)).await?;
        Ok(client)
    }

    async fn close(&self, client: ImapClient) {
        if let Err(e) = with_timeout(self.config.timeout, "IMAP logout", client.logout()).await {
            warn!(error = %e, "IMAP logout failed");
        }
    }
}

#[async_trait]
impl MailSource for ImapMailbox {
    async fn fetch_unseen(&self) -> Result<Vec<InboxMessage>> {
        let mut client = self.session().await?;
        let timeout = self.config.timeout;

        let fetched = async {
            let uids = with_timeout(timeout, "IMAP search", client.search_unseen()).await?;
            with_timeout(timeout, "IMAP fetch", client.fetch_messages(&uids)).await
        }
        .await;

        self.close(client).await;
        let messages = fetched?;
        info!(count = messages.len(), folder = %self.config.imap_folder, "Fetched unseen messages");
        Ok(messages)
    }

    async fn mark_seen(&self, uids: &[u32]) -> Result<()> {
        if uids.is_empty() {
            return Ok(());
        }

        let mut client = self.session().await?;
        let result = with_timeout(self.config.timeout, "IMAP store", client.mark_seen(uids)).await;
        self.close(client).await;
        result
    }
}

#[async_trait]
impl MailSender for SmtpClient {
    async fn send(&self, email: &Email) -> Result<()> {
        SmtpClient::send(self, email).await
    }
}

/// Sender that only logs. Used for dry runs.
#[derive(Debug, Clone, Default)]
pub struct LoggingSender;

#[async_trait]
impl MailSender for LoggingSender {
    async fn send(&self, email: &Email) -> Result<()> {
        info!(
            to = %email.to,
            subject = %email.subject,
            in_reply_to = ?email.in_reply_to,
            "[dry-run] Would send email:\n{}",
            email.body
        );
        Ok(())
    }
}
