//! In-memory mailbox and sender for tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::gateway::{MailSender, MailSource};
use crate::{Email, InboxMessage, MailError, Result};

/// Mailbox holding messages in memory.
///
/// Behaves like an IMAP folder polled for UNSEEN: a message keeps showing up
/// in `fetch_unseen` until its UID is marked seen.
#[derive(Debug, Default)]
pub struct InMemoryMailbox {
    messages: Mutex<Vec<InboxMessage>>,
    seen: Mutex<HashSet<u32>>,
}

impl InMemoryMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a message.
    pub fn deliver(&self, message: InboxMessage) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message);
        }
    }

    /// Clear `\Seen` on a UID, as happens when a crash interrupts a poll.
    pub fn mark_unseen(&self, uid: u32) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.remove(&uid);
        }
    }

    pub fn is_seen(&self, uid: u32) -> bool {
        self.seen.lock().map(|s| s.contains(&uid)).unwrap_or(false)
    }
}

#[async_trait]
impl MailSource for InMemoryMailbox {
    async fn fetch_unseen(&self) -> Result<Vec<InboxMessage>> {
        let messages = self
            .messages
            .lock()
            .map_err(|_| MailError::Imap("mailbox lock poisoned".to_string()))?;
        let seen = self
            .seen
            .lock()
            .map_err(|_| MailError::Imap("mailbox lock poisoned".to_string()))?;

        let mut unseen: Vec<_> = messages
            .iter()
            .filter(|m| !seen.contains(&m.uid))
            .cloned()
            .collect();
        unseen.sort_by_key(|m| m.uid);
        Ok(unseen)
    }

    async fn mark_seen(&self, uids: &[u32]) -> Result<()> {
        let mut seen = self
            .seen
            .lock()
            .map_err(|_| MailError::Imap("mailbox lock poisoned".to_string()))?;
        seen.extend(uids.iter().copied());
        Ok(())
    }
}

/// Sender that keeps every email it is asked to send.
#[derive(Debug, Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<Email>>,
    fail_for: Mutex<HashSet<String>>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sends to `address` fail.
    pub fn fail_for(&self, address: &str) {
        if let Ok(mut fail) = self.fail_for.lock() {
            fail.insert(address.to_lowercase());
        }
    }

    /// Everything sent so far, in order.
    pub fn sent(&self) -> Vec<Email> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Emails sent to `address`.
    pub fn sent_to(&self, address: &str) -> Vec<Email> {
        self.sent()
            .into_iter()
            .filter(|e| e.to.eq_ignore_ascii_case(address))
            .collect()
    }
}

#[async_trait]
impl MailSender for RecordingSender {
    async fn send(&self, email: &Email) -> Result<()> {
        let failing = self
            .fail_for
            .lock()
            .map(|f| f.contains(&email.to.to_lowercase()))
            .unwrap_or(false);
        if failing {
            return Err(MailError::Send(format!("rejected recipient {}", email.to)));
        }

        self.sent
            .lock()
            .map_err(|_| MailError::Send("sender lock poisoned".to_string()))?
            .push(email.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unseen_until_marked() {
        let mailbox = InMemoryMailbox::new();
        mailbox.deliver(InboxMessage::new(2, "b@example.com", "", "Lima"));
        mailbox.deliver(InboxMessage::new(1, "a@example.com", "", "Prague"));

        let unseen = mailbox.fetch_unseen().await.unwrap();
        assert_eq!(unseen.iter().map(|m| m.uid).collect::<Vec<_>>(), vec![1, 2]);

        mailbox.mark_seen(&[1]).await.unwrap();
        assert_eq!(mailbox.fetch_unseen().await.unwrap().len(), 1);

        mailbox.mark_unseen(1);
        assert_eq!(mailbox.fetch_unseen().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_recording_sender_failures() {
        let sender = RecordingSender::new();
        sender.fail_for("bad@example.com");

        assert!(sender.send(&Email::new("bad@example.com", "s", "b")).await.is_err());
        sender.send(&Email::new("ok@example.com", "s", "b")).await.unwrap();

        assert_eq!(sender.sent().len(), 1);
        assert_eq!(sender.sent_to("OK@example.com").len(), 1);
    }
}
