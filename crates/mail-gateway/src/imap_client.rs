use async_imap::Session;
use async_native_tls::{TlsConnector, TlsStream};
use async_std::net::TcpStream;
use futures::TryStreamExt;
use mail_parser::MessageParser;
use tracing::{debug, info, instrument, warn};

use crate::config::{ImapTls, MailConfig};
use crate::{InboxMessage, MailError, Result};

type ImapSession = Session<TlsStream<TcpStream>>;

/// Low-level IMAP client.
///
/// Holds one authenticated session. Messages are fetched with `BODY.PEEK[]`
/// so reading never sets `\Seen`; callers flag messages explicitly with
/// [`ImapClient::mark_seen`] once they are done with them.
pub struct ImapClient {
    session: ImapSession,
}

impl ImapClient {
    /// Connect and authenticate, using implicit TLS or STARTTLS per config.
    #[instrument(skip(config), fields(host = %config.imap_host, port = config.imap_port))]
    pub async fn connect(config: &MailConfig) -> Result<Self> {
        let addr = format!("{}:{}", config.imap_host, config.imap_port);
        debug!("Connecting to IMAP server at {}", addr);

        let stream = TcpStream::connect(&addr)
            .await
            .map_err(|e| MailError::ImapConnection(format!("Failed to connect: {}", e)))?;

        let tls = TlsConnector::new()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .danger_accept_invalid_hostnames(config.accept_invalid_certs);

        let client = match config.imap_tls {
            ImapTls::Implicit => {
                let tls_stream = tls
                    .connect(&config.imap_host, stream)
                    .await
                    .map_err(|e| MailError::Tls(format!("TLS handshake failed: {}", e)))?;

                let mut client = async_imap::Client::new(tls_stream);
                client
                    .read_response()
                    .await
                    .ok_or_else(|| MailError::Imap("No greeting from server".to_string()))?
                    .map_err(|e| MailError::Imap(format!("IO error reading greeting: {}", e)))?;
                client
            }
            ImapTls::StartTls => {
                let mut client = async_imap::Client::new(stream);
                client
                    .read_response()
                    .await
                    .ok_or_else(|| MailError::Imap("No greeting from server".to_string()))?
                    .map_err(|e| MailError::Imap(format!("IO error reading greeting: {}", e)))?;

                debug!("Received server greeting, initiating STARTTLS");
                client
                    .run_command_and_check_ok("STARTTLS", None)
                    .await
                    .map_err(|e| MailError::Tls(format!("STARTTLS command failed: {}", e)))?;

                let tls_stream = tls
                    .connect(&config.imap_host, client.into_inner())
                    .await
                    .map_err(|e| MailError::Tls(format!("TLS upgrade failed: {}", e)))?;

                // No second greeting after STARTTLS
                async_imap::Client::new(tls_stream)
            }
        };

        let session = client
            .login(&config.address, config.password())
            .await
            .map_err(|(e, _)| MailError::ImapAuth(format!("Login failed: {}", e)))?;

        info!(tls = ?config.imap_tls, "Connected to IMAP server");
        Ok(Self { session })
    }

    /// Select a folder and return message count.
    #[instrument(skip(self))]
    pub async fn select_folder(&mut self, folder: &str) -> Result<u32> {
        let mailbox = self
            .session
            .select(folder)
            .await
            .map_err(|e| MailError::Imap(format!("Failed to select folder '{}': {}", folder, e)))?;

        debug!("Selected folder '{}' with {} messages", folder, mailbox.exists);
        Ok(mailbox.exists)
    }

    /// UIDs of unseen messages in the selected folder, ascending.
    #[instrument(skip(self))]
    pub async fn search_unseen(&mut self) -> Result<Vec<u32>> {
        let uids = self
            .session
            .uid_search("UNSEEN")
            .await
            .map_err(|e| MailError::Imap(format!("Search failed: {}", e)))?;

        let mut result: Vec<u32> = uids.into_iter().collect();
        result.sort_unstable();
        debug!("Search found {} unseen messages", result.len());
        Ok(result)
    }

    /// Fetch messages by UID without setting `\Seen`.
    ///
    /// Messages that fail to parse are logged and left out.
    #[instrument(skip(self, uids), fields(count = uids.len()))]
    pub async fn fetch_messages(&mut self, uids: &[u32]) -> Result<Vec<InboxMessage>> {
        if uids.is_empty() {
            return Ok(Vec::new());
        }

        let messages: Vec<_> = self
            .session
            .uid_fetch(uid_set(uids), "(UID BODY.PEEK[])")
            .await
            .map_err(|e| MailError::Imap(format!("Failed to fetch messages: {}", e)))?
            .try_collect()
            .await
            .map_err(|e| MailError::Imap(format!("Failed to collect messages: {}", e)))?;

        let mut result = Vec::with_capacity(messages.len());
        for fetch in messages.iter() {
            if let (Some(uid), Some(body)) = (fetch.uid, fetch.body()) {
                match parse_message(uid, body) {
                    Ok(msg) => result.push(msg),
                    Err(e) => warn!(uid, error = %e, "Failed to parse message"),
                }
            }
        }
        result.sort_by_key(|m| m.uid);

        debug!("Fetched {} messages", result.len());
        Ok(result)
    }

    /// Set `\Seen` on the given UIDs in one STORE.
    #[instrument(skip(self, uids), fields(count = uids.len()))]
    pub async fn mark_seen(&mut self, uids: &[u32]) -> Result<()> {
        if uids.is_empty() {
            return Ok(());
        }

        let _: Vec<_> = self
            .session
            .uid_store(uid_set(uids), "+FLAGS (\\Seen)")
            .await
            .map_err(|e| MailError::Imap(format!("Failed to mark seen: {}", e)))?
            .try_collect()
            .await
            .map_err(|e| MailError::Imap(format!("Failed to collect store response: {}", e)))?;
        Ok(())
    }

    /// Logout and close connection.
    pub async fn logout(mut self) -> Result<()> {
        self.session
            .logout()
            .await
            .map_err(|e| MailError::Imap(format!("Logout failed: {}", e)))?;
        Ok(())
    }
}

fn uid_set(uids: &[u32]) -> String {
    uids.iter().map(|u| u.to_string()).collect::<Vec<_>>().join(",")
}

/// Parse raw RFC 5322 bytes into an [`InboxMessage`].
pub fn parse_message(uid: u32, raw: &[u8]) -> Result<InboxMessage> {
    let parsed = MessageParser::default()
        .parse(raw)
        .ok_or_else(|| MailError::ParseMessage("Failed to parse message".to_string()))?;

    let sender = parsed.from().and_then(|f| f.first());
    let from = sender.and_then(|a| a.address()).map(|s| s.to_lowercase());
    let from_name = sender.and_then(|a| a.name()).map(|s| s.to_string());

    let header = |name: &'static str| parsed.header_raw(name).map(|v| v.trim().to_string());

    let content_type = header("Content-Type").map(|ct| {
        ct.split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase()
    });

    Ok(InboxMessage {
        uid,
        message_id: parsed.message_id().map(|s| s.to_string()),
        from,
        from_name,
        subject: parsed.subject().unwrap_or_default().to_string(),
        raw_subject: header("Subject"),
        body: parsed.body_text(0).map(|s| s.to_string()),
        html_body: parsed.body_html(0).map(|s| s.to_string()),
        date: parsed.date().map(|d| d.to_rfc822()),
        auto_submitted: header("Auto-Submitted"),
        precedence: header("Precedence"),
        content_type,
    })
}
