use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{info, instrument};

use crate::config::{MailConfig, SmtpTls};
use crate::{Email, MailError, Result};

/// Client for sending emails over SMTP.
///
/// Uses connection pooling for efficient batch sending.
pub struct SmtpClient {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpClient {
    /// Create a new client with the given configuration.
    pub fn new(config: &MailConfig) -> Result<Self> {
        let creds = Credentials::new(config.address.clone(), config.password().to_string());

        let tls = match config.smtp_tls {
            SmtpTls::None => Tls::None,
            mode => {
                let params = TlsParameters::builder(config.smtp_host.clone())
                    .dangerous_accept_invalid_certs(config.accept_invalid_certs)
                    .build()
                    .map_err(|e| MailError::Tls(e.to_string()))?;
                if mode == SmtpTls::Implicit {
                    Tls::Wrapper(params)
                } else {
                    Tls::Required(params)
                }
            }
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
            .port(config.smtp_port)
            .tls(tls)
            .credentials(creds)
            .timeout(Some(config.timeout))
            .build();

        let from = config
            .address
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("From '{}': {}", config.address, e)))?;

        info!(
            host = %config.smtp_host,
            port = config.smtp_port,
            tls = ?config.smtp_tls,
            "Created SMTP client"
        );

        Ok(Self { transport, from })
    }

    /// Send an email.
    #[instrument(skip(self, email), fields(to = %email.to, subject = %email.subject))]
    pub async fn send(&self, email: &Email) -> Result<()> {
        let message = build_message(&self.from, email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Send(e.to_string()))?;

        info!(to = %email.to, "Email sent successfully");
        Ok(())
    }
}

/// Build a plain-text lettre Message, threading it when it is a reply.
fn build_message(from: &Mailbox, email: &Email) -> Result<Message> {
    let to: Mailbox = email
        .to
        .parse()
        .map_err(|e| MailError::InvalidAddress(format!("To '{}': {}", email.to, e)))?;

    let mut builder = Message::builder()
        .from(from.clone())
        .to(to)
        .subject(&email.subject)
        .header(ContentType::TEXT_PLAIN);

    if let Some(id) = &email.in_reply_to {
        let id = angle_bracketed(id);
        builder = builder.in_reply_to(id.clone()).references(id);
    }

    builder
        .body(email.body.clone())
        .map_err(|e| MailError::BuildEmail(e.to_string()))
}

fn angle_bracketed(id: &str) -> String {
    let id = id.trim();
    if id.starts_with('<') {
        id.to_string()
    } else {
        format!("<{}>", id)
    }
}
