use secrecy::{ExposeSecret, SecretString};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::MailError;

/// How the IMAP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImapTls {
    /// TLS from the first byte (port 993).
    Implicit,
    /// Plain connection upgraded with STARTTLS (port 143).
    StartTls,
}

impl FromStr for ImapTls {
    type Err = MailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "implicit" | "ssl" | "tls" => Ok(ImapTls::Implicit),
            "starttls" => Ok(ImapTls::StartTls),
            other => Err(MailError::Config(format!("Invalid IMAP_TLS: {}", other))),
        }
    }
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpTls {
    /// STARTTLS upgrade, required (port 587).
    StartTls,
    /// TLS from the first byte (port 465).
    Implicit,
    /// No TLS. Only for local test servers.
    None,
}

impl FromStr for SmtpTls {
    type Err = MailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "starttls" | "true" | "1" | "yes" => Ok(SmtpTls::StartTls),
            "implicit" | "ssl" | "tls" => Ok(SmtpTls::Implicit),
            "none" | "false" | "0" | "no" => Ok(SmtpTls::None),
            other => Err(MailError::Config(format!("Invalid SMTP_TLS: {}", other))),
        }
    }
}

/// Configuration for the IMAP and SMTP connections.
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Mailbox address, used as login and as the From address
    pub address: String,
    /// IMAP host
    pub imap_host: String,
    /// IMAP port (default: 993)
    pub imap_port: u16,
    /// IMAP security (default: implicit)
    pub imap_tls: ImapTls,
    /// Folder polled for commands (default: INBOX)
    pub imap_folder: String,
    /// SMTP host
    pub smtp_host: String,
    /// SMTP port (default: 587)
    pub smtp_port: u16,
    /// SMTP security (default: starttls)
    pub smtp_tls: SmtpTls,
    /// Timeout for each network operation (default: 30s)
    pub timeout: Duration,
    /// Accept self-signed certificates (default: false)
    pub accept_invalid_certs: bool,
    /// Account password
    password: SecretString,
}

fn parse_env<T: FromStr>(name: &str, default: &str) -> Result<T, MailError>
where
    T::Err: std::fmt::Display,
{
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse::<T>()
        .map_err(|e| MailError::Config(format!("Invalid {}: {}", name, e)))
}

impl MailConfig {
    /// Create a new configuration with explicit values and defaults for the rest.
    pub fn new(
        address: impl Into<String>,
        password: impl Into<String>,
        imap_host: impl Into<String>,
        smtp_host: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            imap_host: imap_host.into(),
            imap_port: 993,
            imap_tls: ImapTls::Implicit,
            imap_folder: "INBOX".to_string(),
            smtp_host: smtp_host.into(),
            smtp_port: 587,
            smtp_tls: SmtpTls::StartTls,
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
            password: SecretString::from(password.into()),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Required:
    /// - `EMAIL_ADDRESS` - Mailbox address
    /// - `EMAIL_PASSWORD` - Account or app password
    /// - `IMAP_HOST`
    /// - `SMTP_HOST`
    ///
    /// Optional (with defaults):
    /// - `IMAP_PORT` - Default: 993
    /// - `IMAP_TLS` - `implicit` or `starttls`. Default: implicit
    /// - `IMAP_FOLDER` - Default: INBOX
    /// - `SMTP_PORT` - Default: 587
    /// - `SMTP_TLS` - `starttls`, `implicit` or `none`. `SMTP_USE_TLS` is
    ///   read as a fallback. Default: starttls
    /// - `MAIL_TIMEOUT_SECS` - Default: 30
    /// - `MAIL_ACCEPT_INVALID_CERTS` - Default: false
    pub fn from_env() -> Result<Self, MailError> {
        let require = |name: &str| env::var(name).map_err(|_| MailError::MissingEnvVar(name.to_string()));

        let address = require("EMAIL_ADDRESS")?;
        let password = require("EMAIL_PASSWORD")?;
        let imap_host = require("IMAP_HOST")?;
        let smtp_host = require("SMTP_HOST")?;

        let smtp_tls = match env::var("SMTP_TLS").or_else(|_| env::var("SMTP_USE_TLS")) {
            Ok(raw) => raw.parse()?,
            Err(_) => SmtpTls::StartTls,
        };

        Ok(Self {
            address,
            imap_host,
            imap_port: parse_env("IMAP_PORT", "993")?,
            imap_tls: parse_env::<ImapTls>("IMAP_TLS", "implicit")?,
            imap_folder: env::var("IMAP_FOLDER").unwrap_or_else(|_| "INBOX".to_string()),
            smtp_host,
            smtp_port: parse_env("SMTP_PORT", "587")?,
            smtp_tls,
            timeout: Duration::from_secs(parse_env("MAIL_TIMEOUT_SECS", "30")?),
            accept_invalid_certs: parse_env("MAIL_ACCEPT_INVALID_CERTS", "false")?,
            password: SecretString::from(password),
        })
    }

    /// Get the password (exposes the secret).
    pub(crate) fn password(&self) -> &str {
        self.password.expose_secret()
    }

    /// Builder method to set IMAP port and security.
    pub fn with_imap(mut self, port: u16, tls: ImapTls) -> Self {
        self.imap_port = port;
        self.imap_tls = tls;
        self
    }

    /// Builder method to set SMTP port and security.
    pub fn with_smtp(mut self, port: u16, tls: SmtpTls) -> Self {
        self.smtp_port = port;
        self.smtp_tls = tls;
        self
    }

    /// Builder method to set the polled folder.
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.imap_folder = folder.into();
        self
    }

    /// Builder method to set the network timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder method to accept self-signed certificates.
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tls_modes_parse() {
        assert_eq!("STARTTLS".parse::<ImapTls>().unwrap(), ImapTls::StartTls);
        assert_eq!("implicit".parse::<ImapTls>().unwrap(), ImapTls::Implicit);
        assert!("maybe".parse::<ImapTls>().is_err());

        // SMTP_USE_TLS=true from older deployments means STARTTLS.
        assert_eq!("true".parse::<SmtpTls>().unwrap(), SmtpTls::StartTls);
        assert_eq!("none".parse::<SmtpTls>().unwrap(), SmtpTls::None);
    }

    #[test]
    fn test_new_defaults() {
        let config = MailConfig::new("bot@example.com", "hunter2", "imap.example.com", "smtp.example.com")
            .with_imap(143, ImapTls::StartTls);
        assert_eq!(config.imap_port, 143);
        assert_eq!(config.smtp_port, 587);
        assert_eq!(config.imap_folder, "INBOX");
        assert_eq!(config.password(), "hunter2");
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
