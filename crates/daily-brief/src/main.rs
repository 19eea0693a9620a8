//! Daily Brief service.
//!
//! Answers command mail (subscribe, settings, countdowns, unsubscribe) and
//! sends every subscriber a weather digest at their local morning hour.

mod config;

use std::path::Path;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use database::{weather_subscription, Database};
use digest::{MessageCatalog, Namedays};
use dispatcher::{Dispatcher, DispatcherConfig};
use jobs::{DigestConfig, DigestRunner, InboxConfig, InboxProcessor, Shutdown};
use mail_gateway::{ImapMailbox, LoggingSender, MailConfig, MailSender, SmtpClient};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use weather_gateway::{OpenMeteo, WeatherConfig};

use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "daily-brief")]
#[command(about = "Email-driven daily weather digest and countdown service")]
struct Args {
    /// Log replies and digests instead of sending them
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Poll the inbox and send digests until stopped (default)
    Run,
    /// Process unseen mail once and exit
    CheckInbox,
    /// Run one digest pass and exit
    SendDigests {
        /// Send to every subscriber now, ignoring hour and last sent date
        #[arg(long)]
        force: bool,
    },
    /// Print active weather subscribers
    ListSubscribers,
}

/// Components wired from configuration.
struct Services {
    inbox: InboxProcessor<OpenMeteo>,
    digests: DigestRunner<OpenMeteo>,
}

impl Services {
    fn build(config: &AppConfig, db: &Database) -> Result<Self, Box<dyn std::error::Error>> {
        let mail = MailConfig::from_env()?;
        let weather = Arc::new(OpenMeteo::new(WeatherConfig::from_env()?)?);

        let catalog = Arc::new(match &config.messages_dir {
            Some(dir) => MessageCatalog::with_overrides(dir)?,
            None => MessageCatalog::builtin(),
        });
        let namedays = Arc::new(match &config.namedays_dir {
            Some(dir) => Namedays::load_dir(dir)?,
            None => Namedays::default(),
        });

        let sender: Arc<dyn MailSender> = if config.dry_run {
            info!("Dry run: replies and digests are logged, not sent");
            Arc::new(LoggingSender)
        } else {
            Arc::new(SmtpClient::new(&mail)?)
        };

        let dispatcher = Arc::new(Dispatcher::new(
            db.clone(),
            weather.clone(),
            catalog.clone(),
            DispatcherConfig::new(config.default_timezone.clone()),
        ));

        let inbox = InboxProcessor::new(
            Arc::new(ImapMailbox::new(mail.clone())),
            sender.clone(),
            dispatcher,
            InboxConfig::new(mail.address.clone()).with_poll_interval(config.poll_interval),
        );

        let digests = DigestRunner::new(
            db.clone(),
            weather,
            sender,
            catalog,
            DigestConfig {
                hour: config.digest_hour,
                check_interval: config.digest_check_interval,
                ledger_retention_days: config.ledger_retention_days,
                default_timezone: config.default_timezone.clone(),
            },
        )
        .with_namedays(namedays);

        Ok(Self { inbox, digests })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = AppConfig::from_env()?;
    config.dry_run |= args.dry_run;

    ensure_parent_dir(&config.database_url)?;
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    match args.command.unwrap_or(Command::Run) {
        Command::Run => {
            let services = Services::build(&config, &db)?;
            let shutdown = Shutdown::new();
            tokio::spawn(trigger_on_signal(shutdown.clone()));

            info!("Daily Brief running");
            tokio::join!(
                services.inbox.run(shutdown.clone()),
                services.digests.run(shutdown.clone()),
            );
            info!("Daily Brief stopped");
        }
        Command::CheckInbox => {
            let services = Services::build(&config, &db)?;
            let summary = services.inbox.poll_once(&Shutdown::new()).await?;
            println!(
                "fetched {} replied {} filtered {} duplicates {} failed {}",
                summary.fetched, summary.replied, summary.filtered, summary.duplicates, summary.failed
            );
        }
        Command::SendDigests { force } => {
            let services = Services::build(&config, &db)?;
            let summary = services.digests.run_pass(force, &Shutdown::new()).await?;
            println!(
                "candidates {} sent {} not due {} failed {}",
                summary.candidates, summary.sent, summary.not_due, summary.failed
            );
        }
        Command::ListSubscribers => {
            let candidates = weather_subscription::list_digest_candidates(db.pool()).await?;
            for c in &candidates {
                println!(
                    "{}\t{}\t{}\t{}/{}\t{}",
                    c.email,
                    c.location,
                    c.timezone,
                    c.language,
                    c.personality,
                    c.last_sent_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".to_string())
                );
            }
            println!("{} active subscriber(s)", candidates.len());
        }
    }

    db.close().await;
    Ok(())
}

/// Create the directory holding a file-backed SQLite database.
fn ensure_parent_dir(database_url: &str) -> std::io::Result<()> {
    let path = database_url.strip_prefix("sqlite:").unwrap_or(database_url);
    let path = path.split('?').next().unwrap_or(path).trim_start_matches("//");
    if path.is_empty() || path.starts_with(':') {
        return Ok(());
    }
    match Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Trigger `shutdown` on Ctrl+C or SIGTERM.
async fn trigger_on_signal(shutdown: Shutdown) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    info!("Termination signal received, finishing current item");
    shutdown.trigger();
}
