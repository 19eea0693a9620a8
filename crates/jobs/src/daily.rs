//! Daily digest delivery.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use database::{countdown, inbox_log, weather_subscription, Database, DigestCandidate};
use digest::{compose_brief, BriefInput, Language, MessageCatalog, Namedays, Personality};
use mail_gateway::{Email, MailSender};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};
use weather_gateway::WeatherProvider;

use crate::error::Result;
use crate::shutdown::Shutdown;

/// Configuration for the digest runner.
#[derive(Debug, Clone)]
pub struct DigestConfig {
    /// Local hour (0-23) at which each subscriber gets their digest.
    pub hour: u32,

    /// How often [`DigestRunner::run`] checks for due subscribers.
    pub check_interval: Duration,

    /// Ledger entries older than this many days are pruned each pass.
    pub ledger_retention_days: u32,

    /// Timezone for users whose stored timezone does not parse.
    pub default_timezone: String,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            hour: 5,
            check_interval: Duration::from_secs(300),
            ledger_retention_days: 90,
            default_timezone: "Europe/Bratislava".to_string(),
        }
    }
}

/// Counters for one digest pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DigestSummary {
    pub candidates: usize,
    pub sent: usize,
    /// Not due yet, or already sent today.
    pub not_due: usize,
    /// Forecast or send failed; retried on the next pass.
    pub failed: usize,
    pub pruned: u64,
}

/// Sends the daily brief to each subscriber at their local digest hour.
pub struct DigestRunner<W> {
    db: Database,
    weather: Arc<W>,
    sender: Arc<dyn MailSender>,
    catalog: Arc<MessageCatalog>,
    namedays: Arc<Namedays>,
    config: DigestConfig,
}

impl<W: WeatherProvider> DigestRunner<W> {
    pub fn new(
        db: Database,
        weather: Arc<W>,
        sender: Arc<dyn MailSender>,
        catalog: Arc<MessageCatalog>,
        config: DigestConfig,
    ) -> Self {
        Self {
            db,
            weather,
            sender,
            catalog,
            namedays: Arc::new(Namedays::default()),
            config,
        }
    }

    pub fn with_namedays(mut self, namedays: Arc<Namedays>) -> Self {
        self.namedays = namedays;
        self
    }

    fn timezone(&self, name: &str) -> Tz {
        name.parse::<Tz>()
            .or_else(|_| self.config.default_timezone.parse::<Tz>())
            .unwrap_or(Tz::UTC)
    }

    /// One pass over all candidates at the current time.
    pub async fn run_pass(&self, force: bool, shutdown: &Shutdown) -> Result<DigestSummary> {
        self.run_pass_at(Utc::now(), force, shutdown).await
    }

    /// One pass over all candidates as of `now`.
    ///
    /// With `force`, every candidate is sent regardless of hour and of
    /// whether today's digest already went out.
    pub async fn run_pass_at(&self, now: DateTime<Utc>, force: bool, shutdown: &Shutdown) -> Result<DigestSummary> {
        let candidates = weather_subscription::list_digest_candidates(self.db.pool()).await?;
        let mut summary = DigestSummary {
            candidates: candidates.len(),
            ..Default::default()
        };

        for candidate in &candidates {
            if shutdown.is_triggered() {
                info!("Shutdown requested, stopping digest pass");
                break;
            }

            let local = now.with_timezone(&self.timezone(&candidate.timezone));
            let today = local.date_naive();
            let due = local.hour() == self.config.hour && candidate.last_sent_date != Some(today);
            if !force && !due {
                summary.not_due += 1;
                continue;
            }

            match self.deliver(candidate, today).await {
                Ok(true) => summary.sent += 1,
                Ok(false) => summary.failed += 1,
                Err(e) => {
                    error!(email = %candidate.email, error = %e, "Digest failed");
                    summary.failed += 1;
                }
            }
        }

        match inbox_log::prune_older_than(self.db.pool(), self.config.ledger_retention_days).await {
            Ok(pruned) => summary.pruned = pruned,
            Err(e) => warn!(error = %e, "Ledger pruning failed"),
        }

        if summary.sent > 0 || summary.failed > 0 {
            info!(
                candidates = summary.candidates,
                sent = summary.sent,
                failed = summary.failed,
                pruned = summary.pruned,
                "Digest pass complete"
            );
        }
        Ok(summary)
    }

    /// Compose and send one digest. `Ok(false)` means skipped after a
    /// forecast or send failure, already logged.
    #[instrument(skip(self, candidate), fields(email = %candidate.email))]
    async fn deliver(&self, candidate: &DigestCandidate, today: chrono::NaiveDate) -> Result<bool> {
        let language = Language::from_code_or_default(&candidate.language);
        let personality = Personality::from_code_or_default(&candidate.personality);

        let forecast = match self
            .weather
            .forecast(candidate.latitude, candidate.longitude, &candidate.timezone)
            .await
        {
            Ok(forecast) => forecast,
            Err(e) => {
                warn!(error = %e, transient = e.is_transient(), "Forecast unavailable, skipping subscriber");
                return Ok(false);
            }
        };

        let countdowns = if candidate.countdown_enabled {
            countdown::get_user_countdowns(self.db.pool(), &candidate.email).await?
        } else {
            Vec::new()
        };

        let brief = compose_brief(
            &self.catalog,
            &BriefInput {
                location: &candidate.location,
                forecast: forecast.today(),
                countdowns: &countdowns,
                nameday: self.namedays.message_for(language, today),
                personality,
                language,
                today,
            },
        );

        let email = Email::new(candidate.email.clone(), brief.subject, brief.body);
        if let Err(e) = self.sender.send(&email).await {
            warn!(error = %e, "Failed to send digest");
            return Ok(false);
        }

        if !weather_subscription::mark_digest_sent(self.db.pool(), &candidate.email, today).await? {
            debug!(%today, "Digest date already recorded");
        }
        info!(%today, location = %candidate.location, "Digest sent");
        Ok(true)
    }

    /// Check for due subscribers every `check_interval` until `shutdown`.
    pub async fn run(&self, shutdown: Shutdown) {
        info!(
            hour = self.config.hour,
            interval_secs = self.config.check_interval.as_secs(),
            "Starting digest runner"
        );

        let mut ticker = tokio::time::interval(self.config.check_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                () = shutdown.wait() => {
                    info!("Shutdown signal received, stopping digest runner");
                    return;
                }

                _ = ticker.tick() => {
                    if let Err(e) = self.run_pass(false, &shutdown).await {
                        warn!(error = %e, "Digest pass failed");
                    }
                }
            }
        }
    }
}
