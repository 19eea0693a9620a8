//! Applies commands to the store and decides the reply.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use database::validation::{normalize_email, validate_countdown_name, validate_template};
use database::{countdown, user, weather_subscription};
use database::{CountdownUpsert, Database, DatabaseError, SubscriptionUpsert};
use digest::{compose, render_countdown, Language, MessageCatalog, Personality};
use tracing::{info, instrument, warn};
use weather_gateway::{GeoLocation, WeatherError, WeatherProvider};

use crate::command::Command;
use crate::error::Result;
use crate::replies::{strings, Reply};

/// Geocoding candidates fetched per lookup.
const GEOCODE_CANDIDATES: usize = 5;

/// Catalog key used for sample messages in settings replies.
const SAMPLE_KEY: &str = "default";

/// Settings the dispatcher needs from the process configuration.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Timezone for users whose location did not resolve to one.
    pub default_timezone: String,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            default_timezone: "Europe/Bratislava".to_string(),
        }
    }
}

impl DispatcherConfig {
    pub fn new(default_timezone: impl Into<String>) -> Self {
        Self {
            default_timezone: default_timezone.into(),
        }
    }
}

/// The single writer of subscription state.
///
/// Email commands and any other front end go through [`Dispatcher::apply`],
/// so the same invariants hold whichever way a change arrives. Each command
/// runs in one transaction; nothing is written when a lookup fails.
pub struct Dispatcher<W> {
    db: Database,
    weather: Arc<W>,
    catalog: Arc<MessageCatalog>,
    config: DispatcherConfig,
}

impl<W: WeatherProvider> Dispatcher<W> {
    pub fn new(db: Database, weather: Arc<W>, catalog: Arc<MessageCatalog>, config: DispatcherConfig) -> Self {
        Self {
            db,
            weather,
            catalog,
            config,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Apply `command` on behalf of `sender` and return the reply to send.
    pub async fn apply(&self, sender: &str, command: Command) -> Result<Reply> {
        self.apply_at(sender, command, Utc::now()).await
    }

    /// [`Dispatcher::apply`] with an explicit clock.
    #[instrument(skip(self, command, now), fields(command = %command.description()))]
    pub async fn apply_at(&self, sender: &str, command: Command, now: DateTime<Utc>) -> Result<Reply> {
        let email = normalize_email(sender);

        match command {
            Command::Subscribe {
                location,
                personality,
                language,
            } => self.subscribe(&email, &location, personality, language).await,
            Command::Unsubscribe => self.unsubscribe(&email).await,
            Command::SetPersonality { mode } => self.update_settings(&email, None, Some(mode)).await,
            Command::SetLanguage { lang } => self.update_settings(&email, Some(lang), None).await,
            Command::UpdatePreferences {
                language,
                personality,
            } => {
                self.update_settings(&email, Some(language), Some(personality))
                    .await
            }
            Command::ScheduleCountdown {
                name,
                date,
                time,
                yearly,
                message_before,
                message_after,
            } => {
                let upsert = CountdownUpsert {
                    email: email.clone(),
                    name,
                    date,
                    time,
                    yearly,
                    message_before,
                    message_after,
                };
                self.schedule_countdown(upsert, now).await
            }
            Command::DeleteAllCountdowns => self.delete_all_countdowns(&email).await,
            Command::Unrecognized { reason } => {
                info!(sender = %email, %reason, "Unrecognized command");
                let language = self.reply_language(&email).await?;
                let strings = strings(language);
                Ok(Reply::new(language, strings.help_subject, strings.help))
            }
        }
    }

    /// Delete one countdown by name. Returns `false` when there was none.
    #[instrument(skip(self))]
    pub async fn delete_countdown(&self, sender: &str, name: &str) -> Result<bool> {
        let email = normalize_email(sender);
        let mut tx = self.db.begin().await?;

        match countdown::delete_countdown(&mut *tx, &email, name).await {
            Ok(()) => {
                tx.commit().await.map_err(DatabaseError::from)?;
                info!(sender = %email, name, "Countdown deleted");
                Ok(true)
            }
            Err(DatabaseError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn subscribe(
        &self,
        email: &str,
        location: &str,
        personality: Option<Personality>,
        language: Option<Language>,
    ) -> Result<Reply> {
        let place = match self.resolve_location(location).await {
            Ok(Some(place)) => place,
            Ok(None) => {
                info!(sender = %email, location, "Location not found");
                let language = self.requested_or_stored(email, language).await?;
                let strings = strings(language);
                return Ok(Reply::new(
                    language,
                    strings.not_found_subject,
                    strings.not_found.replace("{location}", location),
                ));
            }
            Err(e) => {
                warn!(sender = %email, location, error = %e, "Geocoding failed");
                let language = self.requested_or_stored(email, language).await?;
                let strings = strings(language);
                return Ok(Reply::new(language, strings.try_later_subject, strings.try_later));
            }
        };

        let timezone = place
            .timezone
            .clone()
            .filter(|tz| tz.parse::<Tz>().is_ok())
            .unwrap_or_else(|| self.config.default_timezone.clone());
        let place_name = place.display_name();

        let mut tx = self.db.begin().await?;
        let existing = weather_subscription::get_subscription(&mut *tx, email).await?;

        // Omitted settings keep their stored values.
        let personality = personality
            .or_else(|| existing.as_ref().map(|s| Personality::from_code_or_default(&s.personality)))
            .unwrap_or_default();
        let language = language
            .or_else(|| existing.as_ref().map(|s| Language::from_code_or_default(&s.language)))
            .unwrap_or_default();

        user::ensure_user(&mut *tx, email, &timezone).await?;
        user::set_timezone(&mut *tx, email, &timezone).await?;
        weather_subscription::upsert_subscription(
            &mut *tx,
            &SubscriptionUpsert {
                email: email.to_string(),
                location: place_name.clone(),
                latitude: place.latitude,
                longitude: place.longitude,
                personality: personality.as_str().to_string(),
                language: language.as_str().to_string(),
            },
        )
        .await?;
        user::set_weather_enabled(&mut *tx, email, true).await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        info!(
            sender = %email,
            location = %place_name,
            %language,
            %personality,
            updated = existing.is_some(),
            "Subscription saved"
        );

        let strings = strings(language);
        let mut body = strings.subscribed.replace("{location}", &place_name);
        body.push_str("\n\n");

        match self
            .weather
            .forecast(place.latitude, place.longitude, &timezone)
            .await
        {
            Ok(forecast) => match forecast.today() {
                Some(day) => {
                    body.push_str(strings.preview_header);
                    body.push_str("\n\n");
                    body.push_str(&compose(&self.catalog, &place_name, day, personality, language));
                }
                None => body.push_str(strings.preview_unavailable),
            },
            Err(e) => {
                warn!(sender = %email, error = %e, "Preview forecast failed");
                body.push_str(strings.preview_unavailable);
            }
        }

        Ok(Reply::new(
            language,
            strings.subscribed_subject.replace("{location}", &place_name),
            body,
        ))
    }

    async fn unsubscribe(&self, email: &str) -> Result<Reply> {
        let mut tx = self.db.begin().await?;
        let language = weather_subscription::get_subscription(&mut *tx, email)
            .await?
            .map(|s| Language::from_code_or_default(&s.language))
            .unwrap_or_default();

        let existed = weather_subscription::delete_subscription(&mut *tx, email).await?;
        user::set_weather_enabled(&mut *tx, email, false).await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        info!(sender = %email, existed, "Unsubscribed");

        let strings = strings(language);
        Ok(Reply::new(language, strings.unsubscribed_subject, strings.unsubscribed))
    }

    async fn update_settings(
        &self,
        email: &str,
        language: Option<Language>,
        personality: Option<Personality>,
    ) -> Result<Reply> {
        let mut tx = self.db.begin().await?;

        let Some(existing) = weather_subscription::get_subscription(&mut *tx, email).await? else {
            let language = language.unwrap_or_default();
            let strings = strings(language);
            info!(sender = %email, "Settings change without subscription");
            return Ok(Reply::new(
                language,
                strings.subscribe_first_subject,
                strings.subscribe_first,
            ));
        };

        if let Some(language) = language {
            weather_subscription::update_language(&mut *tx, email, language.as_str()).await?;
        }
        if let Some(personality) = personality {
            weather_subscription::update_personality(&mut *tx, email, personality.as_str()).await?;
        }
        tx.commit().await.map_err(DatabaseError::from)?;

        let reply_language = language.unwrap_or_else(|| Language::from_code_or_default(&existing.language));
        let mode = personality.unwrap_or_else(|| Personality::from_code_or_default(&existing.personality));
        info!(sender = %email, language = %reply_language, personality = %mode, "Settings updated");

        let strings = strings(reply_language);
        let mut lines = Vec::new();
        if personality.is_some() {
            lines.push(strings.personality_set.replace("{mode}", mode.as_str()));
        }
        if let Some(language) = language {
            lines.push(strings.language_set.replace("{lang}", language.as_str()));
        }
        let language = reply_language;

        let body = format!(
            "{}\n\n{}\n{}",
            lines.join("\n"),
            strings.sample_header,
            self.catalog.lookup(language, SAMPLE_KEY, mode)
        );
        Ok(Reply::new(language, strings.settings_subject, body))
    }

    async fn schedule_countdown(&self, upsert: CountdownUpsert, now: DateTime<Utc>) -> Result<Reply> {
        let email = upsert.email.clone();
        let templates_valid = [&upsert.message_before, &upsert.message_after]
            .into_iter()
            .flatten()
            .all(|template| validate_template(template).is_ok());
        if validate_countdown_name(&upsert.name).is_err() || !templates_valid {
            let language = self.reply_language(&email).await?;
            let strings = strings(language);
            return Ok(Reply::new(language, strings.help_subject, strings.help));
        }

        let mut tx = self.db.begin().await?;
        user::ensure_user(&mut *tx, &email, &self.config.default_timezone).await?;
        countdown::upsert_countdown(&mut *tx, &upsert).await?;
        user::set_countdown_enabled(&mut *tx, &email, true).await?;

        let owner = user::get_user(&mut *tx, &email).await?;
        let saved = countdown::get_user_countdowns(&mut *tx, &email)
            .await?
            .into_iter()
            .find(|event| event.name == upsert.name);
        let language = weather_subscription::get_subscription(&mut *tx, &email)
            .await?
            .map(|s| Language::from_code_or_default(&s.language))
            .unwrap_or_default();
        tx.commit().await.map_err(DatabaseError::from)?;

        info!(sender = %email, name = %upsert.name, date = %upsert.date, yearly = upsert.yearly, "Countdown saved");

        let strings = strings(language);
        let when = match upsert.time {
            Some(time) => format!("{} {}", upsert.date.format("%Y-%m-%d"), time.format("%H:%M")),
            None => upsert.date.format("%Y-%m-%d").to_string(),
        };
        let mut body = strings
            .countdown_saved
            .replace("{name}", &upsert.name)
            .replace("{date}", &when);
        if upsert.yearly {
            body.push(' ');
            body.push_str(strings.countdown_yearly);
        }

        let today = local_today(&owner.timezone, &self.config.default_timezone, now);
        if let Some(line) = saved.and_then(|event| render_countdown(&event, today, language)) {
            body.push_str("\n\n");
            body.push_str(&line);
        }

        Ok(Reply::new(language, strings.countdown_subject, body))
    }

    async fn delete_all_countdowns(&self, email: &str) -> Result<Reply> {
        let mut tx = self.db.begin().await?;
        let removed = countdown::delete_all_countdowns(&mut *tx, email).await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        info!(sender = %email, removed, "Countdowns deleted");

        let language = self.reply_language(email).await?;
        let strings = strings(language);
        Ok(Reply::new(
            language,
            strings.countdowns_cleared_subject,
            strings.countdowns_cleared.replace("{count}", &removed.to_string()),
        ))
    }

    /// Geocode, preferring a result in the country named after a comma.
    async fn resolve_location(&self, query: &str) -> weather_gateway::Result<Option<GeoLocation>> {
        let query = query.trim();
        let mut results = self.search(query).await?;

        if query.contains(',') {
            let head = query.split(',').next().unwrap_or(query).trim();
            let hint = query.rsplit(',').next().unwrap_or_default().trim();

            if results.is_empty() && !head.is_empty() {
                results = self.search(head).await?;
            }
            if let Some(index) = results.iter().position(|place| place.matches_country(hint)) {
                return Ok(Some(results.swap_remove(index)));
            }
        }

        Ok(results.into_iter().next())
    }

    async fn search(&self, query: &str) -> weather_gateway::Result<Vec<GeoLocation>> {
        match self.weather.search(query, GEOCODE_CANDIDATES).await {
            Ok(results) => Ok(results),
            Err(WeatherError::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Language of the sender's subscription, English without one.
    pub async fn reply_language(&self, sender: &str) -> Result<Language> {
        let email = normalize_email(sender);
        Ok(weather_subscription::get_subscription(self.db.pool(), &email)
            .await?
            .map(|s| Language::from_code_or_default(&s.language))
            .unwrap_or_default())
    }

    async fn requested_or_stored(&self, email: &str, requested: Option<Language>) -> Result<Language> {
        match requested {
            Some(language) => Ok(language),
            None => self.reply_language(email).await,
        }
    }
}

/// The current date in `timezone`, falling back to `default` for unknown names.
pub fn local_today(timezone: &str, default: &str, now: DateTime<Utc>) -> NaiveDate {
    let tz = timezone
        .parse::<Tz>()
        .or_else(|_| default.parse::<Tz>())
        .unwrap_or(Tz::UTC);
    now.with_timezone(&tz).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use weather_gateway::mock::{place, single_day};
    use weather_gateway::StaticWeather;

    const ALICE: &str = "alice@example.com";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 6, 0, 0).unwrap()
    }

    fn weather() -> StaticWeather {
        StaticWeather::new()
            .with_place(
                "Bratislava",
                place("Bratislava", "Slovakia", "SK", 48.1486, 17.1077, "Europe/Bratislava"),
            )
            .with_place("Prague", place("Prague", "United States", "US", 41.5, -97.0, "America/Chicago"))
            .with_place("Prague", place("Prague", "Czechia", "CZ", 50.088, 14.4208, "Europe/Prague"))
            .with_forecast(single_day(
                NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                22.4,
                12.0,
                10.0,
                0.0,
                11.0,
            ))
    }

    async fn dispatcher_with(weather: StaticWeather) -> Dispatcher<StaticWeather> {
        let db = Database::in_memory().await.unwrap();
        Dispatcher::new(
            db,
            Arc::new(weather),
            Arc::new(MessageCatalog::builtin()),
            DispatcherConfig::default(),
        )
    }

    async fn dispatcher() -> Dispatcher<StaticWeather> {
        dispatcher_with(weather()).await
    }

    fn subscribe(location: &str, language: Option<Language>, personality: Option<Personality>) -> Command {
        Command::Subscribe {
            location: location.to_string(),
            personality,
            language,
        }
    }

    #[tokio::test]
    async fn test_subscribe_creates_user_and_subscription() {
        let d = dispatcher().await;
        let reply = d
            .apply_at(
                "Alice@Example.com",
                subscribe("Bratislava", Some(Language::Sk), Some(Personality::Cute)),
                now(),
            )
            .await
            .unwrap();

        assert_eq!(reply.subject, "Prihlásené: Bratislava, Slovakia");
        assert!(reply.body.contains("Dnešné počasie pre Bratislava, Slovakia:"));
        assert!(reply.body.contains("Max 22.4°C / Min 12.0°C"));
        assert!(reply.body.contains("Slnečný deň len pre teba! 🌞"));

        let pool = d.database().pool();
        let alice = user::get_user(pool, ALICE).await.unwrap();
        assert!(alice.weather_enabled);
        assert_eq!(alice.timezone, "Europe/Bratislava");

        let sub = weather_subscription::get_subscription(pool, ALICE).await.unwrap().unwrap();
        assert_eq!(sub.language, "sk");
        assert_eq!(sub.personality, "cute");
        assert!((sub.latitude - 48.1486).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_location_only_update_preserves_settings() {
        let d = dispatcher().await;
        d.apply_at(ALICE, subscribe("Prague", Some(Language::Es), Some(Personality::Brutal)), now())
            .await
            .unwrap();
        d.apply_at(ALICE, subscribe("Prague, CZ", None, None), now())
            .await
            .unwrap();

        let sub = weather_subscription::get_subscription(d.database().pool(), ALICE)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sub.language, "es");
        assert_eq!(sub.personality, "brutal");
        assert_eq!(sub.location, "Prague, Czechia");
    }

    #[tokio::test]
    async fn test_country_hint_picks_matching_result() {
        let d = dispatcher().await;
        d.apply_at(ALICE, subscribe("Prague, CZ", None, None), now())
            .await
            .unwrap();

        let sub = weather_subscription::get_subscription(d.database().pool(), ALICE)
            .await
            .unwrap()
            .unwrap();
        assert!((sub.latitude - 50.088).abs() < 1e-9);

        let alice = user::get_user(d.database().pool(), ALICE).await.unwrap();
        assert_eq!(alice.timezone, "Europe/Prague");
    }

    #[tokio::test]
    async fn test_unknown_location_changes_nothing() {
        let d = dispatcher().await;
        let reply = d
            .apply_at(ALICE, subscribe("Atlantis", None, None), now())
            .await
            .unwrap();

        assert_eq!(reply.subject, "Location not found");
        assert!(reply.body.contains("\"Atlantis\""));
        assert!(user::find_user(d.database().pool(), ALICE).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_geocoder_outage_changes_nothing() {
        let d = dispatcher_with(weather().with_failing_search()).await;
        let reply = d
            .apply_at(ALICE, subscribe("Bratislava", None, None), now())
            .await
            .unwrap();

        assert_eq!(reply.subject, "Please try again later");
        assert!(user::find_user(d.database().pool(), ALICE).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_forecast_outage_still_subscribes() {
        let d = dispatcher_with(weather().with_failing_forecast()).await;
        let reply = d
            .apply_at(ALICE, subscribe("Bratislava", None, None), now())
            .await
            .unwrap();

        assert!(reply.body.contains("Today's forecast is not available right now."));
        assert!(weather_subscription::get_subscription(d.database().pool(), ALICE)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_unsubscribe_is_idempotent() {
        let d = dispatcher().await;

        let first = d.apply_at(ALICE, Command::Unsubscribe, now()).await.unwrap();
        assert_eq!(first.subject, "Unsubscribed");
        assert!(user::find_user(d.database().pool(), ALICE).await.unwrap().is_none());

        d.apply_at(ALICE, subscribe("Bratislava", None, None), now())
            .await
            .unwrap();
        d.apply_at(ALICE, Command::Unsubscribe, now()).await.unwrap();
        let again = d.apply_at(ALICE, Command::Unsubscribe, now()).await.unwrap();
        assert_eq!(again, first);

        let alice = user::get_user(d.database().pool(), ALICE).await.unwrap();
        assert!(!alice.weather_enabled);
        assert!(weather_subscription::get_subscription(d.database().pool(), ALICE)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_settings_require_subscription() {
        let d = dispatcher().await;
        let reply = d
            .apply_at(ALICE, Command::SetPersonality { mode: Personality::Cute }, now())
            .await
            .unwrap();
        assert_eq!(reply.subject, "Subscribe first");
        assert!(user::find_user(d.database().pool(), ALICE).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_settings_update_with_sample() {
        let d = dispatcher().await;
        d.apply_at(ALICE, subscribe("Bratislava", None, None), now())
            .await
            .unwrap();

        let reply = d
            .apply_at(ALICE, Command::SetLanguage { lang: Language::Sk }, now())
            .await
            .unwrap();
        assert!(reply.body.starts_with("Jazyk nastavený na sk."));
        assert!(reply.body.contains("Pred odchodom si pozri predpoveď."));

        let reply = d
            .apply_at(
                ALICE,
                Command::UpdatePreferences {
                    language: Language::En,
                    personality: Personality::Emuska,
                },
                now(),
            )
            .await
            .unwrap();
        assert!(reply.body.starts_with("Personality set to emuska.\nLanguage set to en."));
        // Emuska renders as cute outside Slovak.
        assert!(reply.body.contains("Have a wonderful day whatever the weather 💖"));

        let sub = weather_subscription::get_subscription(d.database().pool(), ALICE)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sub.personality, "emuska");
        assert_eq!(sub.language, "en");
    }

    #[tokio::test]
    async fn test_countdown_upsert_by_name() {
        let d = dispatcher().await;
        let first = NaiveDate::from_ymd_opt(2025, 6, 11).unwrap();
        let moved = NaiveDate::from_ymd_opt(2025, 6, 21).unwrap();

        let reply = d
            .apply_at(ALICE, Command::countdown("Vacation", first), now())
            .await
            .unwrap();
        assert_eq!(reply.subject, "Countdown saved");
        assert!(reply.body.contains("Days to Vacation: 10"));

        d.apply_at(ALICE, Command::countdown("Vacation", moved), now())
            .await
            .unwrap();

        let pool = d.database().pool();
        let events = countdown::get_user_countdowns(pool, ALICE).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].date, moved);
        assert!(user::get_user(pool, ALICE).await.unwrap().countdown_enabled);
    }

    #[tokio::test]
    async fn test_countdown_templates() {
        let d = dispatcher().await;
        let date = NaiveDate::from_ymd_opt(2025, 6, 11).unwrap();
        let with_template = |before: String| Command::ScheduleCountdown {
            name: "Vacation".to_string(),
            date,
            time: None,
            yearly: false,
            message_before: Some(before),
            message_after: None,
        };

        let reply = d
            .apply_at(ALICE, with_template("{days} more sleeps until {name}".to_string()), now())
            .await
            .unwrap();
        assert!(reply.body.contains("10 more sleeps until Vacation"));

        let rejected = d
            .apply_at(ALICE, with_template("x".repeat(501)), now())
            .await
            .unwrap();
        assert_eq!(rejected.subject, "How to use Daily Brief");

        let events = countdown::get_user_countdowns(d.database().pool(), ALICE).await.unwrap();
        assert_eq!(
            events[0].message_before.as_deref(),
            Some("{days} more sleeps until {name}")
        );
    }

    #[tokio::test]
    async fn test_delete_all_countdowns() {
        let d = dispatcher().await;
        let date = NaiveDate::from_ymd_opt(2025, 12, 24).unwrap();
        d.apply_at(ALICE, Command::countdown("Christmas", date), now())
            .await
            .unwrap();
        d.apply_at(ALICE, Command::countdown("Party", date), now())
            .await
            .unwrap();

        let reply = d
            .apply_at(ALICE, Command::DeleteAllCountdowns, now())
            .await
            .unwrap();
        assert!(reply.body.starts_with("Deleted countdowns: 2."));

        let pool = d.database().pool();
        assert_eq!(countdown::count_user_countdowns(pool, ALICE).await.unwrap(), 0);
        assert!(!user::get_user(pool, ALICE).await.unwrap().countdown_enabled);

        // No-op when there is nothing left.
        let again = d
            .apply_at(ALICE, Command::DeleteAllCountdowns, now())
            .await
            .unwrap();
        assert!(again.body.starts_with("Deleted countdowns: 0."));
    }

    #[tokio::test]
    async fn test_delete_single_countdown() {
        let d = dispatcher().await;
        let date = NaiveDate::from_ymd_opt(2025, 12, 24).unwrap();
        d.apply_at(ALICE, Command::countdown("Christmas", date), now())
            .await
            .unwrap();

        assert!(d.delete_countdown(ALICE, "Christmas").await.unwrap());
        assert!(!d.delete_countdown(ALICE, "Christmas").await.unwrap());
        assert!(!user::get_user(d.database().pool(), ALICE).await.unwrap().countdown_enabled);
    }

    #[tokio::test]
    async fn test_unrecognized_replies_with_help() {
        let d = dispatcher().await;
        let reply = d
            .apply_at(ALICE, Command::unrecognized("empty or unparseable"), now())
            .await
            .unwrap();
        assert_eq!(reply.subject, "How to use Daily Brief");
        assert!(reply.body.contains("\"delete\" to unsubscribe"));
    }

    #[test]
    fn test_local_today_uses_user_timezone() {
        let late = Utc.with_ymd_and_hms(2025, 6, 1, 23, 30, 0).unwrap();
        assert_eq!(
            local_today("Europe/Bratislava", "UTC", late),
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
        );
        assert_eq!(
            local_today("Not/AZone", "America/Lima", late),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
    }
}
