//! Row models.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user, identified by email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Email address (primary key).
    pub email: String,
    /// Display name, if known.
    pub name: Option<String>,
    /// IANA timezone name (e.g. "Europe/Bratislava").
    pub timezone: String,
    /// Receives the weather digest.
    pub weather_enabled: bool,
    /// Has countdown events.
    pub countdown_enabled: bool,
    /// Reserved for the reminder module.
    pub reminder_enabled: bool,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// Weather digest settings for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct WeatherSubscription {
    /// Owning user's email.
    pub email: String,
    /// Display name of the geocoded location.
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Personality mode ("neutral", "cute", "brutal", "emuska").
    pub personality: String,
    /// Language code ("en", "es", "sk").
    pub language: String,
    /// Local date of the last digest delivered.
    pub last_sent_date: Option<NaiveDate>,
    /// Last update timestamp.
    pub updated_at: String,
}

/// Values written by a subscription upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionUpsert {
    pub email: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub personality: String,
    pub language: String,
}

/// A named countdown owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CountdownEvent {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning user's email.
    pub email: String,
    /// Name, unique per user.
    pub name: String,
    /// Target date.
    pub date: NaiveDate,
    /// Optional time of day on the target date.
    pub time: Option<NaiveTime>,
    /// Repeats on the same month/day every year.
    pub yearly: bool,
    /// Template shown before the event; `{days}` is substituted.
    pub message_before: Option<String>,
    /// Template shown after the event; `None` expires the countdown.
    pub message_after: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Values written by a countdown upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownUpsert {
    pub email: String,
    pub name: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub yearly: bool,
    pub message_before: Option<String>,
    pub message_after: Option<String>,
}

/// A processed inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct InboxLedgerEntry {
    /// Transport-assigned unique id.
    pub uid: String,
    /// Sender address.
    pub from_email: String,
    /// When the message was processed.
    pub received_at: String,
    pub subject: Option<String>,
    /// Hex SHA-256 of the body.
    pub body_hash: Option<String>,
}

/// A user eligible for the daily digest, joined with their subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DigestCandidate {
    pub email: String,
    pub timezone: String,
    pub countdown_enabled: bool,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub personality: String,
    pub language: String,
    pub last_sent_date: Option<NaiveDate>,
}
