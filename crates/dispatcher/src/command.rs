//! Typed commands parsed from email bodies.

use chrono::{NaiveDate, NaiveTime};
use digest::{Language, Personality};
use serde::{Deserialize, Serialize};

/// A command from a subscriber.
///
/// Produced by the parser (or built directly by another front end) and
/// consumed by [`Dispatcher::apply`](crate::Dispatcher::apply).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Start or update the weather digest for a location.
    Subscribe {
        location: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        personality: Option<Personality>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<Language>,
    },

    /// Stop the weather digest.
    Unsubscribe,

    /// Change the tone of an existing subscription.
    SetPersonality { mode: Personality },

    /// Change the language of an existing subscription.
    SetLanguage { lang: Language },

    /// Change both language and tone of an existing subscription.
    UpdatePreferences {
        language: Language,
        personality: Personality,
    },

    /// Create or replace the countdown with this name.
    ScheduleCountdown {
        name: String,
        date: NaiveDate,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time: Option<NaiveTime>,
        #[serde(default)]
        yearly: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message_before: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message_after: Option<String>,
    },

    /// Remove every countdown of the sender.
    DeleteAllCountdowns,

    /// Nothing actionable; the sender gets usage help.
    Unrecognized { reason: String },
}

impl Command {
    /// Create a subscribe command with only a location.
    pub fn subscribe(location: impl Into<String>) -> Self {
        Self::Subscribe {
            location: location.into(),
            personality: None,
            language: None,
        }
    }

    /// Create a countdown command with default templates.
    pub fn countdown(name: impl Into<String>, date: NaiveDate) -> Self {
        Self::ScheduleCountdown {
            name: name.into(),
            date,
            time: None,
            yearly: false,
            message_before: None,
            message_after: None,
        }
    }

    /// Create an unrecognized command with the given reason.
    pub fn unrecognized(reason: impl Into<String>) -> Self {
        Self::Unrecognized {
            reason: reason.into(),
        }
    }

    /// Whether applying this command can change stored state.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Self::Unrecognized { .. })
    }

    /// Short label for logs.
    pub fn description(&self) -> String {
        match self {
            Self::Subscribe { location, .. } => format!("Subscribe: {}", location),
            Self::Unsubscribe => "Unsubscribe".to_string(),
            Self::SetPersonality { mode } => format!("Set personality: {}", mode),
            Self::SetLanguage { lang } => format!("Set language: {}", lang),
            Self::UpdatePreferences {
                language,
                personality,
            } => format!("Set language {} and personality {}", language, personality),
            Self::ScheduleCountdown { name, date, .. } => format!("Countdown: {} on {}", name, date),
            Self::DeleteAllCountdowns => "Delete all countdowns".to_string(),
            Self::Unrecognized { reason } => format!("Unrecognized: {}", reason),
        }
    }
}
