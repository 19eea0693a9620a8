//! Name day calendars.
//!
//! File format, one entry per line:
//!
//! ```text
//! # Message: Meniny má
//! 01-02=Alexandra, Karina
//! ```

use std::collections::HashMap;
use std::path::Path;

use chrono::{Datelike, NaiveDate};

use crate::error::{DigestError, Result};
use crate::locale::Language;

/// File name looked up under `<dir>/<lang>/`.
pub const NAMEDAYS_FILE: &str = "namedays.txt";

/// Names celebrated on each calendar day for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedayCalendar {
    prefix: String,
    names: HashMap<(u32, u32), String>,
}

impl NamedayCalendar {
    /// Parse calendar text. `source` is used in error messages.
    pub fn parse(text: &str, source: &str) -> Result<Self> {
        let mut calendar = Self::default();

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(prefix) = line.strip_prefix("# Message:") {
                calendar.prefix = prefix.trim().to_string();
                continue;
            }
            if line.starts_with('#') {
                continue;
            }

            let format_error = |reason: &str| DigestError::Format {
                file: source.to_string(),
                line: index + 1,
                reason: reason.to_string(),
            };

            let (key, names) = line
                .split_once('=')
                .ok_or_else(|| format_error("expected MM-DD=Names"))?;
            let (month, day) = key
                .trim()
                .split_once('-')
                .and_then(|(m, d)| Some((m.parse::<u32>().ok()?, d.parse::<u32>().ok()?)))
                .ok_or_else(|| format_error("expected MM-DD date"))?;

            // 2024 is a leap year, so 02-29 validates.
            if NaiveDate::from_ymd_opt(2024, month, day).is_none() {
                return Err(format_error("no such calendar day"));
            }

            let names = names.trim();
            if !names.is_empty() {
                calendar.names.insert((month, day), names.to_string());
            }
        }

        Ok(calendar)
    }

    /// Load `<dir>/<lang>/namedays.txt`, `None` if the language has no file.
    pub fn load(dir: &Path, language: Language) -> Result<Option<Self>> {
        let path = dir.join(language.as_str()).join(NAMEDAYS_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&path).map_err(|source| DigestError::Io {
            path: path.clone(),
            source,
        })?;
        Self::parse(&text, &path.display().to_string()).map(Some)
    }

    /// Names for `date`, if any.
    pub fn names_on(&self, date: NaiveDate) -> Option<&str> {
        self.names.get(&(date.month(), date.day())).map(String::as_str)
    }

    /// The full line for `date`, e.g. "Meniny má Alexandra, Karina".
    pub fn message_for(&self, date: NaiveDate) -> Option<String> {
        let names = self.names_on(date)?;
        if self.prefix.is_empty() {
            Some(names.to_string())
        } else {
            Some(format!("{} {}", self.prefix, names))
        }
    }
}

/// Calendars for every language that has a file.
#[derive(Debug, Clone, Default)]
pub struct Namedays {
    calendars: HashMap<Language, NamedayCalendar>,
}

impl Namedays {
    /// Load every language found under `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut calendars = HashMap::new();
        for language in Language::ALL {
            if let Some(calendar) = NamedayCalendar::load(dir, language)? {
                calendars.insert(language, calendar);
            }
        }
        Ok(Self { calendars })
    }

    pub fn insert(&mut self, language: Language, calendar: NamedayCalendar) {
        self.calendars.insert(language, calendar);
    }

    /// Name day line for `language` on `date`.
    pub fn message_for(&self, language: Language, date: NaiveDate) -> Option<String> {
        self.calendars.get(&language)?.message_for(date)
    }
}
