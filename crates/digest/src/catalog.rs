//! Condition message catalog.
//!
//! Messages are keyed by (language, condition key, personality). Each
//! language is loaded from lines of the form
//! `key|neutral|cute|brutal|emuska`; empty fields are treated as missing.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{DigestError, Result};
use crate::locale::{Language, Personality};

const BUILTIN_EN: &str = include_str!("../messages/en.txt");
const BUILTIN_ES: &str = include_str!("../messages/es.txt");
const BUILTIN_SK: &str = include_str!("../messages/sk.txt");

/// File name looked up under `<dir>/<lang>/`.
pub const MESSAGES_FILE: &str = "weather_messages.txt";

/// Used only when not even the English neutral default is present.
const LAST_RESORT: &str = "Have a nice day.";

type Table = HashMap<String, HashMap<Personality, String>>;

/// Per-language condition messages with fallback lookup.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    tables: HashMap<Language, Table>,
}

impl MessageCatalog {
    /// An empty catalog. Every lookup returns the last-resort string.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The catalog compiled into the binary.
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        for (language, text) in [
            (Language::En, BUILTIN_EN),
            (Language::Es, BUILTIN_ES),
            (Language::Sk, BUILTIN_SK),
        ] {
            // Built-in files are part of the crate and covered by tests.
            if let Ok(table) = parse_table(text, language.as_str()) {
                catalog.tables.insert(language, table);
            }
        }
        catalog
    }

    /// The built-in catalog overlaid with `<dir>/<lang>/weather_messages.txt`
    /// for each language whose file exists.
    pub fn with_overrides(dir: &Path) -> Result<Self> {
        let mut catalog = Self::builtin();
        for language in Language::ALL {
            let path = dir.join(language.as_str()).join(MESSAGES_FILE);
            if !path.exists() {
                debug!(path = %path.display(), "No message override");
                continue;
            }
            let text = std::fs::read_to_string(&path).map_err(|source| DigestError::Io {
                path: path.clone(),
                source,
            })?;
            let table = parse_table(&text, &path.display().to_string())?;
            info!(language = %language, entries = table.len(), "Loaded message overrides");
            catalog.merge(language, table);
        }
        Ok(catalog)
    }

    /// Insert or replace one message.
    pub fn insert(
        &mut self,
        language: Language,
        key: &str,
        personality: Personality,
        message: impl Into<String>,
    ) {
        self.tables
            .entry(language)
            .or_default()
            .entry(key.to_string())
            .or_default()
            .insert(personality, message.into());
    }

    fn merge(&mut self, language: Language, table: Table) {
        let target = self.tables.entry(language).or_default();
        for (key, by_personality) in table {
            target.entry(key).or_default().extend(by_personality);
        }
    }

    fn get(&self, language: Language, key: &str, personality: Personality) -> Option<&str> {
        self.tables
            .get(&language)?
            .get(key)?
            .get(&personality)
            .map(String::as_str)
    }

    /// Message for `key`, never empty.
    ///
    /// Fallback order: requested language then English, then the neutral
    /// personality in the same two languages, then the same chain for the
    /// `default` key.
    pub fn lookup(&self, language: Language, key: &str, personality: Personality) -> &str {
        let personality = personality.effective(language);
        let chain = [
            (language, personality),
            (Language::En, personality),
            (language, Personality::Neutral),
            (Language::En, Personality::Neutral),
        ];

        for candidate_key in [key, "default"] {
            for (lang, mode) in chain {
                if let Some(message) = self.get(lang, candidate_key, mode) {
                    return message;
                }
            }
        }

        LAST_RESORT
    }
}

fn parse_table(text: &str, source: &str) -> Result<Table> {
    let mut table = Table::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split('|');
        let key = fields.next().unwrap_or_default().trim();
        if key.is_empty() {
            return Err(DigestError::Format {
                file: source.to_string(),
                line: index + 1,
                reason: "missing key".to_string(),
            });
        }

        let entry = table.entry(key.to_string()).or_default();
        for (personality, message) in Personality::ALL.into_iter().zip(fields) {
            let message = message.trim();
            if !message.is_empty() {
                entry.insert(personality, message.to_string());
            }
        }
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;

    #[test]
    fn test_builtin_covers_every_condition() {
        let catalog = MessageCatalog::builtin();
        for language in Language::ALL {
            for condition in Condition::ALL {
                for personality in [Personality::Neutral, Personality::Cute, Personality::Brutal] {
                    assert!(
                        catalog.get(language, condition.key(), personality).is_some(),
                        "missing {}/{}/{}",
                        language,
                        condition.key(),
                        personality
                    );
                }
            }
        }
        for condition in Condition::ALL {
            assert!(catalog
                .get(Language::Sk, condition.key(), Personality::Emuska)
                .is_some());
        }
    }

    #[test]
    fn test_language_falls_back_to_english() {
        let mut catalog = MessageCatalog::empty();
        catalog.insert(Language::En, "sunny", Personality::Cute, "en cute");
        catalog.insert(Language::Sk, "sunny", Personality::Neutral, "sk neutral");

        assert_eq!(catalog.lookup(Language::Sk, "sunny", Personality::Cute), "en cute");
    }

    #[test]
    fn test_personality_falls_back_to_neutral() {
        let mut catalog = MessageCatalog::empty();
        catalog.insert(Language::Es, "sunny", Personality::Neutral, "es neutral");

        assert_eq!(catalog.lookup(Language::Es, "sunny", Personality::Brutal), "es neutral");
    }

    #[test]
    fn test_unknown_key_uses_default_then_last_resort() {
        let mut catalog = MessageCatalog::empty();
        assert_eq!(catalog.lookup(Language::En, "volcano", Personality::Neutral), LAST_RESORT);

        catalog.insert(Language::En, "default", Personality::Neutral, "fallback");
        assert_eq!(catalog.lookup(Language::Sk, "volcano", Personality::Cute), "fallback");
    }

    #[test]
    fn test_emuska_outside_slovak_renders_cute() {
        let catalog = MessageCatalog::builtin();
        assert_eq!(
            catalog.lookup(Language::En, "sunny", Personality::Emuska),
            catalog.lookup(Language::En, "sunny", Personality::Cute)
        );
        assert!(catalog
            .lookup(Language::Sk, "sunny", Personality::Emuska)
            .contains("Emuška"));
    }

    #[test]
    fn test_overrides_replace_single_fields() {
        let dir = tempfile::tempdir().unwrap();
        let sk_dir = dir.path().join("sk");
        std::fs::create_dir_all(&sk_dir).unwrap();
        std::fs::write(
            sk_dir.join(MESSAGES_FILE),
            "# custom\nsunny|Vlastná správa||\n",
        )
        .unwrap();

        let catalog = MessageCatalog::with_overrides(dir.path()).unwrap();
        assert_eq!(
            catalog.lookup(Language::Sk, "sunny", Personality::Neutral),
            "Vlastná správa"
        );
        // Untouched personalities keep the built-in text.
        assert_eq!(
            catalog.lookup(Language::Sk, "sunny", Personality::Cute),
            MessageCatalog::builtin().lookup(Language::Sk, "sunny", Personality::Cute)
        );
    }

    #[test]
    fn test_missing_key_is_format_error() {
        let result = parse_table("|a|b|c", "inline");
        assert!(matches!(result, Err(DigestError::Format { line: 1, .. })));
    }
}
