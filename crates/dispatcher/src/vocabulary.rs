//! Closed word lists the parser classifies tokens against.

use std::collections::{HashMap, HashSet};

use digest::{Language, Personality};

const LANGUAGE_WORDS: &[(&str, Language)] = &[
    ("en", Language::En),
    ("eng", Language::En),
    ("english", Language::En),
    ("inglés", Language::En),
    ("ingles", Language::En),
    ("anglicky", Language::En),
    ("angličtina", Language::En),
    ("es", Language::Es),
    ("spa", Language::Es),
    ("spanish", Language::Es),
    ("español", Language::Es),
    ("espanol", Language::Es),
    ("castellano", Language::Es),
    ("španielsky", Language::Es),
    ("spanielsky", Language::Es),
    ("sk", Language::Sk),
    ("slovak", Language::Sk),
    ("slovensky", Language::Sk),
    ("slovenský", Language::Sk),
    ("slovenčina", Language::Sk),
    ("slovencina", Language::Sk),
    ("eslovaco", Language::Sk),
];

const PERSONALITY_WORDS: &[(&str, Personality)] = &[
    ("neutral", Personality::Neutral),
    ("normal", Personality::Neutral),
    ("standard", Personality::Neutral),
    ("default", Personality::Neutral),
    ("neutrálny", Personality::Neutral),
    ("neutralny", Personality::Neutral),
    ("cute", Personality::Cute),
    ("sweet", Personality::Cute),
    ("lovely", Personality::Cute),
    ("kind", Personality::Cute),
    ("milý", Personality::Cute),
    ("mily", Personality::Cute),
    ("roztomilý", Personality::Cute),
    ("roztomily", Personality::Cute),
    ("tierno", Personality::Cute),
    ("tierna", Personality::Cute),
    ("brutal", Personality::Brutal),
    ("harsh", Personality::Brutal),
    ("direct", Personality::Brutal),
    ("honest", Personality::Brutal),
    ("savage", Personality::Brutal),
    ("drsný", Personality::Brutal),
    ("drsny", Personality::Brutal),
    ("directo", Personality::Brutal),
    ("emuska", Personality::Emuska),
    ("emuška", Personality::Emuska),
];

const FILLER_WORDS: &[&str] = &[
    "please", "pls", "thanks", "thank", "you", "hello", "hi", "hey", "dear", "regards", "cheers",
    "ahoj", "dobrý", "dobry", "deň", "prosím", "prosim", "ďakujem", "dakujem", "vďaka",
    "vdaka", "hola", "gracias", "por", "favor", "saludos", "buenos", "días", "dias",
    // Connectives of requests like "send me weather for Madrid in Spanish".
    "i", "i'd", "i’d", "i'm", "i’m", "im", "want", "would", "like", "love", "need", "get",
    "give", "send", "me", "my", "for", "in", "with", "and", "to", "at",
    "quiero", "quisiera", "mi", "mándame", "mandame", "envíame", "enviame", "para",
    "con", "y",
    "chcem", "chcel", "chcela", "by", "som", "pošli", "posli", "pošlite", "poslite",
    "pre", "po", "v", "vo", "s", "so", "a",
];

/// Words that only steer the command and never belong to a location.
const KEYWORDS: &[&str] = &[
    "subscribe", "weather", "forecast", "location", "city", "language", "personality",
    "personalities", "style", "mode", "tone", "set", "change", "update", "daily",
    "počasie", "pocasie", "predpoveď", "predpoved", "jazyk", "osobnosť", "osobnost", "štýl",
    "styl", "tón", "clima", "tiempo", "pronóstico", "pronostico", "idioma", "personalidad",
    "estilo", "tono",
];

const UNSUBSCRIBE_PHRASES: &[&str] = &[
    "delete", "stop", "unsubscribe", "cancel", "zrušiť", "zrusit", "odhlásiť", "odhlasit", "baja",
    "darse de baja",
];

const DELETE_COUNTDOWNS_PHRASES: &[&str] = &[
    "delete countdowns",
    "delete all countdowns",
    "clear countdowns",
    "remove countdowns",
    "zrušiť odpočítavania",
    "zrusit odpocitavania",
];

/// Fields recognised in `key: value` / `key=value` lines.
pub const SUBSCRIPTION_FIELDS: &[&str] = &["location", "language", "personality"];

/// Fields that switch a labeled body to the calendar grammar.
pub const CALENDAR_FIELDS: &[&str] = &["date", "time", "message", "repeat", "before", "after"];

/// Synonym tables for the token scanner.
///
/// All entries are stored case-folded. [`Vocabulary::default`] holds the
/// built-in English, Spanish and Slovak words; the `with_*` methods extend it.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    languages: HashMap<String, Language>,
    personalities: HashMap<String, Personality>,
    fillers: HashSet<String>,
    keywords: HashSet<String>,
    unsubscribe: HashSet<String>,
    delete_countdowns: HashSet<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            languages: LANGUAGE_WORDS.iter().map(|(w, l)| (w.to_string(), *l)).collect(),
            personalities: PERSONALITY_WORDS.iter().map(|(w, p)| (w.to_string(), *p)).collect(),
            fillers: FILLER_WORDS.iter().map(|w| w.to_string()).collect(),
            keywords: KEYWORDS.iter().map(|w| w.to_string()).collect(),
            unsubscribe: UNSUBSCRIBE_PHRASES.iter().map(|w| w.to_string()).collect(),
            delete_countdowns: DELETE_COUNTDOWNS_PHRASES.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl Vocabulary {
    /// Add a language synonym.
    pub fn with_language(mut self, word: &str, language: Language) -> Self {
        self.languages.insert(word.to_lowercase(), language);
        self
    }

    /// Add a personality synonym.
    pub fn with_personality(mut self, word: &str, personality: Personality) -> Self {
        self.personalities.insert(word.to_lowercase(), personality);
        self
    }

    /// Add a word that is discarded wherever it appears.
    pub fn with_filler(mut self, word: &str) -> Self {
        self.fillers.insert(word.to_lowercase());
        self
    }

    /// Add an exact-match phrase meaning unsubscribe.
    pub fn with_unsubscribe_phrase(mut self, phrase: &str) -> Self {
        self.unsubscribe.insert(fold(phrase));
        self
    }

    pub fn language(&self, word: &str) -> Option<Language> {
        self.languages.get(&word.to_lowercase()).copied()
    }

    pub fn personality(&self, word: &str) -> Option<Personality> {
        self.personalities.get(&word.to_lowercase()).copied()
    }

    /// Filler or steering keyword: dropped from the location.
    pub fn is_ignored(&self, word: &str) -> bool {
        let word = word.to_lowercase();
        self.fillers.contains(&word) || self.keywords.contains(&word)
    }

    /// Whether the whole body is an unsubscribe phrase.
    pub fn is_unsubscribe(&self, body: &str) -> bool {
        self.unsubscribe.contains(&fold(body))
    }

    /// Whether the whole body asks to delete all countdowns.
    pub fn is_delete_countdowns(&self, body: &str) -> bool {
        self.delete_countdowns.contains(&fold(body))
    }
}

/// Lower-case, collapse whitespace and drop trailing punctuation.
pub(crate) fn fold(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .trim_end_matches(['.', '!', '?'])
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_phrases() {
        let vocab = Vocabulary::default();
        assert!(vocab.is_unsubscribe("  DELETE. "));
        assert!(vocab.is_unsubscribe("Darse   de baja"));
        assert!(!vocab.is_unsubscribe("please delete my account"));
        assert!(vocab.is_delete_countdowns("Delete all countdowns!"));
    }

    #[test]
    fn test_synonyms_are_case_insensitive() {
        let vocab = Vocabulary::default();
        assert_eq!(vocab.language("Español"), Some(Language::Es));
        assert_eq!(vocab.personality("HARSH"), Some(Personality::Brutal));
        assert!(vocab.is_ignored("Please"));
        assert_eq!(vocab.language("Prague"), None);
    }

    #[test]
    fn test_request_connectives_are_ignored() {
        let vocab = Vocabulary::default();
        for word in ["for", "In", "I'd", "send", "me", "para", "chcem", "Personalidad", "osobnosť"] {
            assert!(vocab.is_ignored(word), "{word}");
        }
        assert!(!vocab.is_ignored("Madrid"));
    }

    #[test]
    fn test_extension() {
        let vocab = Vocabulary::default()
            .with_language("castellano", Language::Es)
            .with_personality("zlatko", Personality::Cute)
            .with_filler("yo")
            .with_unsubscribe_phrase("Leave me alone");
        assert_eq!(vocab.personality("Zlatko"), Some(Personality::Cute));
        assert!(vocab.is_ignored("yo"));
        assert!(vocab.is_unsubscribe("leave me alone"));
    }
}
