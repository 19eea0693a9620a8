//! Languages, personality modes and the fixed strings around messages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DigestError;

/// Supported output languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Sk,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Es, Language::Sk];

    /// ISO 639-1 code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Sk => "sk",
        }
    }

    /// Parse a stored code, falling back to English for unknown values.
    pub fn from_code_or_default(code: &str) -> Self {
        code.parse().unwrap_or_default()
    }

    /// Fixed strings for this language.
    pub fn strings(&self) -> &'static Strings {
        match self {
            Language::En => &EN,
            Language::Es => &ES,
            Language::Sk => &SK,
        }
    }

    /// Word for "day" agreeing with `n`.
    pub fn days_word(&self, n: i64) -> &'static str {
        match self {
            Language::En => {
                if n == 1 {
                    "day"
                } else {
                    "days"
                }
            }
            Language::Es => {
                if n == 1 {
                    "día"
                } else {
                    "días"
                }
            }
            Language::Sk => match n {
                1 => "deň",
                2..=4 => "dni",
                _ => "dní",
            },
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            "sk" => Ok(Language::Sk),
            other => Err(DigestError::UnknownLanguage(other.to_string())),
        }
    }
}

/// Tone used when rendering messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    #[default]
    Neutral,
    Cute,
    Brutal,
    /// Slovak-only pet mode; renders as `Cute` in other languages.
    Emuska,
}

impl Personality {
    pub const ALL: [Personality; 4] = [
        Personality::Neutral,
        Personality::Cute,
        Personality::Brutal,
        Personality::Emuska,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Personality::Neutral => "neutral",
            Personality::Cute => "cute",
            Personality::Brutal => "brutal",
            Personality::Emuska => "emuska",
        }
    }

    /// Parse a stored mode, falling back to neutral for unknown values.
    pub fn from_code_or_default(code: &str) -> Self {
        code.parse().unwrap_or_default()
    }

    /// The mode actually rendered in `language`.
    pub fn effective(self, language: Language) -> Personality {
        match (self, language) {
            (Personality::Emuska, Language::Sk) => Personality::Emuska,
            (Personality::Emuska, _) => Personality::Cute,
            (other, _) => other,
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Personality {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "neutral" => Ok(Personality::Neutral),
            "cute" => Ok(Personality::Cute),
            "brutal" => Ok(Personality::Brutal),
            "emuska" => Ok(Personality::Emuska),
            other => Err(DigestError::UnknownPersonality(other.to_string())),
        }
    }
}

/// Fixed strings surrounding the catalog messages.
#[derive(Debug)]
pub struct Strings {
    pub weather_intro: &'static str,
    pub weather_unavailable: &'static str,
    pub high: &'static str,
    pub low: &'static str,
    pub rain: &'static str,
    pub wind: &'static str,
    pub countdown_header: &'static str,
    /// `{name}` and `{days}` are substituted.
    pub countdown_default: &'static str,
    /// `{name}` is substituted.
    pub countdown_today: &'static str,
    pub at_time: &'static str,
    pub brief_subject: &'static str,
    pub footer_greeting: &'static str,
    pub footer_signature: &'static str,
    pub advice_jacket: &'static str,
    pub advice_light: &'static str,
    pub advice_comfortable: &'static str,
    pub advice_umbrella: &'static str,
    pub advice_windbreaker: &'static str,
    pub flair_cute: &'static str,
    pub flair_brutal: &'static str,
    pub flair_emuska: &'static str,
}

static EN: Strings = Strings {
    weather_intro: "Today's weather for",
    weather_unavailable: "Weather for {location} is unavailable today.",
    high: "High",
    low: "Low",
    rain: "Rain",
    wind: "Wind up to",
    countdown_header: "⏳ Countdowns:",
    countdown_default: "Days to {name}: {days}",
    countdown_today: "{name} is today!",
    at_time: "at",
    brief_subject: "Your Daily Brief",
    footer_greeting: "Have a great day!",
    footer_signature: "Your Daily Brief",
    advice_jacket: "Wear a jacket.",
    advice_light: "Light clothing recommended.",
    advice_comfortable: "Dress comfortably.",
    advice_umbrella: "Take an umbrella.",
    advice_windbreaker: "Wear a windbreaker.",
    flair_cute: "Stay cozy! 💖",
    flair_brutal: "Weather doesn't care about you.",
    flair_emuska: "Stay cozy! 💖",
};

static ES: Strings = Strings {
    weather_intro: "El tiempo de hoy para",
    weather_unavailable: "El tiempo para {location} no está disponible hoy.",
    high: "Máx",
    low: "Mín",
    rain: "Lluvia",
    wind: "Viento hasta",
    countdown_header: "⏳ Cuentas atrás:",
    countdown_default: "Días hasta {name}: {days}",
    countdown_today: "¡{name} es hoy!",
    at_time: "a las",
    brief_subject: "Tu resumen diario",
    footer_greeting: "¡Que tengas un gran día!",
    footer_signature: "Tu resumen diario",
    advice_jacket: "Ponte una chaqueta.",
    advice_light: "Se recomienda ropa ligera.",
    advice_comfortable: "Vístete cómodo.",
    advice_umbrella: "Lleva paraguas.",
    advice_windbreaker: "Ponte un cortavientos.",
    flair_cute: "¡Abrígate con cariño! 💖",
    flair_brutal: "Al tiempo le das igual.",
    flair_emuska: "¡Abrígate con cariño! 💖",
};

static SK: Strings = Strings {
    weather_intro: "Dnešné počasie pre",
    weather_unavailable: "Počasie pre {location} dnes nie je dostupné.",
    high: "Max",
    low: "Min",
    rain: "Dážď",
    wind: "Vietor do",
    countdown_header: "⏳ Odpočítavanie:",
    countdown_default: "Dni do {name}: {days}",
    countdown_today: "{name} je dnes!",
    at_time: "o",
    brief_subject: "Tvoj denný prehľad",
    footer_greeting: "Pekný deň!",
    footer_signature: "Tvoj denný prehľad",
    advice_jacket: "Obleč si bundu.",
    advice_light: "Odporúča sa ľahké oblečenie.",
    advice_comfortable: "Obleč sa pohodlne.",
    advice_umbrella: "Vezmi si dáždnik.",
    advice_windbreaker: "Obleč si vetrovku.",
    flair_cute: "Zostaň v teplúčku! 💖",
    flair_brutal: "Počasiu je jedno, čo si myslíš.",
    flair_emuska: "Ľúbime ťa, princezná! 👑💕",
};
