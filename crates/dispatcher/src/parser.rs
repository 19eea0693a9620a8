//! Email body to [`Command`].
//!
//! Tiers, first match wins:
//!
//! 1. the whole body is an unsubscribe or delete-countdowns phrase
//! 2. `key: value` / `key=value` lines; any calendar key selects the
//!    countdown grammar
//! 3. a token scan that pulls out language and personality words and keeps
//!    every other word, in order and with its casing, as the location
//!
//! Quoted reply text and signatures are stripped before any tier runs.
//! Parsing never fails: anything unusable becomes [`Command::Unrecognized`].

use chrono::{NaiveDate, NaiveTime};
use database::validation::{validate_countdown_name, validate_location, validate_template};
use digest::{Language, Personality};

use crate::command::Command;
use crate::vocabulary::{fold, Vocabulary, CALENDAR_FIELDS, SUBSCRIPTION_FIELDS};

const EMPTY: &str = "empty or unparseable";

/// Longer runs of unmatched words are prose, not a place name.
const MAX_LOCATION_WORDS: usize = 6;

/// ISO country and region codes ("SK", "ESP") are at most this long.
const MAX_COUNTRY_CODE_CHARS: usize = 3;

const YEARLY_VALUES: &[&str] = &[
    "yearly",
    "annually",
    "every year",
    "yes",
    "true",
    "ročne",
    "rocne",
    "každý rok",
    "anual",
    "cada año",
];

/// Command parser with a configurable vocabulary.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    vocabulary: Vocabulary,
}

impl Parser {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Parse a plain-text email body.
    pub fn parse(&self, raw_body: &str) -> Command {
        let body = strip_reply_noise(raw_body);
        if body.trim().is_empty() {
            return Command::unrecognized(EMPTY);
        }

        if self.vocabulary.is_unsubscribe(&body) {
            return Command::Unsubscribe;
        }
        if self.vocabulary.is_delete_countdowns(&body) {
            return Command::DeleteAllCountdowns;
        }

        let (fields, loose) = labeled_fields(&body);
        if !fields.is_empty() {
            return self.parse_fields(&fields, &loose);
        }

        self.scan_tokens(&body)
    }

    /// `loose` holds the body lines that carry no known label.
    fn parse_fields(&self, fields: &[(String, String)], loose: &[&str]) -> Command {
        // A repeated key keeps its last value.
        let get = |key: &str| {
            fields
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
                .filter(|v| !v.is_empty())
        };

        if fields.iter().any(|(k, _)| CALENDAR_FIELDS.contains(&k.as_str())) {
            return parse_calendar(&CalendarFields {
                message: get("message"),
                date: get("date"),
                time: get("time"),
                repeat: get("repeat"),
                before: get("before"),
                after: get("after"),
            });
        }

        let language = match get("language") {
            Some(value) => match self.resolve_language(value) {
                Some(language) => Some(language),
                None => return Command::unrecognized(format!("unknown language: {}", value)),
            },
            None => None,
        };

        let personality = match get("personality") {
            Some(value) => match self.resolve_personality(value) {
                Some(personality) => Some(personality),
                None => return Command::unrecognized(format!("unknown personality: {}", value)),
            },
            None => None,
        };

        // Unlabeled lines next to labels ("Prague\nlanguage: sk") still count.
        let loose = loose.join("\n");
        let scanned = self.scan(&loose);
        let location = match get("location") {
            Some(location) => Some(location.to_string()),
            None if scanned.words.len() <= MAX_LOCATION_WORDS => scanned.location(),
            None => None,
        };

        build(
            location,
            language.or(scanned.language),
            personality.or(scanned.personality),
        )
    }

    fn resolve_language(&self, value: &str) -> Option<Language> {
        self.vocabulary
            .language(value.trim())
            .or_else(|| value.parse().ok())
    }

    fn resolve_personality(&self, value: &str) -> Option<Personality> {
        self.vocabulary
            .personality(value.trim())
            .or_else(|| value.parse().ok())
    }

    fn scan_tokens(&self, body: &str) -> Command {
        let scanned = self.scan(body);
        if scanned.words.len() > MAX_LOCATION_WORDS {
            return Command::unrecognized("too many words for a location");
        }
        build(scanned.location(), scanned.language, scanned.personality)
    }

    fn scan<'a>(&self, body: &'a str) -> Scanned<'a> {
        let mut scanned = Scanned::default();

        for word in body.split_whitespace() {
            let core = word.trim_matches(|c: char| !c.is_alphanumeric());
            let after_comma = scanned.words.last().is_some_and(|last| last.ends_with(','));
            if core.is_empty() {
                // A detached comma still separates city and country.
                if word.contains(',') && !after_comma && !scanned.words.is_empty() {
                    scanned.words.push(",");
                }
                continue;
            }

            let kept = word
                .trim_start_matches(|c: char| !c.is_alphanumeric())
                .trim_end_matches(|c: char| !c.is_alphanumeric() && c != ',');

            // "Bratislava, SK": a short code after a comma is a country.
            if let Some(found) = self.vocabulary.language(core) {
                if after_comma && core.chars().count() <= MAX_COUNTRY_CODE_CHARS {
                    scanned.words.push(kept);
                } else {
                    scanned.language.get_or_insert(found);
                }
                continue;
            }
            if let Some(found) = self.vocabulary.personality(core) {
                scanned.personality.get_or_insert(found);
                continue;
            }
            if self.vocabulary.is_ignored(core) {
                continue;
            }

            scanned.words.push(kept);
        }

        scanned
    }
}

/// Result of the token scan over part of a body.
#[derive(Debug, Default)]
struct Scanned<'a> {
    words: Vec<&'a str>,
    language: Option<Language>,
    personality: Option<Personality>,
}

impl Scanned<'_> {
    fn location(&self) -> Option<String> {
        let location = join_location(&self.words);
        (!location.is_empty()).then_some(location)
    }
}

/// Parse with the built-in vocabulary.
pub fn parse(raw_body: &str) -> Command {
    Parser::default().parse(raw_body)
}

fn build(location: Option<String>, language: Option<Language>, personality: Option<Personality>) -> Command {
    match (location, language, personality) {
        (Some(location), language, personality) => {
            if validate_location(&location).is_err() {
                return Command::unrecognized("location too long");
            }
            Command::Subscribe {
                location,
                personality,
                language,
            }
        }
        (None, Some(language), Some(personality)) => Command::UpdatePreferences {
            language,
            personality,
        },
        (None, Some(lang), None) => Command::SetLanguage { lang },
        (None, None, Some(mode)) => Command::SetPersonality { mode },
        (None, None, None) => Command::unrecognized(EMPTY),
    }
}

/// Join words with single spaces, gluing a lone "," to the word before it.
fn join_location(words: &[&str]) -> String {
    let mut out = String::new();
    for word in words {
        if *word == "," {
            out.push(',');
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out.trim_end_matches(',').trim().to_string()
}

/// Values of a labeled countdown body.
struct CalendarFields<'a> {
    message: Option<&'a str>,
    date: Option<&'a str>,
    time: Option<&'a str>,
    repeat: Option<&'a str>,
    before: Option<&'a str>,
    after: Option<&'a str>,
}

/// `message` names the event; `before` and `after` are optional line
/// templates, and without `before` the localized "Days to" line is used.
fn parse_calendar(fields: &CalendarFields<'_>) -> Command {
    let Some(name) = fields.message else {
        return Command::unrecognized("countdown needs a message");
    };
    if validate_countdown_name(name).is_err() {
        return Command::unrecognized("countdown message too long");
    }

    let Some(date) = fields.date.and_then(parse_date) else {
        return Command::unrecognized("countdown needs a date as YYYY-MM-DD or DD.MM.YYYY");
    };

    let time = match fields.time {
        Some(raw) => match parse_time(raw) {
            Some(time) => Some(time),
            None => return Command::unrecognized("countdown time must be HH:MM"),
        },
        None => None,
    };

    for template in [fields.before, fields.after].into_iter().flatten() {
        if validate_template(template).is_err() {
            return Command::unrecognized("countdown template too long");
        }
    }

    let yearly = fields
        .repeat
        .is_some_and(|r| YEARLY_VALUES.contains(&fold(r).as_str()));

    Command::ScheduleCountdown {
        name: name.to_string(),
        date,
        time,
        yearly,
        message_before: fields.before.map(str::to_string),
        message_after: fields.after.map(str::to_string),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    NaiveDate::parse_from_str(&compact, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&compact, "%d.%m.%Y"))
        .ok()
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

/// `key: value` or `key=value` lines whose key is a known field, and the
/// remaining non-empty lines.
fn labeled_fields(body: &str) -> (Vec<(String, String)>, Vec<&str>) {
    let mut fields = Vec::new();
    let mut loose = Vec::new();

    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(split) = line.find([':', '=']) {
            let key = line[..split].trim().to_lowercase();
            if SUBSCRIPTION_FIELDS.contains(&key.as_str()) || CALENDAR_FIELDS.contains(&key.as_str()) {
                let value = line[split + 1..].trim().to_string();
                fields.push((key, value));
                continue;
            }
        }
        loose.push(line);
    }

    (fields, loose)
}

/// Drop quoted lines, signatures and the quoted original of a reply.
pub fn strip_reply_noise(body: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();

    for line in body.lines() {
        let trimmed = line.trim();

        if trimmed == "--" || trimmed.starts_with("-----Original Message") || trimmed.starts_with("Sent from my") {
            break;
        }
        if is_attribution(trimmed) {
            // Clients wrap long attributions: "On Mon, ... <a@b.c>\nwrote:"
            if trimmed.len() <= "napísal(a):".len() {
                if let Some(previous) = kept.last() {
                    if previous.trim_start().starts_with("On ") || previous.trim_start().starts_with("Dňa ") {
                        kept.pop();
                    }
                }
            }
            break;
        }
        if trimmed.starts_with('>') {
            continue;
        }

        kept.push(line);
    }

    kept.join("\n")
}

fn is_attribution(line: &str) -> bool {
    ["wrote:", "napísal:", "napísal(a):", "escribió:"]
        .iter()
        .any(|suffix| line.ends_with(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscribe(location: &str, language: Option<Language>, personality: Option<Personality>) -> Command {
        Command::Subscribe {
            location: location.to_string(),
            personality,
            language,
        }
    }

    #[test]
    fn test_bare_location() {
        assert_eq!(parse("Prague"), subscribe("Prague", None, None));
        assert_eq!(parse("  New York \n"), subscribe("New York", None, None));
    }

    #[test]
    fn test_location_with_modifiers() {
        assert_eq!(
            parse("Bratislava sk cute"),
            subscribe("Bratislava", Some(Language::Sk), Some(Personality::Cute))
        );
        assert_eq!(
            parse("Prague, CZ sk cute"),
            subscribe("Prague, CZ", Some(Language::Sk), Some(Personality::Cute))
        );
    }

    #[test]
    fn test_country_code_after_comma_stays_in_location() {
        assert_eq!(parse("Bratislava, SK"), subscribe("Bratislava, SK", None, None));
        assert_eq!(
            parse("Madrid, ES cute"),
            subscribe("Madrid, ES", None, Some(Personality::Cute))
        );
        assert_eq!(
            parse("Madrid , ES es"),
            subscribe("Madrid, ES", Some(Language::Es), None)
        );
        // Full language names are still languages.
        assert_eq!(
            parse("Madrid, español"),
            subscribe("Madrid", Some(Language::Es), None)
        );
    }

    #[test]
    fn test_natural_language_requests() {
        assert_eq!(
            parse("hello, i want weather for bratislava in slovak with emuska"),
            subscribe("bratislava", Some(Language::Sk), Some(Personality::Emuska))
        );
        assert_eq!(
            parse("please send me weather for Madrid in Spanish"),
            subscribe("Madrid", Some(Language::Es), None)
        );
        assert_eq!(
            parse("I'd like weather forecast for Prague, cute personality"),
            subscribe("Prague", None, Some(Personality::Cute))
        );
        assert_eq!(
            parse("chcem počasie pre Košice po slovensky"),
            subscribe("Košice", Some(Language::Sk), None)
        );
    }

    #[test]
    fn test_order_independence() {
        let expected = subscribe("Bratislava", Some(Language::Sk), Some(Personality::Cute));
        for body in [
            "Bratislava sk cute",
            "sk cute Bratislava",
            "cute Bratislava sk",
            "sk Bratislava cute",
            "cute sk Bratislava",
            "Bratislava cute sk",
        ] {
            assert_eq!(parse(body), expected, "body: {}", body);
        }
    }

    #[test]
    fn test_multi_word_location_keeps_casing_and_comma() {
        assert_eq!(
            parse("please  San José, Costa Rica  español brutal thanks"),
            subscribe("San José, Costa Rica", Some(Language::Es), Some(Personality::Brutal))
        );
        assert_eq!(parse("Prague , CZ"), subscribe("Prague, CZ", None, None));
    }

    #[test]
    fn test_modifiers_without_location() {
        assert_eq!(parse("sk"), Command::SetLanguage { lang: Language::Sk });
        assert_eq!(parse("Harsh"), Command::SetPersonality { mode: Personality::Brutal });
        assert_eq!(
            parse("spanish sweet"),
            Command::UpdatePreferences {
                language: Language::Es,
                personality: Personality::Cute,
            }
        );
    }

    #[test]
    fn test_delete_is_exact_match() {
        assert_eq!(parse("delete"), Command::Unsubscribe);
        assert_eq!(parse(" STOP! "), Command::Unsubscribe);
        assert_eq!(parse("Unsubscribe"), Command::Unsubscribe);
        assert_eq!(parse("delete all countdowns"), Command::DeleteAllCountdowns);
        assert!(matches!(parse("please delete my data"), Command::Subscribe { .. }));
    }

    #[test]
    fn test_legacy_labels() {
        assert_eq!(
            parse("location: Prague\nlanguage: sk"),
            subscribe("Prague", Some(Language::Sk), None)
        );
        assert_eq!(
            parse("Location: Lima, PE\nPersonality: Brutal\nLanguage: Spanish"),
            subscribe("Lima, PE", Some(Language::Es), Some(Personality::Brutal))
        );
        assert_eq!(parse("personality=cute"), Command::SetPersonality { mode: Personality::Cute });
        assert!(matches!(parse("language: klingon"), Command::Unrecognized { .. }));
    }

    #[test]
    fn test_unlabeled_line_next_to_labels_is_the_location() {
        assert_eq!(
            parse("Prague\nlanguage: sk"),
            subscribe("Prague", Some(Language::Sk), None)
        );
        assert_eq!(
            parse("please\nNew York brutal\nlanguage=en"),
            subscribe("New York", Some(Language::En), Some(Personality::Brutal))
        );
        // An explicit label wins over loose text.
        assert_eq!(
            parse("Vienna\nlocation: Graz"),
            subscribe("Graz", None, None)
        );
        assert_eq!(parse("thanks\nlanguage: es"), Command::SetLanguage { lang: Language::Es });
    }

    #[test]
    fn test_calendar_form() {
        let command = parse("date=2025-12-01\ntime=08:30\nmessage=Doctor");
        assert_eq!(
            command,
            Command::ScheduleCountdown {
                name: "Doctor".to_string(),
                date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
                time: NaiveTime::from_hms_opt(8, 30, 0),
                yearly: false,
                message_before: None,
                message_after: None,
            }
        );
    }

    #[test]
    fn test_calendar_yearly_and_dotted_date() {
        match parse("message: Mamine narodeniny\ndate: 24. 12. 2025\nrepeat: yearly") {
            Command::ScheduleCountdown { name, date, yearly, time, .. } => {
                assert_eq!(name, "Mamine narodeniny");
                assert_eq!(date, NaiveDate::from_ymd_opt(2025, 12, 24).unwrap());
                assert!(yearly);
                assert!(time.is_none());
            }
            other => panic!("Expected ScheduleCountdown, got {:?}", other),
        }

        match parse("message=Trip\ndate=2026-03-01\nrepeat=0") {
            Command::ScheduleCountdown { yearly, .. } => assert!(!yearly),
            other => panic!("Expected ScheduleCountdown, got {:?}", other),
        }
    }

    #[test]
    fn test_calendar_templates() {
        match parse("message=Exams\ndate=2026-06-15\nbefore={days} {days_word} of studying left\nafter=Done with {name}!") {
            Command::ScheduleCountdown {
                name,
                message_before,
                message_after,
                ..
            } => {
                assert_eq!(name, "Exams");
                assert_eq!(message_before.as_deref(), Some("{days} {days_word} of studying left"));
                assert_eq!(message_after.as_deref(), Some("Done with {name}!"));
            }
            other => panic!("Expected ScheduleCountdown, got {:?}", other),
        }

        let long = format!("message=Exams\ndate=2026-06-15\nbefore={}", "x".repeat(501));
        assert!(matches!(parse(&long), Command::Unrecognized { .. }));
    }

    #[test]
    fn test_calendar_errors() {
        assert!(matches!(parse("date=2025-12-01"), Command::Unrecognized { .. }));
        assert!(matches!(parse("message=Doctor\ndate=tomorrow"), Command::Unrecognized { .. }));
        assert!(matches!(
            parse("message=Doctor\ndate=2025-12-01\ntime=25:99"),
            Command::Unrecognized { .. }
        ));
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(parse(""), Command::unrecognized(EMPTY));
        assert_eq!(parse("hello thanks"), Command::unrecognized(EMPTY));
        assert!(matches!(
            parse("I was wondering whether you could tell me something about the weather"),
            Command::Unrecognized { .. }
        ));
    }

    #[test]
    fn test_strip_reply_noise() {
        let body = "Vienna\n\n-- \nJana\n";
        assert_eq!(parse(body), subscribe("Vienna", None, None));

        let reply = "cute\n\nOn Mon, 1 Jun 2025 at 05:00, Daily Brief <bot@example.com>\nwrote:\n> Today's weather for Prague";
        assert_eq!(parse(reply), Command::SetPersonality { mode: Personality::Cute });

        let quoted = "> location: Paris\nBerlin";
        assert_eq!(parse(quoted), subscribe("Berlin", None, None));

        assert_eq!(parse("Madrid\nSent from my iPhone"), subscribe("Madrid", None, None));
    }

    #[test]
    fn test_custom_vocabulary() {
        let parser = Parser::new(Vocabulary::default().with_personality("zlatko", Personality::Cute));
        assert_eq!(
            parser.parse("Košice zlatko"),
            subscribe("Košice", None, Some(Personality::Cute))
        );
    }
}
