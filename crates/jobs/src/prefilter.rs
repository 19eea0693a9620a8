//! Drops automated mail before it reaches the ledger.
//!
//! Replying to bounces, auto-responders or our own mail risks a loop, so
//! anything that looks machine-generated is marked seen and ignored.

use database::validation::{normalize_email, validate_email};
use mail_gateway::InboxMessage;

/// Local parts (or fragments of them) used by mail systems.
const SYSTEM_SENDERS: &[&str] = &["mailer-daemon", "postmaster", "noreply", "no-reply"];

/// Subjects of auto-responders, compared case-insensitively after trimming.
const AUTOMATED_SUBJECTS: &[&str] = &["automated reply", "out of office", "auto reply", "autoreply"];

/// Subject prefixes of delivery status notifications.
const BOUNCE_SUBJECT_PREFIXES: &[&str] = &[
    "undeliverable",
    "undelivered mail",
    "delivery status notification",
    "mail delivery failed",
    "returned mail",
    "failure notice",
];

/// Non-ASCII auto-responder and bounce subjects, which always arrive as
/// RFC 2047 encoded words.
const ENCODED_AUTOMATED_SUBJECTS: &[&str] = &[
    "automatická odpoveď",
    "automatická odpověď",
    "nedoručiteľné",
    "nedoručitelné",
    "mimo kancelárie",
    "respuesta automática",
    "fuera de la oficina",
    "no se puede entregar",
    "réponse automatique",
    "automatische antwort",
    "abwesenheitsnotiz",
    "unzustellbar",
];

const BULK_PRECEDENCE: &[&str] = &["bulk", "list", "junk"];

/// Bodies shorter than this carry no command.
const MIN_BODY_CHARS: usize = 2;

/// Why `message` should be dropped, or `None` when it should be processed.
///
/// `own_address` is the service's mailbox address.
pub fn automated_reason(message: &InboxMessage, own_address: &str) -> Option<&'static str> {
    let Some(from) = message.from.as_deref().map(normalize_email).filter(|f| !f.is_empty()) else {
        return Some("no sender");
    };

    if validate_email(&from).is_err() {
        return Some("invalid sender");
    }
    if from == normalize_email(own_address) {
        return Some("own address");
    }
    if SYSTEM_SENDERS.iter().any(|s| from.contains(s)) {
        return Some("system sender");
    }

    if let Some(value) = message.auto_submitted.as_deref() {
        if !value.trim().eq_ignore_ascii_case("no") {
            return Some("auto-submitted");
        }
    }
    if let Some(value) = message.precedence.as_deref() {
        if BULK_PRECEDENCE.contains(&value.trim().to_lowercase().as_str()) {
            return Some("bulk precedence");
        }
    }
    if message
        .content_type
        .as_deref()
        .is_some_and(|ct| ct == "multipart/report")
    {
        return Some("delivery report");
    }

    let subject = message.subject.trim().to_lowercase();
    if AUTOMATED_SUBJECTS.contains(&subject.as_str()) {
        return Some("auto-reply subject");
    }
    if BOUNCE_SUBJECT_PREFIXES.iter().any(|p| subject.starts_with(p)) {
        return Some("delivery status subject");
    }

    if let Some(reason) = encoded_subject_reason(message) {
        return Some(reason);
    }

    if message.text().trim().chars().count() < MIN_BODY_CHARS {
        return Some("empty body");
    }

    None
}

/// Whether `raw` is an RFC 2047 encoded word: `=?charset?B|Q?text?=`.
fn is_encoded_word(raw: &str) -> bool {
    let Some(inner) = raw.trim().strip_prefix("=?") else {
        return false;
    };
    let mut parts = inner.splitn(3, '?');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(charset), Some(encoding), Some(rest)) => {
            !charset.is_empty()
                && matches!(encoding, "B" | "b" | "Q" | "q")
                && rest.contains("?=")
        }
        _ => false,
    }
}

fn encoded_subject_reason(message: &InboxMessage) -> Option<&'static str> {
    let raw = message.raw_subject.as_deref().filter(|raw| is_encoded_word(raw))?;

    let decoded = message.subject.trim();
    if decoded.is_empty() || decoded.contains("=?") {
        return Some("undecodable subject");
    }

    let decoded = decoded.to_lowercase();
    if ENCODED_AUTOMATED_SUBJECTS.iter().any(|p| decoded.starts_with(p)) {
        tracing::debug!(uid = message.uid, subject = %raw, "Encoded automated subject");
        return Some("encoded automated subject");
    }

    None
}
