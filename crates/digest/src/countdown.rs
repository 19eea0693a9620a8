//! Countdown line rendering.
//!
//! Templates may use `{name}`, `{days}` and `{days_word}`. A template without
//! `{days}` gets ": N <days word>" appended.

use chrono::{Datelike, NaiveDate};
use database::CountdownEvent;

use crate::locale::Language;

/// Same month/day in `year`, clamped to the month's last day (Feb 29 → Feb 28).
fn anniversary(date: NaiveDate, year: i32) -> Option<NaiveDate> {
    (0..4)
        .filter_map(|back| date.day().checked_sub(back))
        .find_map(|day| NaiveDate::from_ymd_opt(year, date.month(), day))
}

/// The date the event next falls on, on or after `today` for yearly events.
pub fn next_occurrence(event: &CountdownEvent, today: NaiveDate) -> NaiveDate {
    if !event.yearly {
        return event.date;
    }

    match anniversary(event.date, today.year()) {
        Some(this_year) if this_year >= today => this_year,
        _ => anniversary(event.date, today.year() + 1).unwrap_or(event.date),
    }
}

fn fill(template: &str, name: &str, days: i64, language: Language) -> String {
    let word = language.days_word(days);
    let filled = template
        .replace("{name}", name)
        .replace("{days_word}", word);

    if filled.contains("{days}") {
        filled.replace("{days}", &days.to_string())
    } else {
        format!("{}: {} {}", filled, days, word)
    }
}

/// Render one countdown for `today`, or `None` once it has expired.
pub fn render_countdown(event: &CountdownEvent, today: NaiveDate, language: Language) -> Option<String> {
    let strings = language.strings();
    let target = next_occurrence(event, today);
    let days = (target - today).num_days();

    if days > 0 {
        let template = event
            .message_before
            .as_deref()
            .unwrap_or(strings.countdown_default);
        return Some(fill(template, &event.name, days, language));
    }

    if days == 0 {
        let mut line = strings.countdown_today.replace("{name}", &event.name);
        if let Some(time) = event.time {
            // "X is today!" -> "X is today at 08:30!"
            let at = format!(" {} {}", strings.at_time, time.format("%H:%M"));
            match line.rfind('!') {
                Some(pos) => line.insert_str(pos, &at),
                None => line.push_str(&at),
            }
        }
        return Some(line);
    }

    event
        .message_after
        .as_deref()
        .map(|template| fill(template, &event.name, -days, language))
}

/// Render every live countdown, in the given order.
pub fn render_countdowns(events: &[CountdownEvent], today: NaiveDate, language: Language) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| render_countdown(event, today, language))
        .collect()
}
