//! Weather section and daily brief assembly.
//!
//! Everything here is a pure function of its arguments; the caller passes
//! the local date.

use chrono::NaiveDate;
use database::CountdownEvent;
use weather_gateway::DailyForecast;

use crate::advice::advice_for;
use crate::catalog::MessageCatalog;
use crate::condition::classify;
use crate::countdown::render_countdowns;
use crate::locale::{Language, Personality};

/// Render the weather section for one day at `location`.
pub fn compose(
    catalog: &MessageCatalog,
    location: &str,
    day: &DailyForecast,
    personality: Personality,
    language: Language,
) -> String {
    let strings = language.strings();
    let condition = classify(day);
    let message = catalog.lookup(language, condition.key(), personality);
    let advice = advice_for(day, personality, language);

    format!(
        "{intro} {location}:\n\
         \n\
         🌡️ {high} {max:.1}°C / {low} {min:.1}°C\n\
         🌧️ {rain}: {prob:.0}% ({sum:.1} mm)\n\
         💨 {wind} {speed:.1} km/h\n\
         \n\
         {message}\n\
         👕 {advice}",
        intro = strings.weather_intro,
        high = strings.high,
        max = day.temp_max,
        low = strings.low,
        min = day.temp_min,
        rain = strings.rain,
        prob = day.precip_probability,
        sum = day.precip_sum,
        wind = strings.wind,
        speed = day.wind_speed_max,
    )
}

/// Inputs for one subscriber's daily brief.
#[derive(Debug, Clone)]
pub struct BriefInput<'a> {
    pub location: &'a str,
    /// `None` when the forecast could not be fetched.
    pub forecast: Option<&'a DailyForecast>,
    pub countdowns: &'a [CountdownEvent],
    pub nameday: Option<String>,
    pub personality: Personality,
    pub language: Language,
    /// The subscriber's local date.
    pub today: NaiveDate,
}

/// A rendered email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyBrief {
    pub subject: String,
    pub body: String,
}

/// Assemble the daily brief: weather, countdowns, name day and footer.
pub fn compose_brief(catalog: &MessageCatalog, input: &BriefInput<'_>) -> DailyBrief {
    let strings = input.language.strings();
    let mut sections = Vec::with_capacity(3);

    sections.push(match input.forecast {
        Some(day) => compose(catalog, input.location, day, input.personality, input.language),
        None => strings
            .weather_unavailable
            .replace("{location}", input.location),
    });

    let lines = render_countdowns(input.countdowns, input.today, input.language);
    if !lines.is_empty() {
        let mut section = String::from(strings.countdown_header);
        for line in lines {
            section.push_str("\n• ");
            section.push_str(&line);
        }
        sections.push(section);
    }

    if let Some(nameday) = &input.nameday {
        sections.push(format!("🎉 {}", nameday));
    }

    let body = format!(
        "{}\n\n---\n{}\n{}",
        sections.join("\n\n"),
        strings.footer_greeting,
        strings.footer_signature
    );

    DailyBrief {
        subject: strings.brief_subject.to_string(),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> DailyForecast {
        DailyForecast {
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            temp_max: 22.4,
            temp_min: 12.0,
            precip_probability: 10.0,
            precip_sum: 0.0,
            wind_speed_max: 11.0,
            weather_code: None,
        }
    }

    #[test]
    fn test_compose_is_deterministic() {
        let catalog = MessageCatalog::builtin();
        let a = compose(&catalog, "Bratislava", &day(), Personality::Cute, Language::Sk);
        let b = compose(&catalog, "Bratislava", &day(), Personality::Cute, Language::Sk);
        assert_eq!(a, b);
    }

    #[test]
    fn test_compose_fields() {
        let catalog = MessageCatalog::builtin();
        let text = compose(&catalog, "Prague", &day(), Personality::Neutral, Language::En);

        assert!(text.starts_with("Today's weather for Prague:"));
        assert!(text.contains("High 22.4°C / Low 12.0°C"));
        assert!(text.contains("Rain: 10% (0.0 mm)"));
        assert!(text.contains("Wind up to 11.0 km/h"));
        assert!(text.contains(catalog.lookup(Language::En, "sunny", Personality::Neutral)));
        assert!(text.ends_with("👕 Dress comfortably."));
    }

    #[test]
    fn test_brief_sections() {
        let catalog = MessageCatalog::builtin();
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let countdowns = vec![CountdownEvent {
            id: 1,
            email: "a@example.com".to_string(),
            name: "Dovolenka".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 6).unwrap(),
            time: None,
            yearly: false,
            message_before: None,
            message_after: None,
            created_at: String::new(),
            updated_at: String::new(),
        }];
        let forecast = day();

        let brief = compose_brief(
            &catalog,
            &BriefInput {
                location: "Bratislava",
                forecast: Some(&forecast),
                countdowns: &countdowns,
                nameday: Some("Meniny má Žaneta".to_string()),
                personality: Personality::Neutral,
                language: Language::Sk,
                today,
            },
        );

        assert_eq!(brief.subject, "Tvoj denný prehľad");
        assert!(brief.body.starts_with("Dnešné počasie pre Bratislava:"));
        assert!(brief.body.contains("⏳ Odpočítavanie:\n• Dni do Dovolenka: 5"));
        assert!(brief.body.contains("🎉 Meniny má Žaneta"));
        assert!(brief.body.ends_with("---\nPekný deň!\nTvoj denný prehľad"));
    }

    #[test]
    fn test_brief_without_forecast() {
        let catalog = MessageCatalog::builtin();
        let brief = compose_brief(
            &catalog,
            &BriefInput {
                location: "Lima",
                forecast: None,
                countdowns: &[],
                nameday: None,
                personality: Personality::Brutal,
                language: Language::En,
                today: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            },
        );
        assert!(brief.body.starts_with("Weather for Lima is unavailable today."));
        assert!(!brief.body.contains("Countdowns"));
    }
}
