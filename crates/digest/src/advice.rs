//! Clothing advice.
//!
//! Uses its own thresholds, independent of the condition classifier.

use weather_gateway::DailyForecast;

use crate::locale::{Language, Personality};

/// Below this maximum temperature a jacket is suggested.
const JACKET_BELOW_C: f64 = 5.0;
/// Above this maximum temperature light clothing is suggested.
const LIGHT_ABOVE_C: f64 = 28.0;
/// Precipitation sum (mm) above which an umbrella is suggested.
const UMBRELLA_ABOVE_MM: f64 = 2.0;
/// Precipitation probability (%) at or above which an umbrella is suggested.
const UMBRELLA_PROBABILITY: f64 = 70.0;
/// Wind speed (km/h) above which a windbreaker is suggested.
const WINDBREAKER_ABOVE_KMH: f64 = 20.0;

/// Build the advice line from raw values.
pub fn clothing_advice(
    temp_max: f64,
    precip_probability: f64,
    precip_sum: f64,
    wind_speed: f64,
    personality: Personality,
    language: Language,
) -> String {
    let strings = language.strings();
    let mut clauses = Vec::with_capacity(4);

    if temp_max < JACKET_BELOW_C {
        clauses.push(strings.advice_jacket);
    } else if temp_max > LIGHT_ABOVE_C {
        clauses.push(strings.advice_light);
    } else {
        clauses.push(strings.advice_comfortable);
    }

    if precip_sum > UMBRELLA_ABOVE_MM || precip_probability >= UMBRELLA_PROBABILITY {
        clauses.push(strings.advice_umbrella);
    }

    if wind_speed > WINDBREAKER_ABOVE_KMH {
        clauses.push(strings.advice_windbreaker);
    }

    match personality.effective(language) {
        Personality::Neutral => {}
        Personality::Cute => clauses.push(strings.flair_cute),
        Personality::Brutal => clauses.push(strings.flair_brutal),
        Personality::Emuska => clauses.push(strings.flair_emuska),
    }

    clauses.join(" ")
}

/// Advice for a forecast day.
pub fn advice_for(day: &DailyForecast, personality: Personality, language: Language) -> String {
    clothing_advice(
        day.temp_max,
        day.precip_probability,
        day.precip_sum,
        day.wind_speed_max,
        personality,
        language,
    )
}
