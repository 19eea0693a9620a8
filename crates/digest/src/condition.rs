//! Dominant weather condition classification.
//!
//! Conditions are checked in a fixed order, severe first, and the first
//! match wins:
//!
//! thunderstorm > blizzard > heatwave > cold_windy > freezing > heavy_rain >
//! snowing > rainy_cold > raining > windy > sunny_hot > hot > cold > foggy >
//! humid > sunny > dry > mild > cloudy > default

use weather_gateway::DailyForecast;

/// Condition keys, matching the message catalog's first column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Thunderstorm,
    Blizzard,
    Heatwave,
    ColdWindy,
    Freezing,
    HeavyRain,
    Snowing,
    RainyCold,
    Raining,
    Windy,
    SunnyHot,
    Hot,
    Cold,
    Foggy,
    Humid,
    Sunny,
    Dry,
    Mild,
    Cloudy,
    Default,
}

impl Condition {
    pub const ALL: [Condition; 20] = [
        Condition::Thunderstorm,
        Condition::Blizzard,
        Condition::Heatwave,
        Condition::ColdWindy,
        Condition::Freezing,
        Condition::HeavyRain,
        Condition::Snowing,
        Condition::RainyCold,
        Condition::Raining,
        Condition::Windy,
        Condition::SunnyHot,
        Condition::Hot,
        Condition::Cold,
        Condition::Foggy,
        Condition::Humid,
        Condition::Sunny,
        Condition::Dry,
        Condition::Mild,
        Condition::Cloudy,
        Condition::Default,
    ];

    /// Catalog key.
    pub fn key(&self) -> &'static str {
        match self {
            Condition::Thunderstorm => "thunderstorm",
            Condition::Blizzard => "blizzard",
            Condition::Heatwave => "heatwave",
            Condition::ColdWindy => "cold_windy",
            Condition::Freezing => "freezing",
            Condition::HeavyRain => "heavy_rain",
            Condition::Snowing => "snowing",
            Condition::RainyCold => "rainy_cold",
            Condition::Raining => "raining",
            Condition::Windy => "windy",
            Condition::SunnyHot => "sunny_hot",
            Condition::Hot => "hot",
            Condition::Cold => "cold",
            Condition::Foggy => "foggy",
            Condition::Humid => "humid",
            Condition::Sunny => "sunny",
            Condition::Dry => "dry",
            Condition::Mild => "mild",
            Condition::Cloudy => "cloudy",
            Condition::Default => "default",
        }
    }
}

/// WMO codes 95-99 are thunderstorms.
fn is_thunder_code(code: Option<i32>) -> bool {
    matches!(code, Some(95..=99))
}

/// Classify the dominant condition for one day.
pub fn classify(day: &DailyForecast) -> Condition {
    let max = day.temp_max;
    let min = day.temp_min;
    let prob = day.precip_probability;
    let sum = day.precip_sum;
    let wind = day.wind_speed_max;

    if is_thunder_code(day.weather_code) || (sum >= 10.0 && prob >= 70.0) {
        Condition::Thunderstorm
    } else if min <= -15.0 || (max <= 0.0 && sum >= 5.0 && wind >= 40.0) {
        Condition::Blizzard
    } else if max >= 35.0 {
        Condition::Heatwave
    } else if max <= 5.0 && wind >= 40.0 {
        Condition::ColdWindy
    } else if min < 0.0 && sum <= 0.1 {
        Condition::Freezing
    } else if sum >= 7.0 {
        Condition::HeavyRain
    } else if max <= 2.0 && sum > 0.5 {
        Condition::Snowing
    } else if max <= 5.0 && prob >= 60.0 && sum >= 1.0 {
        Condition::RainyCold
    } else if prob >= 60.0 && sum >= 1.0 {
        Condition::Raining
    } else if wind >= 40.0 {
        Condition::Windy
    } else if max >= 30.0 && prob < 20.0 {
        Condition::SunnyHot
    } else if max >= 30.0 {
        Condition::Hot
    } else if max <= 5.0 {
        Condition::Cold
    } else if min >= -2.0 && max <= 8.0 && sum < 0.2 && wind < 8.0 && prob >= 60.0 {
        Condition::Foggy
    } else if prob >= 70.0 && sum < 0.2 {
        Condition::Humid
    } else if max >= 20.0 && prob < 20.0 && sum < 0.1 {
        Condition::Sunny
    } else if max >= 25.0 && sum < 0.05 {
        Condition::Dry
    } else if max >= 10.0 && prob < 40.0 && sum < 0.2 {
        Condition::Mild
    } else if prob >= 30.0 || sum > 0.05 {
        Condition::Cloudy
    } else {
        Condition::Default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(max: f64, min: f64, prob: f64, sum: f64, wind: f64) -> DailyForecast {
        DailyForecast {
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            temp_max: max,
            temp_min: min,
            precip_probability: prob,
            precip_sum: sum,
            wind_speed_max: wind,
            weather_code: None,
        }
    }

    #[test]
    fn test_heatwave_beats_rain() {
        assert_eq!(classify(&day(37.0, 24.0, 80.0, 3.0, 10.0)), Condition::Heatwave);
    }

    #[test]
    fn test_thunderstorm_beats_heatwave() {
        assert_eq!(classify(&day(36.0, 24.0, 90.0, 15.0, 10.0)), Condition::Thunderstorm);

        let mut coded = day(22.0, 15.0, 10.0, 0.0, 5.0);
        coded.weather_code = Some(95);
        assert_eq!(classify(&coded), Condition::Thunderstorm);
    }

    #[test]
    fn test_rain_thresholds() {
        assert_eq!(classify(&day(15.0, 8.0, 60.0, 1.0, 10.0)), Condition::Raining);
        assert_eq!(classify(&day(15.0, 8.0, 59.0, 1.0, 10.0)), Condition::Cloudy);
        assert_eq!(classify(&day(15.0, 8.0, 50.0, 8.0, 10.0)), Condition::HeavyRain);
        assert_eq!(classify(&day(4.0, 1.0, 70.0, 2.0, 10.0)), Condition::RainyCold);
    }

    #[test]
    fn test_cold_and_wind() {
        assert_eq!(classify(&day(3.0, 1.0, 0.0, 0.0, 45.0)), Condition::ColdWindy);
        assert_eq!(classify(&day(15.0, 8.0, 0.0, 0.0, 45.0)), Condition::Windy);
        assert_eq!(classify(&day(3.0, -4.0, 0.0, 0.0, 10.0)), Condition::Freezing);
        assert_eq!(classify(&day(1.0, -1.0, 80.0, 2.0, 10.0)), Condition::Snowing);
        assert_eq!(classify(&day(-5.0, -18.0, 0.0, 0.0, 10.0)), Condition::Blizzard);
    }

    #[test]
    fn test_fair_weather() {
        assert_eq!(classify(&day(32.0, 20.0, 5.0, 0.0, 10.0)), Condition::SunnyHot);
        assert_eq!(classify(&day(32.0, 20.0, 25.0, 0.0, 10.0)), Condition::Hot);
        assert_eq!(classify(&day(22.0, 12.0, 5.0, 0.0, 10.0)), Condition::Sunny);
        assert_eq!(classify(&day(26.0, 14.0, 25.0, 0.0, 10.0)), Condition::Dry);
        assert_eq!(classify(&day(14.0, 8.0, 20.0, 0.0, 10.0)), Condition::Mild);
    }

    #[test]
    fn test_every_condition_has_a_distinct_key() {
        let mut keys: Vec<_> = Condition::ALL.iter().map(|c| c.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), Condition::ALL.len());
    }
}
