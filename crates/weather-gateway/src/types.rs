//! Geocoding and forecast value types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A geocoded place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
    /// ISO 3166-1 alpha-2 code, upper case.
    pub country_code: Option<String>,
    /// First-level administrative region.
    pub admin1: Option<String>,
    /// IANA timezone of the place.
    pub timezone: Option<String>,
}

impl GeoLocation {
    /// Human-readable name, e.g. "Bratislava, Slovakia".
    pub fn display_name(&self) -> String {
        match &self.country {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }

    /// Whether `hint` names this place's country, by code or by name.
    pub fn matches_country(&self, hint: &str) -> bool {
        let hint = hint.trim();
        if hint.is_empty() {
            return false;
        }
        let code = self
            .country_code
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(hint));
        let name = self
            .country
            .as_deref()
            .is_some_and(|c| c.to_lowercase() == hint.to_lowercase());
        code || name
    }
}

/// One day of forecast values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    /// Maximum temperature in °C.
    pub temp_max: f64,
    /// Minimum temperature in °C.
    pub temp_min: f64,
    /// Maximum precipitation probability in percent.
    pub precip_probability: f64,
    /// Precipitation sum in mm.
    pub precip_sum: f64,
    /// Maximum wind speed at 10 m in km/h.
    pub wind_speed_max: f64,
    /// WMO weather interpretation code.
    pub weather_code: Option<i32>,
}

/// A multi-day daily forecast, first entry is today in the requested timezone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub timezone: String,
    pub days: Vec<DailyForecast>,
}

impl Forecast {
    /// Today's values.
    pub fn today(&self) -> Option<&DailyForecast> {
        self.days.first()
    }
}
