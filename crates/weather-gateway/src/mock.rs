//! In-memory provider for tests and offline runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::{Result, WeatherError};
use crate::provider::WeatherProvider;
use crate::types::{DailyForecast, Forecast, GeoLocation};

/// A provider answering from fixed tables.
///
/// Lookups are case-insensitive on the full query string. Every coordinate
/// gets the same forecast unless a failure mode is set.
#[derive(Debug, Default)]
pub struct StaticWeather {
    places: HashMap<String, Vec<GeoLocation>>,
    forecast: Option<Forecast>,
    failing_forecast: bool,
    failing_search: bool,
    forecast_calls: AtomicUsize,
}

impl StaticWeather {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a place returned for `query`.
    pub fn with_place(mut self, query: &str, place: GeoLocation) -> Self {
        self.places
            .entry(query.to_lowercase())
            .or_default()
            .push(place);
        self
    }

    /// Forecast returned for every coordinate.
    pub fn with_forecast(mut self, forecast: Forecast) -> Self {
        self.forecast = Some(forecast);
        self
    }

    /// Make every forecast call time out.
    pub fn with_failing_forecast(mut self) -> Self {
        self.failing_forecast = true;
        self
    }

    /// Make every search fail with a server error.
    pub fn with_failing_search(mut self) -> Self {
        self.failing_search = true;
        self
    }

    /// Number of forecast calls made so far.
    pub fn forecast_calls(&self) -> usize {
        self.forecast_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherProvider for StaticWeather {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<GeoLocation>> {
        if self.failing_search {
            return Err(WeatherError::Status(503));
        }
        let mut found = self
            .places
            .get(&query.trim().to_lowercase())
            .cloned()
            .unwrap_or_default();
        found.truncate(limit.max(1));
        Ok(found)
    }

    async fn forecast(&self, _latitude: f64, _longitude: f64, _timezone: &str) -> Result<Forecast> {
        self.forecast_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_forecast {
            return Err(WeatherError::Timeout);
        }
        self.forecast
            .clone()
            .ok_or_else(|| WeatherError::InvalidResponse("no forecast configured".to_string()))
    }
}

/// A place with the given fields and no region.
pub fn place(name: &str, country: &str, code: &str, lat: f64, lon: f64, tz: &str) -> GeoLocation {
    GeoLocation {
        name: name.to_string(),
        latitude: lat,
        longitude: lon,
        country: Some(country.to_string()),
        country_code: Some(code.to_string()),
        admin1: None,
        timezone: Some(tz.to_string()),
    }
}

/// A single-day forecast with the given values.
pub fn single_day(
    date: NaiveDate,
    temp_max: f64,
    temp_min: f64,
    precip_probability: f64,
    precip_sum: f64,
    wind_speed_max: f64,
) -> Forecast {
    Forecast {
        timezone: "UTC".to_string(),
        days: vec![DailyForecast {
            date,
            temp_max,
            temp_min,
            precip_probability,
            precip_sum,
            wind_speed_max,
            weather_code: None,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_geocode_is_case_insensitive() {
        let weather = StaticWeather::new().with_place(
            "Bratislava",
            place("Bratislava", "Slovakia", "SK", 48.15, 17.11, "Europe/Bratislava"),
        );

        let found = weather.geocode("  BRATISLAVA ").await.unwrap();
        assert_eq!(found.name, "Bratislava");

        let missing = weather.geocode("Atlantis").await;
        assert!(matches!(missing, Err(WeatherError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_failing_forecast_counts_calls() {
        let weather = StaticWeather::new().with_failing_forecast();
        assert!(weather.forecast(0.0, 0.0, "UTC").await.is_err());
        assert_eq!(weather.forecast_calls(), 1);
    }
}
