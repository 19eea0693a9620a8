//! Open-Meteo implementation of [`WeatherProvider`].
//!
//! Both endpoints are free and need no API key.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::WeatherConfig;
use crate::error::{Result, WeatherError};
use crate::provider::WeatherProvider;
use crate::types::{DailyForecast, Forecast, GeoLocation};

const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum,\
                            precipitation_probability_max,wind_speed_10m_max,weather_code";

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeocodingResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    country_code: Option<String>,
    admin1: Option<String>,
    timezone: Option<String>,
}

impl From<GeocodingResult> for GeoLocation {
    fn from(r: GeocodingResult) -> Self {
        GeoLocation {
            name: r.name,
            latitude: r.latitude,
            longitude: r.longitude,
            country: r.country,
            country_code: r.country_code.map(|c| c.to_uppercase()),
            admin1: r.admin1,
            timezone: r.timezone,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    timezone: Option<String>,
    daily: DailySeries,
}

#[derive(Debug, Deserialize)]
struct DailySeries {
    time: Vec<String>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_probability_max: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m_max: Vec<Option<f64>>,
    #[serde(default)]
    weather_code: Vec<Option<i32>>,
}

/// Open-Meteo weather client.
pub struct OpenMeteo {
    client: reqwest::Client,
    config: WeatherConfig,
}

impl OpenMeteo {
    /// Create a client with the given configuration.
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("daily-brief/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteo {
    #[instrument(skip(self), fields(provider = "open-meteo"))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<GeoLocation>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WeatherError::NotFound(String::new()));
        }

        debug!("Geocoding '{}'", query);

        let response: GeocodingResponse = self
            .get_json(
                &self.config.geocoding_url,
                &[
                    ("name", query.to_string()),
                    ("count", limit.max(1).to_string()),
                    ("format", "json".to_string()),
                ],
            )
            .await?;

        Ok(response.results.into_iter().map(GeoLocation::from).collect())
    }

    #[instrument(skip(self), fields(provider = "open-meteo"))]
    async fn forecast(&self, latitude: f64, longitude: f64, timezone: &str) -> Result<Forecast> {
        let timezone = if timezone.trim().is_empty() {
            "auto"
        } else {
            timezone
        };

        let response: ForecastResponse = self
            .get_json(
                &self.config.forecast_url,
                &[
                    ("latitude", latitude.to_string()),
                    ("longitude", longitude.to_string()),
                    ("daily", DAILY_FIELDS.to_string()),
                    ("timezone", timezone.to_string()),
                    ("forecast_days", self.config.forecast_days.to_string()),
                ],
            )
            .await?;

        let forecast = into_forecast(response, timezone)?;
        if forecast.days.is_empty() {
            warn!("Forecast response had no daily rows");
            return Err(WeatherError::InvalidResponse("no daily data".to_string()));
        }

        Ok(forecast)
    }
}

fn value_at<T: Copy>(series: &[Option<T>], i: usize) -> Option<T> {
    series.get(i).copied().flatten()
}

fn into_forecast(response: ForecastResponse, requested_tz: &str) -> Result<Forecast> {
    let daily = response.daily;
    let mut days = Vec::with_capacity(daily.time.len());

    for (i, raw_date) in daily.time.iter().enumerate() {
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
            .map_err(|e| WeatherError::InvalidResponse(format!("bad date '{}': {}", raw_date, e)))?;

        // Temperatures are the minimum a usable day needs; the rest default to 0.
        let (Some(temp_max), Some(temp_min)) = (
            value_at(&daily.temperature_2m_max, i),
            value_at(&daily.temperature_2m_min, i),
        ) else {
            return Err(WeatherError::InvalidResponse(format!(
                "missing temperature for {}",
                raw_date
            )));
        };

        days.push(DailyForecast {
            date,
            temp_max,
            temp_min,
            precip_probability: value_at(&daily.precipitation_probability_max, i).unwrap_or(0.0),
            precip_sum: value_at(&daily.precipitation_sum, i).unwrap_or(0.0),
            wind_speed_max: value_at(&daily.wind_speed_10m_max, i).unwrap_or(0.0),
            weather_code: value_at(&daily.weather_code, i),
        });
    }

    Ok(Forecast {
        timezone: response
            .timezone
            .unwrap_or_else(|| requested_tz.to_string()),
        days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORECAST_JSON: &str = r#"{
        "latitude": 48.14,
        "longitude": 17.1,
        "timezone": "Europe/Bratislava",
        "daily": {
            "time": ["2025-06-01", "2025-06-02"],
            "temperature_2m_max": [24.3, 18.0],
            "temperature_2m_min": [13.1, 11.4],
            "precipitation_sum": [0.0, 4.2],
            "precipitation_probability_max": [10, null],
            "wind_speed_10m_max": [12.5, 30.1],
            "weather_code": [1, 61]
        }
    }"#;

    #[test]
    fn test_into_forecast() {
        let response: ForecastResponse = serde_json::from_str(FORECAST_JSON).unwrap();
        let forecast = into_forecast(response, "auto").unwrap();

        assert_eq!(forecast.timezone, "Europe/Bratislava");
        assert_eq!(forecast.days.len(), 2);

        let today = forecast.today().unwrap();
        assert_eq!(today.date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(today.temp_max, 24.3);
        assert_eq!(today.precip_probability, 10.0);
        assert_eq!(today.weather_code, Some(1));

        // Null probability falls back to zero.
        assert_eq!(forecast.days[1].precip_probability, 0.0);
        assert_eq!(forecast.days[1].precip_sum, 4.2);
    }

    #[test]
    fn test_missing_temperature_is_invalid() {
        let json = r#"{
            "daily": {
                "time": ["2025-06-01"],
                "temperature_2m_max": [null],
                "temperature_2m_min": [10.0]
            }
        }"#;
        let response: ForecastResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            into_forecast(response, "UTC"),
            Err(WeatherError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_geocoding_without_results() {
        // Open-Meteo omits `results` entirely when nothing matches.
        let response: GeocodingResponse = serde_json::from_str(r#"{"generationtime_ms": 0.5}"#).unwrap();
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_geocoding_result_conversion() {
        let json = r#"{"results": [{
            "id": 3060972, "name": "Bratislava", "latitude": 48.14816, "longitude": 17.10674,
            "country_code": "sk", "country": "Slovakia", "admin1": "Bratislava Region",
            "timezone": "Europe/Bratislava"
        }]}"#;
        let response: GeocodingResponse = serde_json::from_str(json).unwrap();
        let location: GeoLocation = response.results.into_iter().next().unwrap().into();

        assert_eq!(location.country_code.as_deref(), Some("SK"));
        assert_eq!(location.display_name(), "Bratislava, Slovakia");
        assert!(location.matches_country("sk"));
        assert!(location.matches_country("slovakia"));
        assert!(!location.matches_country("CZ"));
    }

    #[tokio::test]
    #[ignore] // Run with: cargo test -- --ignored
    async fn test_live_geocode_and_forecast() {
        let client = OpenMeteo::new(WeatherConfig::default()).unwrap();
        let place = client.geocode("Bratislava").await.unwrap();
        assert_eq!(place.country_code.as_deref(), Some("SK"));

        let forecast = client
            .forecast(place.latitude, place.longitude, "Europe/Bratislava")
            .await
            .unwrap();
        assert_eq!(forecast.days.len(), 7);
    }
}
