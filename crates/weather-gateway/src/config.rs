use std::env;
use std::time::Duration;

use crate::WeatherError;

/// Default Open-Meteo geocoding endpoint.
pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

/// Default Open-Meteo forecast endpoint.
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Configuration for the Open-Meteo client.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// Geocoding search endpoint.
    pub geocoding_url: String,
    /// Daily forecast endpoint.
    pub forecast_url: String,
    /// Per-request timeout (default: 15s).
    pub timeout: Duration,
    /// Number of forecast days requested (default: 7).
    pub forecast_days: u8,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            timeout: Duration::from_secs(15),
            forecast_days: 7,
        }
    }
}

impl WeatherConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional (with defaults):
    /// - `GEOCODING_URL` - Default: Open-Meteo geocoding search
    /// - `FORECAST_URL` - Default: Open-Meteo forecast
    /// - `WEATHER_TIMEOUT_SECS` - Default: 15
    pub fn from_env() -> Result<Self, WeatherError> {
        let defaults = Self::default();

        let geocoding_url = env::var("GEOCODING_URL").unwrap_or(defaults.geocoding_url);
        let forecast_url = env::var("FORECAST_URL").unwrap_or(defaults.forecast_url);

        let timeout = match env::var("WEATHER_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(raw.parse::<u64>().map_err(|e| {
                WeatherError::Config(format!("Invalid WEATHER_TIMEOUT_SECS: {}", e))
            })?),
            Err(_) => defaults.timeout,
        };

        Ok(Self {
            geocoding_url,
            forecast_url,
            timeout,
            forecast_days: defaults.forecast_days,
        })
    }

    /// Builder method to set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder method to set the geocoding endpoint.
    pub fn with_geocoding_url(mut self, url: impl Into<String>) -> Self {
        self.geocoding_url = url.into();
        self
    }

    /// Builder method to set the forecast endpoint.
    pub fn with_forecast_url(mut self, url: impl Into<String>) -> Self {
        self.forecast_url = url.into();
        self
    }
}
