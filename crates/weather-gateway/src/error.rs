//! Error types for weather lookups.

use thiserror::Error;

/// Errors returned by a [`WeatherProvider`](crate::WeatherProvider).
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Geocoding returned no match.
    #[error("Location not found: {0}")]
    NotFound(String),

    /// Request did not complete within the configured timeout.
    #[error("Weather request timed out")]
    Timeout,

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("Weather API returned status {0}")]
    Status(u16),

    /// Response body did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            WeatherError::Timeout
        } else {
            WeatherError::Http(err)
        }
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        WeatherError::InvalidResponse(err.to_string())
    }
}

impl WeatherError {
    /// Whether retrying later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            WeatherError::Timeout | WeatherError::Http(_) | WeatherError::Status(_)
        )
    }
}

/// Result type for weather operations.
pub type Result<T> = std::result::Result<T, WeatherError>;
