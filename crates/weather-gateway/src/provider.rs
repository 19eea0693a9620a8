use async_trait::async_trait;

use crate::error::{Result, WeatherError};
use crate::types::{Forecast, GeoLocation};

/// Source of geocoding and forecast data.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Search for places matching `query`, best match first.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<GeoLocation>>;

    /// Daily forecast for a coordinate, with dates in `timezone`.
    async fn forecast(&self, latitude: f64, longitude: f64, timezone: &str) -> Result<Forecast>;

    /// Best match for `query`, or [`WeatherError::NotFound`].
    async fn geocode(&self, query: &str) -> Result<GeoLocation> {
        self.search(query, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::NotFound(query.to_string()))
    }
}
