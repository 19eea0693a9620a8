//! Weather data gateway.
//!
//! Wraps geocoding and daily forecast lookups behind the [`WeatherProvider`]
//! trait. [`OpenMeteo`] talks to the public Open-Meteo API; [`StaticWeather`]
//! answers from fixed tables for tests.
//!
//! # Example
//!
//! ```no_run
//! use weather_gateway::{OpenMeteo, WeatherConfig, WeatherProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), weather_gateway::WeatherError> {
//!     let client = OpenMeteo::new(WeatherConfig::from_env()?)?;
//!     let place = client.geocode("Bratislava").await?;
//!     let forecast = client
//!         .forecast(place.latitude, place.longitude, "Europe/Bratislava")
//!         .await?;
//!     println!("{}: {:?}", place.display_name(), forecast.today());
//!     Ok(())
//! }
//! ```

mod config;
mod error;
pub mod mock;
mod open_meteo;
mod provider;
mod types;

pub use config::{WeatherConfig, DEFAULT_FORECAST_URL, DEFAULT_GEOCODING_URL};
pub use error::{Result, WeatherError};
pub use mock::StaticWeather;
pub use open_meteo::OpenMeteo;
pub use provider::WeatherProvider;
pub use types::{DailyForecast, Forecast, GeoLocation};
