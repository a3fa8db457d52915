//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - The OpenWeather current-weather client and its response mapping
//! - The fetch service that publishes the latest report or error to observers
//! - Configuration and the small `last_city` settings store
//!
//! It is used by `weather-cli`, but any presentation layer can drive
//! [`WeatherService`] and subscribe to its slots.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod service;
pub mod settings;
pub mod slot;

#[cfg(test)]
mod test_support;

pub use client::{WeatherClient, client_from_config, openweather::OpenWeatherClient};
pub use config::{Config, LocationConfig};
pub use error::{FetchError, FetchErrorKind, GENERIC_ERROR_MESSAGE, QueryError};
pub use model::{Units, WeatherQuery, WeatherReport};
pub use service::WeatherService;
pub use settings::Settings;
pub use slot::Slot;
