use crate::{Config, FetchError, WeatherQuery, WeatherReport, client::openweather::OpenWeatherClient};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// One outbound current-weather lookup per call. Implementations keep no
/// per-request state and never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn current_weather(&self, query: &WeatherQuery) -> Result<WeatherReport, FetchError>;
}

/// Construct the OpenWeather client, honouring a configured base URL override.
pub fn client_from_config(config: &Config) -> Arc<dyn WeatherClient> {
    let client = match config.base_url.as_deref() {
        Some(url) if !url.trim().is_empty() => OpenWeatherClient::with_base_url(url.trim()),
        _ => OpenWeatherClient::new(),
    };

    Arc::new(client)
}
