use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    error::FetchError,
    model::{WeatherQuery, WeatherReport},
};

use super::WeatherClient;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// OpenWeather current-weather endpoint client.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for OpenWeatherClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn current_weather(&self, query: &WeatherQuery) -> Result<WeatherReport, FetchError> {
        let res = self
            .http
            .get(&self.base_url)
            .query(&query_params(query))
            .send()
            .await
            .map_err(|e| {
                FetchError::network(format!(
                    "Failed to send request to OpenWeather: {}",
                    e.without_url()
                ))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            FetchError::network(format!(
                "Failed to read OpenWeather response body: {}",
                e.without_url()
            ))
        })?;
        debug!(%status, bytes = body.len(), "OpenWeather responded");

        if !status.is_success() {
            return Err(FetchError::decode(format!(
                "OpenWeather request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        parse_current(&body)
    }
}

fn query_params(query: &WeatherQuery) -> Vec<(&'static str, String)> {
    let mut params = match query {
        WeatherQuery::ByCity { city, .. } => vec![("q", city.clone())],
        WeatherQuery::ByCoordinates { latitude, longitude, .. } => {
            vec![("lat", latitude.to_string()), ("lon", longitude.to_string())]
        }
    };
    params.push(("appid", query.api_key().to_string()));
    params.push(("units", query.units().as_str().to_string()));
    params
}

/// Map a current-weather JSON body onto a report.
pub fn parse_current(body: &str) -> Result<WeatherReport, FetchError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::decode(format!("Failed to parse OpenWeather JSON: {e}")))?;

    WeatherReport::try_from(parsed)
}

#[derive(Debug, Serialize, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

impl TryFrom<OwCurrentResponse> for WeatherReport {
    type Error = FetchError;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self, Self::Error> {
        let humidity = parsed.main.humidity;
        if humidity.fract() != 0.0 || !(0.0..=100.0).contains(&humidity) {
            return Err(FetchError::decode(format!(
                "OpenWeather humidity is not a percentage: {humidity}"
            )));
        }

        let condition = parsed
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::decode("OpenWeather response contained no weather conditions"))?;

        Ok(WeatherReport {
            city_name: parsed.name,
            temperature: parsed.main.temp,
            humidity_percent: humidity as u8,
            description: condition.description,
            icon_id: condition.icon,
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
