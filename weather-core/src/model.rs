use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::QueryError;

const ICON_BASE_URL: &str = "http://openweathermap.org/img/wn";

/// Unit system requested from the provider. Values are passed through as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    /// Symbol for the temperature scale this unit system reports in.
    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
            Units::Standard => "K",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial, Units::Standard]
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            "standard" => Ok(Units::Standard),
            _ => Err(anyhow::anyhow!(
                "Unknown units '{value}'. Supported units: metric, imperial, standard."
            )),
        }
    }
}

/// A single current-weather lookup, either by city name or by coordinates.
#[derive(Clone, PartialEq)]
pub enum WeatherQuery {
    ByCity {
        city: String,
        api_key: String,
        units: Units,
    },
    ByCoordinates {
        latitude: f64,
        longitude: f64,
        api_key: String,
        units: Units,
    },
}

impl WeatherQuery {
    pub fn by_city(city: impl Into<String>, api_key: impl Into<String>) -> Result<Self, QueryError> {
        let city = city.into();
        let city = city.trim();
        if city.is_empty() {
            return Err(QueryError::EmptyCity);
        }

        Ok(WeatherQuery::ByCity {
            city: city.to_string(),
            api_key: api_key.into(),
            units: Units::default(),
        })
    }

    pub fn by_coordinates(
        latitude: f64,
        longitude: f64,
        api_key: impl Into<String>,
    ) -> Result<Self, QueryError> {
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
        if !lat_ok || !lon_ok {
            return Err(QueryError::InvalidCoordinates { latitude, longitude });
        }

        Ok(WeatherQuery::ByCoordinates {
            latitude,
            longitude,
            api_key: api_key.into(),
            units: Units::default(),
        })
    }

    pub fn with_units(mut self, new_units: Units) -> Self {
        match &mut self {
            WeatherQuery::ByCity { units, .. } | WeatherQuery::ByCoordinates { units, .. } => {
                *units = new_units;
            }
        }
        self
    }

    pub fn api_key(&self) -> &str {
        match self {
            WeatherQuery::ByCity { api_key, .. } | WeatherQuery::ByCoordinates { api_key, .. } => {
                api_key
            }
        }
    }

    pub fn units(&self) -> Units {
        match self {
            WeatherQuery::ByCity { units, .. } | WeatherQuery::ByCoordinates { units, .. } => *units,
        }
    }
}

// The api key must never end up in logs.
impl fmt::Debug for WeatherQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherQuery::ByCity { city, units, .. } => f
                .debug_struct("ByCity")
                .field("city", city)
                .field("api_key", &"<redacted>")
                .field("units", units)
                .finish(),
            WeatherQuery::ByCoordinates { latitude, longitude, units, .. } => f
                .debug_struct("ByCoordinates")
                .field("latitude", latitude)
                .field("longitude", longitude)
                .field("api_key", &"<redacted>")
                .field("units", units)
                .finish(),
        }
    }
}

/// Current conditions for one location, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city_name: String,
    /// Celsius under the default metric units.
    pub temperature: f64,
    pub humidity_percent: u8,
    pub description: String,
    /// Opaque provider icon code, e.g. "01d".
    pub icon_id: String,
}

impl WeatherReport {
    pub fn icon_url(&self) -> String {
        format!("{ICON_BASE_URL}/{}.png", self.icon_id)
    }
}
