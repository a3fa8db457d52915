use thiserror::Error;

/// Message shown to users for any failed fetch, regardless of its kind.
pub const GENERIC_ERROR_MESSAGE: &str = "Error fetching weather data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    NetworkFailure,
    DecodeFailure,
    Unknown,
}

/// Why a single fetch failed. Each failure is terminal for its request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network failure: {}", .0.as_deref().unwrap_or("no details"))]
    NetworkFailure(Option<String>),
    #[error("unexpected response: {}", .0.as_deref().unwrap_or("no details"))]
    DecodeFailure(Option<String>),
    #[error("unknown error: {}", .0.as_deref().unwrap_or("no details"))]
    Unknown(Option<String>),
}

impl FetchError {
    pub fn network(message: impl Into<String>) -> Self {
        FetchError::NetworkFailure(Some(message.into()))
    }

    pub fn decode(message: impl Into<String>) -> Self {
        FetchError::DecodeFailure(Some(message.into()))
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        FetchError::Unknown(Some(message.into()))
    }

    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::NetworkFailure(_) => FetchErrorKind::NetworkFailure,
            FetchError::DecodeFailure(_) => FetchErrorKind::DecodeFailure,
            FetchError::Unknown(_) => FetchErrorKind::Unknown,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            FetchError::NetworkFailure(m) | FetchError::DecodeFailure(m) | FetchError::Unknown(m) => {
                m.as_deref()
            }
        }
    }

    pub fn user_message(&self) -> &'static str {
        GENERIC_ERROR_MESSAGE
    }
}

/// A query that cannot be sent at all.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("city name must not be empty")]
    EmptyCity,
    #[error("coordinates out of range: lat={latitude}, lon={longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

impl From<QueryError> for FetchError {
    fn from(err: QueryError) -> Self {
        FetchError::unknown(err.to_string())
    }
}
