use serde::{Deserialize, Serialize};
use serde_json::Value;
use skycast_core::AppError;

/// Current-conditions document returned by the provider, kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherPayload(Value);

impl WeatherPayload {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    /// The raw JSON document
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Place name resolved by the provider (`name` field), if any
    pub fn city_name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// First condition description, e.g. "light rain"
    pub fn description(&self) -> Option<&str> {
        self.0
            .get("weather")
            .and_then(|w| w.get(0))
            .and_then(|w| w.get("description"))
            .and_then(Value::as_str)
    }
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("Location not found: {0}")]
    LocationNotFound(String),
    #[error("Weather API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<WeatherError> for AppError {
    fn from(err: WeatherError) -> Self {
        AppError::WeatherLookup(err.to_string())
    }
}
