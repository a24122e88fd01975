use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use skycast_core::WeatherConfig;
use std::sync::Arc;
use std::time::Duration;

use crate::types::{WeatherError, WeatherPayload};

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";
const USER_AGENT: &str = concat!("skycast/", env!("CARGO_PKG_VERSION"));

/// Anything that can answer "what is the weather at this location".
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<WeatherPayload, WeatherError>;
}

/// OpenWeatherMap current-conditions client.
///
/// One request per lookup; nothing is cached or retried.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    endpoint: String,
    api_key: String,
}

impl WeatherProvider {
    pub fn new(
        api_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            endpoint: format!("{}{}", api_url.trim_end_matches('/'), CURRENT_WEATHER_PATH),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &WeatherConfig) -> Result<Self, WeatherError> {
        Self::new(&config.api_url, config.api_key.clone(), config.timeout())
    }
}

#[async_trait]
impl WeatherSource for WeatherProvider {
    async fn fetch(&self, location: &str) -> Result<WeatherPayload, WeatherError> {
        tracing::debug!("Fetching current weather for {:?}", location);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", location), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED => return Err(WeatherError::InvalidApiKey),
            StatusCode::NOT_FOUND => {
                return Err(WeatherError::LocationNotFound(location.to_string()))
            }
            s if !s.is_success() => {
                let message = response.text().await.unwrap_or_default();
                return Err(WeatherError::Api {
                    status: s.as_u16(),
                    message,
                });
            }
            _ => {}
        }

        let body = response.text().await?;
        let raw: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))?;
        let payload = WeatherPayload::new(raw);

        tracing::info!(
            "Weather for {:?}: {}",
            payload.city_name().unwrap_or(location),
            payload.description().unwrap_or("no description")
        );
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url() {
        let provider =
            WeatherProvider::new("https://api.example.com/", "key", Duration::from_secs(1)).unwrap();
        assert_eq!(provider.endpoint, "https://api.example.com/data/2.5/weather");
    }

    #[test]
    fn test_from_config() {
        let config = WeatherConfig {
            api_key: "abc".to_string(),
            ..WeatherConfig::default()
        };
        let provider = WeatherProvider::from_config(&config).unwrap();
        assert_eq!(provider.api_key, "abc");
        assert!(provider.endpoint.starts_with("https://api.openweathermap.org"));
    }
}
