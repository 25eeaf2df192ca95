use crate::{
    Config, PlaceCandidate, WeatherQuery, WeatherSnapshot,
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc, time::Duration};
use thiserror::Error;

pub mod openweather;

/// Shown when a failed weather fetch carries no message of its own.
pub const FALLBACK_ERROR_MESSAGE: &str = "City not Found";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("request failed with status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl FetchError {
    /// Text surfaced to the user when a weather fetch fails.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Status { message: Some(message), .. } if !message.trim().is_empty() => {
                message.clone()
            }
            FetchError::Timeout(_) => "Request timed out".to_string(),
            _ => FALLBACK_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Autocomplete endpoint.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn suggest(&self, query: &str, limit: usize) -> Result<Vec<PlaceCandidate>, FetchError>;
}

/// Current-conditions endpoint.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, query: &WeatherQuery) -> Result<WeatherSnapshot, FetchError>;
}

/// The pair of collaborators the runtime talks to.
#[derive(Debug, Clone)]
pub struct Services {
    pub geocoder: Arc<dyn Geocoder>,
    pub weather: Arc<dyn WeatherProvider>,
}

impl Services {
    pub fn new(geocoder: Arc<dyn Geocoder>, weather: Arc<dyn WeatherProvider>) -> Self {
        Self { geocoder, weather }
    }
}

/// Build the OpenWeather-backed services from config, resolving the credential.
pub fn services_from_config(config: &Config) -> anyhow::Result<Services> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
                 Hint: run `skylookup configure` or set {} in the environment.",
            crate::config::API_KEY_ENV
        )
    })?;

    let client = Arc::new(OpenWeatherClient::new(
        api_key.to_owned(),
        config.geocoding_url.clone(),
        config.weather_url.clone(),
        config.timeout(),
    )?);

    Ok(Services::new(client.clone(), client))
}
