use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::model::{Condition, PlaceCandidate, WeatherQuery, WeatherSnapshot, Wind};

use super::{FetchError, Geocoder, WeatherProvider};

/// OpenWeather client serving both the geocoding and current-weather endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    geocoding_url: String,
    weather_url: String,
    timeout: Duration,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(
        api_key: String,
        geocoding_url: String,
        weather_url: String,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self { api_key, geocoding_url, weather_url, timeout, http })
    }

    fn transport_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Transport(err.to_string())
        }
    }

    /// Read the body, turning non-success statuses into `FetchError::Status`
    /// carrying the payload's `message` field when there is one.
    async fn read_json<T: DeserializeOwned>(&self, res: Response, what: &str) -> Result<T, FetchError> {
        let status = res.status();
        let body = res.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            debug!(%status, body = %truncate_body(&body), "OpenWeather {what} request failed");
            let message = serde_json::from_str::<OwError>(&body).ok().and_then(|e| e.message);
            return Err(FetchError::Status { status: status.as_u16(), message });
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, "Failed to parse OpenWeather {what} JSON");
            FetchError::Decode(e.to_string())
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwError {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwPlace {
    name: String,
    #[serde(default)]
    country: String,
    state: Option<String>,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    pressure: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    #[serde(default)]
    weather: Vec<OwWeather>,
    main: OwMain,
    wind: OwWind,
    visibility: Option<f64>,
    sys: OwSys,
    #[serde(default)]
    timezone: i32,
}

impl From<OwPlace> for PlaceCandidate {
    fn from(place: OwPlace) -> Self {
        PlaceCandidate {
            name: place.name,
            country: place.country,
            state: place.state,
            lat: place.lat,
            lon: place.lon,
        }
    }
}

impl From<OwCurrentResponse> for WeatherSnapshot {
    fn from(parsed: OwCurrentResponse) -> Self {
        let conditions = parsed
            .weather
            .into_iter()
            .map(|w| Condition { main: w.main, description: w.description, icon: w.icon })
            .collect();

        WeatherSnapshot {
            place_name: parsed.name,
            country: parsed.sys.country,
            conditions,
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            pressure_hpa: parsed.main.pressure,
            wind: Wind { speed_mps: parsed.wind.speed, direction_deg: parsed.wind.deg },
            visibility_m: parsed.visibility,
            sunrise: parsed.sys.sunrise,
            sunset: parsed.sys.sunset,
            timezone_offset_secs: parsed.timezone,
        }
    }
}

#[async_trait]
impl Geocoder for OpenWeatherClient {
    async fn suggest(&self, query: &str, limit: usize) -> Result<Vec<PlaceCandidate>, FetchError> {
        let limit = limit.to_string();

        let res = self
            .http
            .get(&self.geocoding_url)
            .query(&[("q", query), ("limit", limit.as_str()), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let places: Vec<OwPlace> = self.read_json(res, "geocoding").await?;
        debug!(query, count = places.len(), "Geocoding returned candidates");

        Ok(places.into_iter().map(PlaceCandidate::from).collect())
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current(&self, query: &WeatherQuery) -> Result<WeatherSnapshot, FetchError> {
        let mut params: Vec<(&str, String)> = match query {
            WeatherQuery::ByName(name) => vec![("q", name.clone())],
            WeatherQuery::ByCoordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        };
        params.push(("appid", self.api_key.clone()));
        params.push(("units", "metric".to_string()));

        let res = self
            .http
            .get(&self.weather_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let parsed: OwCurrentResponse = self.read_json(res, "current weather").await?;
        info!(place = %parsed.name, "Current weather loaded");

        Ok(parsed.into())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
