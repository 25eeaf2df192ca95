use serde::{Deserialize, Serialize};

/// One autocomplete suggestion returned by the geocoding endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub name: String,
    pub country: String,
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl PlaceCandidate {
    /// `"name, country"`, with `", state"` appended only when a state is known.
    pub fn label(&self) -> String {
        match self.state.as_deref() {
            Some(state) if !state.is_empty() => {
                format!("{}, {}, {}", self.name, self.country, state)
            }
            _ => format!("{}, {}", self.name, self.country),
        }
    }
}

/// How a weather fetch identifies the place.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    /// Free-text submit path.
    ByName(String),
    /// Suggestion path; coordinates disambiguate same-named places.
    ByCoordinates { lat: f64, lon: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Primary classification, e.g. "Clear", "Rain", "Clouds".
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed_mps: f64,
    pub direction_deg: Option<f64>,
}

/// Result of one successful current-weather fetch. Replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub place_name: String,
    pub country: Option<String>,
    pub conditions: Vec<Condition>,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: f64,
    pub pressure_hpa: f64,
    pub wind: Wind,
    pub visibility_m: Option<f64>,
    pub sunrise: i64,
    pub sunset: i64,
    pub timezone_offset_secs: i32,
}

impl WeatherSnapshot {
    pub fn primary_condition(&self) -> Option<&Condition> {
        self.conditions.first()
    }
}
