//! Display strings for result mode.

use chrono::{DateTime, FixedOffset};

use crate::{
    classify::{classify_humidity, classify_visibility},
    model::WeatherSnapshot,
    state::AppState,
    units::{DisplayUnit, display},
};

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";
const COMPASS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub label: String,
    pub temperature: String,
    pub feels_like: String,
    pub description: String,
    pub icon_url: Option<String>,
    pub humidity: String,
    pub wind: String,
    pub visibility: String,
    pub sunrise: String,
    pub sunset: String,
    pub pressure: String,
}

/// `None` unless a snapshot is loaded.
pub fn result_view(state: &AppState) -> Option<ResultView> {
    let snapshot = state.snapshot()?;
    let label = state.label().unwrap_or(&snapshot.place_name);
    Some(build(snapshot, label, state.unit))
}

pub fn build(snapshot: &WeatherSnapshot, label: &str, unit: DisplayUnit) -> ResultView {
    let primary = snapshot.primary_condition();

    ResultView {
        label: label.to_string(),
        temperature: format!("{} {}", display(snapshot.temperature_c, unit), unit.symbol()),
        feels_like: format!("{} {}", display(snapshot.feels_like_c, unit), unit.symbol()),
        description: primary.map(|c| c.description.clone()).unwrap_or_default(),
        icon_url: primary.map(|c| format!("{ICON_BASE_URL}/{}@2x.png", c.icon)),
        humidity: format!(
            "{}% ({})",
            snapshot.humidity_pct,
            classify_humidity(snapshot.humidity_pct)
        ),
        wind: wind_text(snapshot.wind.speed_mps, snapshot.wind.direction_deg),
        // A missing visibility reading is treated as 0 m.
        visibility: classify_visibility(snapshot.visibility_m.unwrap_or(0.0)).to_string(),
        sunrise: clock(snapshot.sunrise, snapshot.timezone_offset_secs),
        sunset: clock(snapshot.sunset, snapshot.timezone_offset_secs),
        pressure: format!("{} hPa", snapshot.pressure_hpa),
    }
}

fn wind_text(speed_mps: f64, direction_deg: Option<f64>) -> String {
    match direction_deg {
        Some(deg) => format!("{speed_mps} m/s {}", compass_point(deg)),
        None => format!("{speed_mps} m/s"),
    }
}

pub fn compass_point(deg: f64) -> &'static str {
    let index = ((deg.rem_euclid(360.0) + 22.5) / 45.0) as usize % COMPASS.len();
    COMPASS[index]
}

/// `HH:MM` at the place's own UTC offset.
pub fn clock(epoch: i64, offset_secs: i32) -> String {
    let Some(offset) = FixedOffset::east_opt(offset_secs) else {
        return "--:--".to_string();
    };

    DateTime::from_timestamp(epoch, 0)
        .map(|dt| dt.with_timezone(&offset).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}
