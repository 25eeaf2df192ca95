use chrono::{DateTime, Utc};

use crate::{classify::is_day, model::WeatherSnapshot};

/// What the ambient background renderer consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backdrop {
    pub primary_condition: String,
    pub is_day: bool,
}

/// Project a snapshot against the current wall clock.
pub fn backdrop(snapshot: &WeatherSnapshot) -> Backdrop {
    backdrop_at(snapshot, Utc::now())
}

pub fn backdrop_at(snapshot: &WeatherSnapshot, now: DateTime<Utc>) -> Backdrop {
    let primary_condition = snapshot
        .primary_condition()
        .map(|c| c.main.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    Backdrop {
        primary_condition,
        is_day: is_day(now.timestamp(), snapshot.sunrise, snapshot.sunset),
    }
}
