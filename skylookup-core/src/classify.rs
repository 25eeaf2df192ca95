//! Qualitative labels for raw measurements.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HumidityLevel {
    Dry,
    Comfortable,
    Humid,
}

impl HumidityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            HumidityLevel::Dry => "Dry",
            HumidityLevel::Comfortable => "Comfortable",
            HumidityLevel::Humid => "Humid",
        }
    }
}

impl std::fmt::Display for HumidityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityLevel {
    Clear,
    Moderate,
    Low,
}

impl VisibilityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisibilityLevel::Clear => "Clear",
            VisibilityLevel::Moderate => "Moderate",
            VisibilityLevel::Low => "Low",
        }
    }
}

impl std::fmt::Display for VisibilityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn classify_humidity(humidity_pct: f64) -> HumidityLevel {
    if humidity_pct < 30.0 {
        HumidityLevel::Dry
    } else if humidity_pct > 70.0 {
        HumidityLevel::Humid
    } else {
        HumidityLevel::Comfortable
    }
}

pub fn classify_visibility(visibility_m: f64) -> VisibilityLevel {
    if visibility_m >= 10_000.0 {
        VisibilityLevel::Clear
    } else if visibility_m >= 4_000.0 {
        VisibilityLevel::Moderate
    } else {
        VisibilityLevel::Low
    }
}

/// Strictly between sunrise and sunset; both boundaries count as night.
pub fn is_day(now: i64, sunrise: i64, sunset: i64) -> bool {
    sunrise < now && now < sunset
}
