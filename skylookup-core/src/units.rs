use serde::{Deserialize, Serialize};

/// Temperature unit used for display. Snapshots always carry Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl DisplayUnit {
    pub fn toggle(self) -> Self {
        match self {
            DisplayUnit::Celsius => DisplayUnit::Fahrenheit,
            DisplayUnit::Fahrenheit => DisplayUnit::Celsius,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            DisplayUnit::Celsius => "°C",
            DisplayUnit::Fahrenheit => "°F",
        }
    }
}

/// Format a Celsius reading in `unit` with exactly one fractional digit.
pub fn display(temp_c: f64, unit: DisplayUnit) -> String {
    let value = match unit {
        DisplayUnit::Celsius => temp_c,
        DisplayUnit::Fahrenheit => temp_c * 9.0 / 5.0 + 32.0,
    };
    format!("{value:.1}")
}
