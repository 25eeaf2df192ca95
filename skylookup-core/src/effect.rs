use crate::model::WeatherQuery;

/// Work the reducer asks the runtime to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// (Re)start the debounce timer; on expiry, ask the geocoder for `query`.
    ScheduleSuggestions { request: u64, query: String },

    /// Revoke any pending debounce timer or in-flight autocomplete.
    CancelSuggestions,

    FetchWeather { request: u64, query: WeatherQuery },
}

/// Outcome of one dispatch: whether state changed and what to run next.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DispatchResult {
    pub changed: bool,
    pub effects: Vec<Effect>,
}

impl DispatchResult {
    pub fn unchanged() -> Self {
        Self::default()
    }

    pub fn changed() -> Self {
        Self { changed: true, effects: Vec::new() }
    }

    pub fn changed_with(effects: Vec<Effect>) -> Self {
        Self { changed: true, effects }
    }
}
