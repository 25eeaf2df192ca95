//! State transitions for the widget: `(state, action) -> effects`.
//!
//! The reducer never performs I/O. Network work is described as [`Effect`]s
//! and every request carries a number; results whose number is no longer
//! the latest are discarded here, which is what makes the last-issued
//! request win regardless of completion order.

use std::mem;

use tracing::debug;

use crate::{
    action::Action,
    effect::{DispatchResult, Effect},
    model::WeatherQuery,
    state::{AppState, Phase},
};

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter valid city name";

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult {
    match action {
        Action::QueryChanged(query) => query_changed(state, query),

        Action::Submit => {
            if matches!(state.phase, Phase::Loaded { .. }) {
                return DispatchResult::unchanged();
            }

            let trimmed = state.query.trim();
            if trimmed.is_empty() {
                state.phase = Phase::Failed {
                    message: EMPTY_QUERY_MESSAGE.to_string(),
                    suggestions: Vec::new(),
                };
                return DispatchResult::changed_with(vec![Effect::CancelSuggestions]);
            }

            let query = WeatherQuery::ByName(trimmed.to_string());
            start_fetch(state, query, None)
        }

        Action::SelectSuggestion(index) => {
            let Some(candidate) = state.suggestions().get(index).cloned() else {
                return DispatchResult::unchanged();
            };

            let query = WeatherQuery::ByCoordinates { lat: candidate.lat, lon: candidate.lon };
            start_fetch(state, query, Some(candidate.label()))
        }

        Action::ToggleUnit => {
            if !matches!(state.phase, Phase::Loaded { .. }) {
                return DispatchResult::unchanged();
            }
            state.unit = state.unit.toggle();
            DispatchResult::changed()
        }

        Action::NewSearch => {
            if !matches!(state.phase, Phase::Loaded { .. }) {
                return DispatchResult::unchanged();
            }
            state.query.clear();
            state.phase = Phase::Idle;
            state.suggestion_request += 1;
            DispatchResult::changed_with(vec![Effect::CancelSuggestions])
        }

        Action::SuggestionsDidLoad { request, candidates } => {
            if request != state.suggestion_request {
                debug!(request, latest = state.suggestion_request, "Dropping stale suggestions");
                return DispatchResult::unchanged();
            }

            match &mut state.phase {
                Phase::Searching { suggestions } | Phase::Failed { suggestions, .. } => {
                    *suggestions = candidates;
                    DispatchResult::changed()
                }
                _ => DispatchResult::unchanged(),
            }
        }

        Action::WeatherDidLoad { request, snapshot } => {
            let label = match &mut state.phase {
                Phase::Loading { request: current, label } if *current == request => label.take(),
                _ => {
                    debug!(request, "Dropping superseded weather result");
                    return DispatchResult::unchanged();
                }
            };

            let label = label.unwrap_or_else(|| snapshot.place_name.clone());
            state.query.clear();
            state.phase = Phase::Loaded { snapshot, label };
            DispatchResult::changed()
        }

        Action::WeatherDidFail { request, message } => {
            match state.phase {
                Phase::Loading { request: current, .. } if current == request => {}
                _ => {
                    debug!(request, "Dropping superseded weather failure");
                    return DispatchResult::unchanged();
                }
            }

            state.phase = Phase::Failed { message, suggestions: Vec::new() };
            DispatchResult::changed()
        }
    }
}

fn query_changed(state: &mut AppState, query: String) -> DispatchResult {
    match state.phase {
        // The input is not on screen in result mode.
        Phase::Loaded { .. } => return DispatchResult::unchanged(),
        Phase::Loading { .. } => {
            state.query = query;
            return DispatchResult::changed();
        }
        _ => {}
    }

    state.query = query;
    state.suggestion_request += 1;
    let suggestible = state.query_is_suggestible();

    state.phase = match mem::take(&mut state.phase) {
        Phase::Failed { message, suggestions } => Phase::Failed {
            message,
            suggestions: if suggestible { suggestions } else { Vec::new() },
        },
        Phase::Searching { suggestions } if suggestible => Phase::Searching { suggestions },
        _ if suggestible => Phase::Searching { suggestions: Vec::new() },
        _ => Phase::Idle,
    };

    let effect = if suggestible {
        Effect::ScheduleSuggestions {
            request: state.suggestion_request,
            query: state.query.clone(),
        }
    } else {
        Effect::CancelSuggestions
    };

    DispatchResult::changed_with(vec![effect])
}

/// Clear error, snapshot and suggestions, then hand out a new weather request.
fn start_fetch(state: &mut AppState, query: WeatherQuery, label: Option<String>) -> DispatchResult {
    state.weather_request += 1;
    state.suggestion_request += 1;
    state.phase = Phase::Loading { request: state.weather_request, label };

    DispatchResult::changed_with(vec![
        Effect::CancelSuggestions,
        Effect::FetchWeather { request: state.weather_request, query },
    ])
}
