//! User intents and async results fed to the reducer.
//!
//! `*Did*` variants come back from spawned tasks and carry the request
//! number they were issued under; the reducer drops any that are stale.

use crate::model::{PlaceCandidate, WeatherSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The input text changed (every keystroke).
    QueryChanged(String),

    /// Direct submit of the typed text.
    Submit,

    /// Pick the suggestion at this index.
    SelectSuggestion(usize),

    ToggleUnit,

    /// Leave result mode and start over.
    NewSearch,

    /// Autocomplete finished. Failures arrive as an empty list.
    SuggestionsDidLoad {
        request: u64,
        candidates: Vec<PlaceCandidate>,
    },

    WeatherDidLoad {
        request: u64,
        snapshot: WeatherSnapshot,
    },

    WeatherDidFail {
        request: u64,
        message: String,
    },
}

impl Action {
    /// Short form for logs; avoids dumping whole snapshots.
    pub fn summary(&self) -> String {
        match self {
            Action::SuggestionsDidLoad { request, candidates } => {
                format!("SuggestionsDidLoad {{ request: {request}, count: {} }}", candidates.len())
            }
            Action::WeatherDidLoad { request, snapshot } => {
                format!("WeatherDidLoad {{ request: {request}, place: {:?} }}", snapshot.place_name)
            }
            _ => format!("{self:?}"),
        }
    }
}
