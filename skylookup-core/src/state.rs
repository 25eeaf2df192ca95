//! In-memory widget state. Only the reducer mutates it.

use crate::{
    condition::{Backdrop, backdrop},
    model::{PlaceCandidate, WeatherSnapshot},
    units::DisplayUnit,
};

/// Minimum trimmed query length before suggestions are solicited.
pub const MIN_SUGGEST_CHARS: usize = 3;

/// Lifecycle of the active query. Snapshot and error never coexist.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    /// Nothing in flight, nothing loaded, query too short to suggest.
    #[default]
    Idle,
    /// Typing; suggestions may populate.
    Searching { suggestions: Vec<PlaceCandidate> },
    /// A weather fetch is in flight. `label` is set on the suggestion path.
    Loading { request: u64, label: Option<String> },
    Loaded { snapshot: WeatherSnapshot, label: String },
    /// The message stays visible while the user edits the query.
    Failed { message: String, suggestions: Vec<PlaceCandidate> },
}

/// Which of the two views is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Input,
    Result,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub query: String,
    pub unit: DisplayUnit,
    pub phase: Phase,
    /// Latest suggestion request handed to the runtime.
    pub suggestion_request: u64,
    /// Latest weather request handed to the runtime.
    pub weather_request: u64,
}

impl AppState {
    pub fn new(unit: DisplayUnit) -> Self {
        Self { unit, ..Self::default() }
    }

    pub fn mode(&self) -> Mode {
        match self.phase {
            Phase::Loaded { .. } => Mode::Result,
            _ => Mode::Input,
        }
    }

    pub fn suggestions(&self) -> &[PlaceCandidate] {
        match &self.phase {
            Phase::Searching { suggestions } | Phase::Failed { suggestions, .. } => {
                suggestions.as_slice()
            }
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match &self.phase {
            Phase::Loaded { snapshot, .. } => Some(snapshot),
            _ => None,
        }
    }

    /// Place label shown in result mode.
    pub fn label(&self) -> Option<&str> {
        match &self.phase {
            Phase::Loaded { label, .. } => Some(label.as_str()),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading { .. })
    }

    /// Background classification; `None` means neutral presentation.
    pub fn backdrop(&self) -> Option<Backdrop> {
        self.snapshot().map(backdrop)
    }

    pub fn query_is_suggestible(&self) -> bool {
        self.query.trim().chars().count() >= MIN_SUGGEST_CHARS
    }
}
