//! Core library for `skylookup`, a single-query weather lookup widget.
//!
//! This crate defines:
//! - Configuration & credential resolution
//! - The two endpoints (geocoding, current weather) as traits, plus an OpenWeather client
//! - The widget state machine: actions, reducer, effects
//! - A runtime that debounces autocomplete and keeps only the latest request's result
//! - Pure helpers: unit conversion, measurement labels, day/night background projection
//!
//! It is used by `skylookup-cli`, but any front end can drive a [`WeatherApp`].

pub mod action;
pub mod classify;
pub mod condition;
pub mod config;
pub mod effect;
pub mod model;
pub mod provider;
pub mod reducer;
pub mod runtime;
pub mod state;
pub mod tasks;
pub mod units;
pub mod view;

pub use action::Action;
pub use condition::Backdrop;
pub use config::Config;
pub use model::{Condition, PlaceCandidate, WeatherQuery, WeatherSnapshot, Wind};
pub use provider::{FetchError, Geocoder, Services, WeatherProvider};
pub use runtime::{Settings, WeatherApp};
pub use state::{AppState, Mode, Phase};
pub use units::DisplayUnit;
pub use view::ResultView;
