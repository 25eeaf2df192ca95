//! Event loop glue: owns the state, runs the reducer and turns effects into
//! tasks whose results come back as actions.

use std::{future::Future, time::Duration};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{
    action::Action,
    config::Config,
    effect::Effect,
    provider::{FetchError, Services, services_from_config},
    reducer::reducer,
    state::AppState,
    tasks::{TaskKey, TaskManager},
    view::{ResultView, result_view},
};

/// Timing knobs for the runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub debounce: Duration,
    pub suggestion_limit: usize,
    pub timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            debounce: config.debounce(),
            suggestion_limit: config.suggestion_limit,
            timeout: config.timeout(),
        }
    }
}

/// One widget session: a single logical thread of control over [`AppState`].
#[derive(Debug)]
pub struct WeatherApp {
    state: AppState,
    services: Services,
    settings: Settings,
    tasks: TaskManager,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Autocomplete request whose result has not been applied yet.
    pending_suggestions: Option<u64>,
}

impl WeatherApp {
    pub fn new(services: Services, settings: Settings, state: AppState) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            state,
            services,
            settings,
            tasks: TaskManager::new(action_tx),
            action_rx,
            pending_suggestions: None,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let services = services_from_config(config)?;
        Ok(Self::new(services, Settings::from(config), AppState::new(config.unit)))
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> Option<ResultView> {
        result_view(&self.state)
    }

    /// Apply `action` and start whatever work it asks for. Returns whether
    /// the state changed.
    pub fn dispatch(&mut self, action: Action) -> bool {
        debug!(action = %action.summary(), "dispatch");
        if let Action::SuggestionsDidLoad { request, .. } = &action {
            if self.pending_suggestions == Some(*request) {
                self.pending_suggestions = None;
            }
        }

        let result = reducer(&mut self.state, action);

        for effect in result.effects {
            self.handle_effect(effect);
        }

        result.changed
    }

    /// Wait for the next task result and apply it.
    pub async fn next(&mut self) -> Option<bool> {
        let action = self.action_rx.recv().await?;
        Some(self.dispatch(action))
    }

    /// Whether a weather fetch or autocomplete result is still owed.
    pub fn is_awaiting(&self) -> bool {
        self.state.is_loading() || self.pending_suggestions.is_some()
    }

    /// Apply results until the state no longer expects one. Every live task
    /// sends exactly one action, bounded by the request timeout.
    pub async fn settle(&mut self) {
        while self.is_awaiting() {
            if self.next().await.is_none() {
                break;
            }
        }
    }

    /// Abort all outstanding work; late results are dropped with the channel.
    pub fn shutdown(&mut self) {
        self.tasks.cancel_all();
    }

    fn handle_effect(&mut self, effect: Effect) {
        match effect {
            Effect::ScheduleSuggestions { request, query } => {
                self.pending_suggestions = Some(request);
                let geocoder = self.services.geocoder.clone();
                let limit = self.settings.suggestion_limit;
                let timeout = self.settings.timeout;

                self.tasks.debounce(TaskKey::Suggestions, self.settings.debounce, async move {
                    debug!(request, %query, "Requesting suggestions");
                    let candidates =
                        match with_timeout(timeout, geocoder.suggest(&query, limit)).await {
                            Ok(candidates) => candidates,
                            Err(e) => {
                                debug!(request, error = %e, "Suggestion fetch failed");
                                Vec::new()
                            }
                        };
                    Action::SuggestionsDidLoad { request, candidates }
                });
            }

            Effect::CancelSuggestions => {
                self.pending_suggestions = None;
                self.tasks.cancel(TaskKey::Suggestions);
            }

            Effect::FetchWeather { request, query } => {
                let weather = self.services.weather.clone();
                let timeout = self.settings.timeout;

                self.tasks.spawn(TaskKey::Weather, async move {
                    match with_timeout(timeout, weather.current(&query)).await {
                        Ok(snapshot) => Action::WeatherDidLoad { request, snapshot },
                        Err(e) => {
                            warn!(request, error = %e, ?query, "Weather fetch failed");
                            Action::WeatherDidFail { request, message: e.user_message() }
                        }
                    }
                });
            }
        }
    }
}

async fn with_timeout<T>(
    timeout: Duration,
    fut: impl Future<Output = Result<T, FetchError>>,
) -> Result<T, FetchError> {
    tokio::time::timeout(timeout, fut).await.map_err(|_| FetchError::Timeout(timeout))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{Condition, PlaceCandidate, WeatherQuery, WeatherSnapshot, Wind},
        provider::{Geocoder, WeatherProvider},
        reducer::EMPTY_QUERY_MESSAGE,
        state::{Mode, Phase},
        units::DisplayUnit,
    };
    use async_trait::async_trait;
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    fn place(name: &str, country: &str) -> PlaceCandidate {
        PlaceCandidate {
            name: name.into(),
            country: country.into(),
            state: None,
            lat: 48.85,
            lon: 2.35,
        }
    }

    fn snapshot(name: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            place_name: name.into(),
            country: Some("FR".into()),
            conditions: vec![Condition {
                main: "Clear".into(),
                description: "clear sky".into(),
                icon: "01d".into(),
            }],
            temperature_c: 20.0,
            feels_like_c: 18.0,
            humidity_pct: 40.0,
            pressure_hpa: 1015.0,
            wind: Wind { speed_mps: 2.0, direction_deg: None },
            visibility_m: Some(10_000.0),
            sunrise: 0,
            sunset: 1,
            timezone_offset_secs: 0,
        }
    }

    /// Geocoder with per-query latency that records every request it serves.
    #[derive(Debug, Default)]
    struct FakeGeocoder {
        delays: HashMap<String, Duration>,
        fail: bool,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn suggest(&self, query: &str, limit: usize) -> Result<Vec<PlaceCandidate>, FetchError> {
            self.calls.lock().unwrap().push(query.to_string());
            if let Some(delay) = self.delays.get(query) {
                tokio::time::sleep(*delay).await;
            }
            if self.fail {
                return Err(FetchError::Status { status: 401, message: Some("bad key".into()) });
            }
            Ok(vec![place(query, "FR")].into_iter().take(limit).collect())
        }
    }

    #[derive(Debug, Default)]
    struct FakeWeather {
        delay: Option<Duration>,
        error: Option<FetchError>,
        calls: Mutex<Vec<WeatherQuery>>,
    }

    #[async_trait]
    impl WeatherProvider for FakeWeather {
        async fn current(&self, query: &WeatherQuery) -> Result<WeatherSnapshot, FetchError> {
            self.calls.lock().unwrap().push(query.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if let Some(err) = &self.error {
                return Err(err.clone());
            }
            let name = match query {
                WeatherQuery::ByName(name) => name.clone(),
                WeatherQuery::ByCoordinates { .. } => "Reported Name".to_string(),
            };
            Ok(snapshot(&name))
        }
    }

    fn app(geocoder: Arc<FakeGeocoder>, weather: Arc<FakeWeather>) -> WeatherApp {
        WeatherApp::new(Services::new(geocoder, weather), Settings::default(), AppState::default())
    }

    fn eager_app(geocoder: Arc<FakeGeocoder>, weather: Arc<FakeWeather>) -> WeatherApp {
        let settings = Settings { debounce: Duration::ZERO, ..Settings::default() };
        WeatherApp::new(Services::new(geocoder, weather), settings, AppState::default())
    }

    // Results can land on a worker thread before `settle` looks, so it must
    // not rely on task handles to know what is still owed.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn settle_returns_when_fetch_finishes_on_another_worker() {
        for _ in 0..500 {
            let mut app =
                eager_app(Arc::new(FakeGeocoder::default()), Arc::new(FakeWeather::default()));

            app.dispatch(Action::QueryChanged("Paris".into()));
            app.dispatch(Action::Submit);

            let settled = tokio::time::timeout(Duration::from_secs(2), app.settle()).await;
            assert!(settled.is_ok(), "settle hung with a result already queued");
            assert!(app.state().snapshot().is_some());
            assert!(!app.is_awaiting());
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn settle_applies_suggestions_finished_on_another_worker() {
        for _ in 0..500 {
            let mut app =
                eager_app(Arc::new(FakeGeocoder::default()), Arc::new(FakeWeather::default()));

            app.dispatch(Action::QueryChanged("Paris".into()));

            let settled = tokio::time::timeout(Duration::from_secs(2), app.settle()).await;
            assert!(settled.is_ok(), "settle hung with suggestions already queued");
            assert_eq!(app.state().suggestions(), &[place("Paris", "FR")]);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_suggestions_are_not_awaited() {
        let mut app = app(Arc::new(FakeGeocoder::default()), Arc::new(FakeWeather::default()));

        app.dispatch(Action::QueryChanged("Paris".into()));
        assert!(app.is_awaiting());

        app.dispatch(Action::QueryChanged("Pa".into()));
        assert!(!app.is_awaiting());
        app.settle().await;
    }

    #[tokio::test(start_paused = true)]
    async fn keystroke_burst_issues_one_request() {
        let geocoder = Arc::new(FakeGeocoder::default());
        let mut app = app(geocoder.clone(), Arc::new(FakeWeather::default()));

        app.dispatch(Action::QueryChanged("Lon".into()));
        tokio::time::sleep(Duration::from_millis(200)).await;
        app.dispatch(Action::QueryChanged("London".into()));
        app.settle().await;

        assert_eq!(*geocoder.calls.lock().unwrap(), vec!["London".to_string()]);
        assert_eq!(app.state().suggestions(), &[place("London", "FR")]);
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_is_requested_before_quiet_period() {
        let geocoder = Arc::new(FakeGeocoder::default());
        let mut app = app(geocoder.clone(), Arc::new(FakeWeather::default()));

        app.dispatch(Action::QueryChanged("Berlin".into()));
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(geocoder.calls.lock().unwrap().is_empty());

        app.settle().await;
        assert_eq!(geocoder.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_stale_response_does_not_overwrite_fresh_one() {
        let geocoder = Arc::new(FakeGeocoder {
            delays: HashMap::from([("Pari".to_string(), Duration::from_secs(3))]),
            ..Default::default()
        });
        let mut app = app(geocoder.clone(), Arc::new(FakeWeather::default()));

        app.dispatch(Action::QueryChanged("Pari".into()));
        // Let the "Pari" request go out, then type again while it hangs.
        tokio::time::sleep(Duration::from_millis(600)).await;
        app.dispatch(Action::QueryChanged("Paris".into()));
        app.settle().await;

        assert_eq!(
            *geocoder.calls.lock().unwrap(),
            vec!["Pari".to_string(), "Paris".to_string()]
        );
        assert_eq!(app.state().suggestions(), &[place("Paris", "FR")]);
    }

    #[tokio::test(start_paused = true)]
    async fn geocoding_failure_is_silent() {
        let geocoder = Arc::new(FakeGeocoder { fail: true, ..Default::default() });
        let mut app = app(geocoder, Arc::new(FakeWeather::default()));

        app.dispatch(Action::QueryChanged("Madrid".into()));
        app.settle().await;

        assert!(app.state().suggestions().is_empty());
        assert_eq!(app.state().error(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_submit_makes_no_network_call() {
        let weather = Arc::new(FakeWeather::default());
        let mut app = app(Arc::new(FakeGeocoder::default()), weather.clone());

        app.dispatch(Action::QueryChanged("  ".into()));
        app.dispatch(Action::Submit);
        app.settle().await;

        assert!(weather.calls.lock().unwrap().is_empty());
        assert_eq!(app.state().error(), Some(EMPTY_QUERY_MESSAGE));
    }

    #[tokio::test(start_paused = true)]
    async fn selection_uses_coordinates_and_composed_label() {
        let weather = Arc::new(FakeWeather::default());
        let mut app = app(Arc::new(FakeGeocoder::default()), weather.clone());

        app.dispatch(Action::QueryChanged("Paris".into()));
        app.settle().await;
        app.dispatch(Action::SelectSuggestion(0));
        app.settle().await;

        assert_eq!(
            *weather.calls.lock().unwrap(),
            vec![WeatherQuery::ByCoordinates { lat: 48.85, lon: 2.35 }]
        );
        assert_eq!(app.state().label(), Some("Paris, FR"));
        assert_eq!(app.state().mode(), Mode::Result);
    }

    #[tokio::test(start_paused = true)]
    async fn direct_submit_uses_reported_name() {
        let weather = Arc::new(FakeWeather::default());
        let mut app = app(Arc::new(FakeGeocoder::default()), weather.clone());

        app.dispatch(Action::QueryChanged("Paris".into()));
        app.dispatch(Action::Submit);
        app.settle().await;

        assert_eq!(*weather.calls.lock().unwrap(), vec![WeatherQuery::ByName("Paris".into())]);
        assert_eq!(app.state().label(), Some("Paris"));
    }

    #[tokio::test(start_paused = true)]
    async fn submit_discards_pending_suggestions() {
        let geocoder = Arc::new(FakeGeocoder::default());
        let mut app = app(geocoder.clone(), Arc::new(FakeWeather::default()));

        app.dispatch(Action::QueryChanged("Paris".into()));
        app.dispatch(Action::Submit);
        app.settle().await;

        assert!(geocoder.calls.lock().unwrap().is_empty());
        assert!(app.state().suggestions().is_empty());
        assert!(app.state().snapshot().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn weather_failure_surfaces_message() {
        let weather = Arc::new(FakeWeather {
            error: Some(FetchError::Status { status: 404, message: Some("city not found".into()) }),
            ..Default::default()
        });
        let mut app = app(Arc::new(FakeGeocoder::default()), weather);

        app.dispatch(Action::QueryChanged("Atlantis".into()));
        app.dispatch(Action::Submit);
        app.settle().await;

        assert!(matches!(&app.state().phase, Phase::Failed { message, .. } if message == "city not found"));
        assert!(app.state().snapshot().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn hung_weather_fetch_times_out() {
        let weather = Arc::new(FakeWeather {
            delay: Some(Duration::from_secs(60)),
            ..Default::default()
        });
        let mut app = app(Arc::new(FakeGeocoder::default()), weather);

        app.dispatch(Action::QueryChanged("Lima".into()));
        app.dispatch(Action::Submit);
        app.settle().await;

        assert_eq!(app.state().error(), Some("Request timed out"));
    }

    #[tokio::test(start_paused = true)]
    async fn new_search_after_result_returns_to_input() {
        let mut app = app(Arc::new(FakeGeocoder::default()), Arc::new(FakeWeather::default()));

        app.dispatch(Action::QueryChanged("Paris".into()));
        app.dispatch(Action::Submit);
        app.settle().await;
        assert!(app.view().is_some());

        app.dispatch(Action::ToggleUnit);
        app.dispatch(Action::NewSearch);
        app.settle().await;

        assert_eq!(app.state().mode(), Mode::Input);
        assert!(app.state().query.is_empty());
        assert!(app.state().suggestions().is_empty());
        assert!(app.view().is_none());
        assert!(app.state().backdrop().is_none());
        assert_eq!(app.state().unit, DisplayUnit::Fahrenheit);
    }
}
