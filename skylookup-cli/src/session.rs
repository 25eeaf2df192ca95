//! Interactive search session: the terminal stand-in for the widget form.

use inquire::{InquireError, Select, Text};
use skylookup_core::{Action, Mode, WeatherApp};

use crate::render;

const TOGGLE_UNIT: &str = "Toggle °C / °F";
const NEW_SEARCH: &str = "New search";
const QUIT: &str = "Quit";

/// What the user picked from the suggestion list.
enum Pick {
    Suggestion(usize),
    Typed,
}

pub async fn run(mut app: WeatherApp) -> anyhow::Result<()> {
    let result = session_loop(&mut app).await;
    app.shutdown();

    match result {
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(()),
        other => other.map_err(Into::into),
    }
}

async fn session_loop(app: &mut WeatherApp) -> Result<(), InquireError> {
    loop {
        match app.state().mode() {
            Mode::Input => search(app).await?,
            Mode::Result => {
                if !browse_result(app)? {
                    return Ok(());
                }
            }
        }
    }
}

async fn search(app: &mut WeatherApp) -> Result<(), InquireError> {
    let mut prompt = Text::new("City or country (min 3 letters):");
    if let Some(message) = app.state().error() {
        prompt = prompt.with_help_message(message);
    }

    let input = prompt.with_initial_value(&app.state().query).prompt()?;
    app.dispatch(Action::QueryChanged(input));
    // Waits out the debounce and the autocomplete request.
    app.settle().await;

    let action = match pick(app)? {
        Pick::Suggestion(index) => Action::SelectSuggestion(index),
        Pick::Typed => Action::Submit,
    };

    app.dispatch(action);
    app.settle().await;

    Ok(())
}

fn pick(app: &WeatherApp) -> Result<Pick, InquireError> {
    let suggestions = app.state().suggestions();
    if suggestions.is_empty() {
        return Ok(Pick::Typed);
    }

    let mut options: Vec<String> = suggestions.iter().map(|s| s.label()).collect();
    options.push(format!("Search \"{}\"", app.state().query.trim()));

    let chosen = Select::new("Did you mean:", options).raw_prompt()?;

    if chosen.index < suggestions.len() {
        Ok(Pick::Suggestion(chosen.index))
    } else {
        Ok(Pick::Typed)
    }
}

/// Returns `false` when the user wants to quit.
fn browse_result(app: &mut WeatherApp) -> Result<bool, InquireError> {
    if let Some(view) = app.view() {
        render::print_result(&view, app.state().backdrop().as_ref());
    }

    let choice = Select::new("Next:", vec![TOGGLE_UNIT, NEW_SEARCH, QUIT]).prompt()?;

    match choice {
        TOGGLE_UNIT => {
            app.dispatch(Action::ToggleUnit);
            Ok(true)
        }
        NEW_SEARCH => {
            app.dispatch(Action::NewSearch);
            Ok(true)
        }
        _ => Ok(false),
    }
}
