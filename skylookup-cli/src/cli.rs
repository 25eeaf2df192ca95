use anyhow::Context;
use clap::{Parser, Subcommand};
use skylookup_core::{Action, Config, DisplayUnit, WeatherApp};

use crate::{render, session};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skylookup", version, about = "Current weather with place autocomplete")]
pub struct Cli {
    /// Print debug logs to stderr (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Show current weather for a place name, skipping suggestions.
    Show {
        /// City or region name.
        place: String,

        /// Display temperatures in Fahrenheit.
        #[arg(long)]
        fahrenheit: bool,
    },

    /// Search with autocomplete, then browse the result (the default).
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure => configure(),
            Command::Show { place, fahrenheit } => show(place, fahrenheit).await,
            Command::Interactive => {
                let config = Config::load()?;
                let app = WeatherApp::from_config(&config)?;
                session::run(app).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load_file()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_validator(inquire::required!("API key must not be empty"))
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key.trim().to_string());
    let path = config.save()?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn show(place: String, fahrenheit: bool) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if fahrenheit {
        config.unit = DisplayUnit::Fahrenheit;
    }

    let mut app = WeatherApp::from_config(&config)?;
    app.dispatch(Action::QueryChanged(place));
    app.dispatch(Action::Submit);
    app.settle().await;

    if let Some(message) = app.state().error() {
        anyhow::bail!("{message}");
    }

    if let Some(view) = app.view() {
        render::print_result(&view, app.state().backdrop().as_ref());
    }

    Ok(())
}
