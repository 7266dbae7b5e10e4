use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use weather_core::{
    ClientOptions, Config, FileLastCityStore, ForecastMode, Key, LastCityStore, TemperatureDisplay,
    WeatherQueryClient, provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name, passed to the provider as typed.
        city: String,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Prompt for cities until Esc or Ctrl-C.
    Interactive {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Print the last successfully searched city.
    Last,
}

#[derive(Debug, Clone, Default, Args)]
pub struct QueryArgs {
    /// Forecast mode: off, parallel or after-conditions. Defaults to the config file.
    #[arg(long)]
    pub forecast: Option<String>,

    /// Show only the first 15 forecast entries (5 days).
    #[arg(long)]
    pub truncate: bool,

    /// Drop the fractional part of temperatures.
    #[arg(long)]
    pub whole_degrees: bool,
}

impl QueryArgs {
    fn client_options(&self, base: &ClientOptions) -> anyhow::Result<ClientOptions> {
        let mut options = base.clone();
        if let Some(mode) = &self.forecast {
            options.forecast = ForecastMode::try_from(mode.as_str())?;
        }
        if self.truncate {
            options.truncate_forecast = true;
        }
        Ok(options)
    }

    fn temperature(&self) -> TemperatureDisplay {
        if self.whole_degrees { TemperatureDisplay::Whole } else { TemperatureDisplay::Raw }
    }
}

impl Cli {
    pub async fn run(self, config: Config) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(config),
            Command::Show { city, query } => {
                let client = build_client(&config, &query)?;
                let state = client.submit_query(&city).await;
                print!("{}", render::state(&state, query.temperature()));
                Ok(())
            }
            Command::Interactive { query } => interactive(&config, &query).await,
            Command::Last => {
                let store = FileLastCityStore::in_data_dir()?;
                match store.load()? {
                    Some(city) => println!("{city}"),
                    None => println!("No city searched yet."),
                }
                Ok(())
            }
        }
    }
}

fn build_client(config: &Config, query: &QueryArgs) -> anyhow::Result<WeatherQueryClient> {
    let provider = provider_from_config(config)?;
    let store = FileLastCityStore::in_data_dir()?;
    let options = query.client_options(&config.client)?;

    Ok(WeatherQueryClient::new(Arc::from(provider), Arc::new(store), options))
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved API key to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn interactive(config: &Config, query: &QueryArgs) -> anyhow::Result<()> {
    let client = build_client(config, query)?;

    loop {
        let line = match Text::new("City:").prompt() {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => return Ok(()),
            Err(e) => return Err(e).context("Failed to read city"),
        };

        let before = client.state();
        client.set_input(line);
        let after = client.handle_submit_key(Key::Enter).await;

        // Empty input leaves the state untouched.
        if !Arc::ptr_eq(&before, &after) {
            print!("{}", render::state(&after, query.temperature()));
        }
    }
}
