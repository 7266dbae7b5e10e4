use crate::{
    Config, QueryError,
    model::{CurrentConditions, ForecastEntry},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current conditions and 3-hourly forecasts, looked up by free-text city name.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_conditions(&self, city: &str) -> Result<CurrentConditions, QueryError>;

    /// Entries in provider order (chronological, 3-hour steps).
    async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, QueryError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.resolve_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for OpenWeather.\n\
                 Hint: run `weather configure` and enter your API key, \
                 or set OPENWEATHER_API_KEY."
        )
    })?;

    let provider = OpenWeatherProvider::builder(api_key)
        .base_url(config.base_url())
        .timeout_secs(config.timeout_secs)
        .build()?;

    Ok(Box::new(provider))
}
