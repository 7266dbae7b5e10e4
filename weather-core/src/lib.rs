//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider behind the [`WeatherProvider`] trait
//! - [`WeatherQueryClient`], which maps city lookups onto [`QueryState`] snapshots
//! - Persistence of the last searched city
//! - Display formatting for results
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod store;
pub mod view;

pub use client::{ClientOptions, FORECAST_LIMIT, ForecastMode, Key, WeatherQueryClient};
pub use config::Config;
pub use error::QueryError;
pub use model::{Condition, CurrentConditions, ForecastEntry, QueryState, QueryStatus};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use store::{FileLastCityStore, LastCityStore, MemoryLastCityStore};
pub use view::{ConditionsView, ForecastRow, TemperatureDisplay};
