//! Query client: turns a city name into a sequence of [`QueryState`] snapshots.
//!
//! Every submitted query gets a generation number. Results are applied only
//! while their generation is still the newest one issued, so a slow response
//! for an earlier city can never overwrite the state of a later one.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use crate::{
    error::FORECAST_MESSAGE,
    model::{ForecastEntry, QueryState},
    provider::WeatherProvider,
    store::LastCityStore,
};

/// 5 days at 3-hour resolution.
pub const FORECAST_LIMIT: usize = 15;

/// When the forecast request is issued relative to the current-conditions request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForecastMode {
    /// No forecast request at all.
    Disabled,
    /// Both requests in flight together; each result lands as soon as it arrives.
    #[default]
    Parallel,
    /// Forecast only after current conditions succeeded.
    AfterConditions,
}

impl ForecastMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastMode::Disabled => "off",
            ForecastMode::Parallel => "parallel",
            ForecastMode::AfterConditions => "after-conditions",
        }
    }
}

impl std::fmt::Display for ForecastMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ForecastMode {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "off" | "disabled" => Ok(ForecastMode::Disabled),
            "parallel" => Ok(ForecastMode::Parallel),
            "after-conditions" => Ok(ForecastMode::AfterConditions),
            _ => Err(anyhow::anyhow!(
                "Unknown forecast mode '{value}'. Supported modes: off, parallel, after-conditions."
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    pub forecast: ForecastMode,
    /// Keep only the first [`FORECAST_LIMIT`] entries.
    pub truncate_forecast: bool,
    pub persist_last_city: bool,
    /// Put a forecast-specific message in `forecast_error` when the forecast fails.
    pub report_forecast_errors: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            forecast: ForecastMode::Parallel,
            truncate_forecast: false,
            persist_last_city: true,
            report_forecast_errors: false,
        }
    }
}

/// Keys the input field reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Char(char),
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    state: Arc<QueryState>,
}

#[derive(Debug)]
pub struct WeatherQueryClient {
    provider: Arc<dyn WeatherProvider>,
    store: Arc<dyn LastCityStore>,
    options: ClientOptions,
    slot: Mutex<Slot>,
    input: Mutex<String>,
}

impl WeatherQueryClient {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        store: Arc<dyn LastCityStore>,
        options: ClientOptions,
    ) -> Self {
        Self {
            provider,
            store,
            options,
            slot: Mutex::new(Slot::default()),
            input: Mutex::new(String::new()),
        }
    }

    pub fn state(&self) -> Arc<QueryState> {
        Arc::clone(&self.slot().state)
    }

    pub fn set_input(&self, text: impl Into<String>) {
        *self.input.lock().unwrap_or_else(PoisonError::into_inner) = text.into();
    }

    pub fn input(&self) -> String {
        self.input.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Submit the held input on Enter; every other key is ignored.
    pub async fn handle_submit_key(&self, key: Key) -> Arc<QueryState> {
        match key {
            Key::Enter => {
                let city = self.input();
                self.submit_query(&city).await
            }
            _ => self.state(),
        }
    }

    /// Look up `city` and return the state once all requests for it have resolved.
    ///
    /// An empty name does nothing. The name is used verbatim, whitespace included.
    pub async fn submit_query(&self, city: &str) -> Arc<QueryState> {
        if city.is_empty() {
            debug!("empty city, nothing to submit");
            return self.state();
        }

        let generation = self.begin(city);
        debug!(city, generation, forecast = %self.options.forecast, "query submitted");

        match self.options.forecast {
            ForecastMode::Disabled => {
                self.run_current(generation, city).await;
            }
            ForecastMode::Parallel => {
                tokio::join!(self.run_current(generation, city), self.run_forecast(generation, city));
            }
            ForecastMode::AfterConditions => {
                if self.run_current(generation, city).await {
                    self.run_forecast(generation, city).await;
                }
            }
        }

        self.state()
    }

    /// Returns true when the conditions arrived and were applied.
    async fn run_current(&self, generation: u64, city: &str) -> bool {
        let result = self.provider.current_conditions(city).await;

        match result {
            Ok(conditions) => {
                let applied = self.apply(generation, |s| s.with_conditions(conditions));
                if applied {
                    info!(city, "current conditions loaded");
                    self.remember(city);
                }
                applied
            }
            Err(err) => {
                warn!(city, error = %err, "current conditions request failed");
                self.apply(generation, |s| s.with_error(err.user_message()));
                false
            }
        }
    }

    async fn run_forecast(&self, generation: u64, city: &str) {
        match self.provider.forecast(city).await {
            Ok(entries) => {
                let entries = self.limit_forecast(entries);
                debug!(city, entries = entries.len(), "forecast loaded");
                self.apply(generation, |s| s.with_forecast(entries));
            }
            Err(err) => {
                warn!(city, error = %err, "forecast request failed");
                let message = self
                    .options
                    .report_forecast_errors
                    .then(|| FORECAST_MESSAGE.to_string());
                self.apply(generation, |s| s.without_forecast(message));
            }
        }
    }

    fn limit_forecast(&self, mut entries: Vec<ForecastEntry>) -> Vec<ForecastEntry> {
        if self.options.truncate_forecast {
            entries.truncate(FORECAST_LIMIT);
        }
        entries
    }

    fn remember(&self, city: &str) {
        if !self.options.persist_last_city {
            return;
        }
        if let Err(e) = self.store.save(city) {
            warn!(city, error = %e, "failed to persist last searched city");
        }
    }

    /// Issue a new generation and switch to Loading for `city`.
    fn begin(&self, city: &str) -> u64 {
        let mut slot = self.slot();
        slot.generation += 1;
        slot.state = Arc::new(QueryState::loading(city));
        slot.generation
    }

    /// Replace the state if `generation` is still current. Returns false for stale results.
    fn apply(&self, generation: u64, transition: impl FnOnce(&QueryState) -> QueryState) -> bool {
        let mut slot = self.slot();
        if slot.generation != generation {
            debug!(generation, latest = slot.generation, "discarding stale response");
            return false;
        }
        slot.state = Arc::new(transition(&slot.state));
        true
    }

    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
