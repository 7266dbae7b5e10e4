use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Primary weather condition as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Short group label, e.g. "Clouds".
    pub label: String,
    /// Longer text, e.g. "broken clouds".
    pub description: String,
    /// Provider icon code, e.g. "04d".
    pub icon: String,
}

impl Condition {
    pub fn unknown() -> Self {
        Self {
            label: "Unknown".to_string(),
            description: "Unknown".to_string(),
            icon: String::new(),
        }
    }

    /// Externally hosted image for the icon code. There is no local fallback.
    pub fn icon_url(&self) -> String {
        format!("{ICON_BASE_URL}/{}@2x.png", self.icon)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub city_name: String,
    pub country_code: String,
    pub condition: Condition,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub pressure_hpa: u32,
}

/// One 3-hour step of the 5-day forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Epoch seconds.
    pub timestamp: i64,
    pub condition: Condition,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
}

impl ForecastEntry {
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QueryStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Snapshot of everything the UI shows for the current query target.
///
/// Values are never mutated in place: every transition builds a new state, and
/// the client swaps the whole value at once. Once `status` is `Success` or
/// `Error`, exactly one of `current` and `error_message` is set. The forecast
/// slots are independent of the status.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryState {
    pub city: String,
    pub status: QueryStatus,
    pub current: Option<CurrentConditions>,
    pub forecast: Option<Vec<ForecastEntry>>,
    pub error_message: Option<String>,
    pub forecast_error: Option<String>,
}

impl QueryState {
    /// A fresh request for `city`. Previous results are dropped.
    pub fn loading(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            status: QueryStatus::Loading,
            ..Self::default()
        }
    }

    pub fn with_conditions(&self, conditions: CurrentConditions) -> Self {
        Self {
            status: QueryStatus::Success,
            current: Some(conditions),
            error_message: None,
            ..self.clone()
        }
    }

    /// Failed current-conditions fetch. Clears any conditions on display.
    pub fn with_error(&self, message: impl Into<String>) -> Self {
        Self {
            status: QueryStatus::Error,
            current: None,
            error_message: Some(message.into()),
            ..self.clone()
        }
    }

    pub fn with_forecast(&self, entries: Vec<ForecastEntry>) -> Self {
        Self {
            forecast: Some(entries),
            forecast_error: None,
            ..self.clone()
        }
    }

    /// Failed forecast fetch. `message` is only kept when forecast errors are reported.
    pub fn without_forecast(&self, message: Option<String>) -> Self {
        Self {
            forecast: None,
            forecast_error: message,
            ..self.clone()
        }
    }

    pub fn is_idle(&self) -> bool {
        self.status == QueryStatus::Idle
    }
}
