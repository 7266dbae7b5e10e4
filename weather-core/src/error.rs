use thiserror::Error;

pub const NOT_FOUND_MESSAGE: &str = "City not found!";
pub const NETWORK_MESSAGE: &str = "Network error. Check your connection and try again.";
pub const PROVIDER_MESSAGE: &str = "Something went wrong. Please try again later.";
pub const FORECAST_MESSAGE: &str = "Forecast unavailable for this city.";

/// Failure of a single provider request.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The provider could not match the city name.
    #[error("city not found")]
    NotFound,

    /// No response was received at all.
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    /// Any other non-2xx status or an unusable body.
    #[error("provider error ({}): {message}", status_label(.status))]
    Provider { status: Option<u16>, message: String },
}

impl QueryError {
    pub fn provider(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Provider { status, message: message.into() }
    }

    /// Text shown in place of the result display.
    pub fn user_message(&self) -> &'static str {
        match self {
            QueryError::NotFound => NOT_FOUND_MESSAGE,
            QueryError::NetworkUnreachable(_) => NETWORK_MESSAGE,
            QueryError::Provider { .. } => PROVIDER_MESSAGE,
        }
    }
}

fn status_label(status: &Option<u16>) -> String {
    status.map_or_else(|| "no status".to_string(), |s| s.to_string())
}
