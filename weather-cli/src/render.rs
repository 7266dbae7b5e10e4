use std::fmt::Write;

use weather_core::{ConditionsView, ForecastRow, QueryState, QueryStatus, TemperatureDisplay};

/// Human-readable text for a query state, one item per line.
pub fn state(state: &QueryState, temperature: TemperatureDisplay) -> String {
    let mut out = String::new();

    match state.status {
        QueryStatus::Idle => {}
        QueryStatus::Loading => {
            let _ = writeln!(out, "Loading weather for {}...", state.city);
        }
        QueryStatus::Success | QueryStatus::Error => {
            if let Some(message) = &state.error_message {
                let _ = writeln!(out, "{message}");
            }
            if let Some(current) = &state.current {
                let view = ConditionsView::new(current, temperature);
                let _ = writeln!(out, "{}", view.location);
                let _ = writeln!(out, "{}", view.condition);
                let _ = writeln!(out, "Temperature : {} (feels like {})", view.temperature, view.feels_like);
                let _ = writeln!(out, "Humidity    : {}", view.humidity);
                let _ = writeln!(out, "Wind Speed  : {}", view.wind);
                let _ = writeln!(out, "Pressure    : {}", view.pressure);
                let _ = writeln!(out, "Icon        : {}", view.icon_url);
            }
        }
    }

    if let Some(entries) = &state.forecast {
        let _ = writeln!(out, "\nForecast ({} entries):", entries.len());
        for entry in entries {
            let row = ForecastRow::new(entry, temperature);
            let _ = writeln!(
                out,
                "  {:<16} {:>7}  {:>4}  {:>8}  {}",
                row.time, row.temperature, row.humidity, row.wind, row.condition
            );
        }
    }

    if let Some(message) = &state.forecast_error {
        let _ = writeln!(out, "{message}");
    }

    out
}
