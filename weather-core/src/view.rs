//! Display strings for query results.

use serde::{Deserialize, Serialize};

use crate::model::{CurrentConditions, ForecastEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemperatureDisplay {
    /// As reported, e.g. 27.5°C.
    #[default]
    Raw,
    /// Fractional part dropped, e.g. 27°C.
    Whole,
}

impl TemperatureDisplay {
    pub fn format(self, celsius: f64) -> String {
        let value = match self {
            TemperatureDisplay::Raw => celsius,
            // Avoid printing "-0".
            TemperatureDisplay::Whole => celsius.trunc() + 0.0,
        };
        format!("{value}°C")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionsView {
    pub location: String,
    pub condition: String,
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind: String,
    pub pressure: String,
    pub icon_url: String,
}

impl ConditionsView {
    pub fn new(current: &CurrentConditions, temperature: TemperatureDisplay) -> Self {
        let location = if current.country_code.is_empty() {
            current.city_name.clone()
        } else {
            format!("{}, {}", current.city_name, current.country_code)
        };

        Self {
            location,
            condition: format!("{} - {}", current.condition.label, current.condition.description),
            temperature: temperature.format(current.temperature_c),
            feels_like: temperature.format(current.feels_like_c),
            humidity: format!("{}%", current.humidity_pct),
            wind: format!("{} m/s", current.wind_speed_mps),
            pressure: format!("{} hPa", current.pressure_hpa),
            icon_url: current.condition.icon_url(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRow {
    pub time: String,
    pub condition: String,
    pub temperature: String,
    pub humidity: String,
    pub wind: String,
}

impl ForecastRow {
    pub fn new(entry: &ForecastEntry, temperature: TemperatureDisplay) -> Self {
        let time = entry
            .time()
            .map(|t| t.format("%a %d %b %H:%M").to_string())
            .unwrap_or_else(|| entry.timestamp.to_string());

        Self {
            time,
            condition: entry.condition.description.clone(),
            temperature: temperature.format(entry.temperature_c),
            humidity: format!("{}%", entry.humidity_pct),
            wind: format!("{} m/s", entry.wind_speed_mps),
        }
    }
}
