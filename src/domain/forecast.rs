use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Hourly weather forecast as delivered by the acquisition layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherForecast {
    #[serde(default)]
    pub timestamps: Vec<DateTime<FixedOffset>>,
    /// Outdoor air temperature (°C)
    pub temperature: Vec<f64>,
    /// Global horizontal irradiance (W/m²)
    pub solar_radiation: Vec<f64>,
}

/// Day-ahead spot prices
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceForecast {
    #[serde(default)]
    pub timestamps: Vec<DateTime<FixedOffset>>,
    /// EUR/MWh
    pub prices: Vec<f64>,
}

/// First `horizon` values of a series, or the whole series if shorter.
pub(crate) fn leading(series: &[f64], horizon: usize) -> Vec<f64> {
    series.iter().take(horizon).copied().collect()
}
