use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::domain::{
    forecast::leading, BuildingParameters, HeatPumpParameters, Mode, PriceForecast,
    WeatherForecast,
};
use crate::error::{OptimizerError, Result};
use crate::simulation::ThermalSimulator;

/// Default planning horizon (hours)
pub const DEFAULT_HORIZON_HOURS: usize = 24;
/// Hard cap on the planning horizon, one week
pub const MAX_HORIZON_HOURS: usize = 168;

/// Indoor comfort band, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComfortBand {
    pub min_c: f64,
    pub max_c: f64,
}

impl ComfortBand {
    pub fn new(min_c: f64, max_c: f64) -> Result<Self> {
        if min_c.is_nan() || max_c.is_nan() || min_c >= max_c {
            return Err(OptimizerError::InvalidComfortBand { min: min_c, max: max_c });
        }
        Ok(Self { min_c, max_c })
    }

    /// Starting temperature assumed when no measurement is available
    pub fn midpoint(&self) -> f64 {
        (self.min_c + self.max_c) / 2.0
    }
}

/// Everything one optimisation run needs. Consumed by a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationInput {
    pub building: BuildingParameters,
    pub heat_pump: HeatPumpParameters,
    pub current_indoor_temp_c: f64,
    pub outdoor_temps_c: Vec<f64>,
    /// EUR/MWh
    pub electricity_prices: Vec<f64>,
    /// W/m²
    pub solar_radiation_w_m2: Vec<f64>,
    pub comfort_min_temp_c: f64,
    pub comfort_max_temp_c: f64,
    pub start_time: DateTime<FixedOffset>,
}

impl OptimizationInput {
    /// Assembles an input from acquisition-layer forecasts, keeping the first
    /// `horizon` hours of each series.
    #[allow(clippy::too_many_arguments)]
    pub fn from_forecasts(
        building: BuildingParameters,
        heat_pump: HeatPumpParameters,
        current_indoor_temp_c: f64,
        weather: &WeatherForecast,
        prices: &PriceForecast,
        comfort: ComfortBand,
        start_time: DateTime<FixedOffset>,
        horizon: usize,
    ) -> Result<Self> {
        let input = Self {
            building,
            heat_pump,
            current_indoor_temp_c,
            outdoor_temps_c: leading(&weather.temperature, horizon),
            electricity_prices: leading(&prices.prices, horizon),
            solar_radiation_w_m2: leading(&weather.solar_radiation, horizon),
            comfort_min_temp_c: comfort.min_c,
            comfort_max_temp_c: comfort.max_c,
            start_time,
        };
        input.validate_horizon(horizon, MAX_HORIZON_HOURS)?;
        Ok(input)
    }

    /// Number of hours covered by the forecasts
    pub fn horizon(&self) -> usize {
        self.outdoor_temps_c.len()
    }

    pub fn comfort_band(&self) -> Result<ComfortBand> {
        ComfortBand::new(self.comfort_min_temp_c, self.comfort_max_temp_c)
    }

    /// Checks the input against an explicit horizon. Runs before any
    /// simulation.
    pub fn validate_horizon(&self, horizon: usize, max_horizon: usize) -> Result<()> {
        if horizon == 0 {
            return Err(OptimizerError::EmptyHorizon);
        }
        if horizon > max_horizon {
            return Err(OptimizerError::HorizonTooLong {
                hours: horizon,
                max: max_horizon,
            });
        }
        validate_series("outdoor_temps", &self.outdoor_temps_c, horizon)?;
        validate_series("electricity_prices", &self.electricity_prices, horizon)?;
        validate_series("solar_radiation", &self.solar_radiation_w_m2, horizon)?;
        if !self.current_indoor_temp_c.is_finite() {
            return Err(OptimizerError::NonFiniteValue {
                series: "current_indoor_temp",
                index: 0,
            });
        }
        self.comfort_band()?;
        Ok(())
    }

    /// Validates using the outdoor series as the horizon.
    pub fn validate(&self, max_horizon: usize) -> Result<()> {
        self.validate_horizon(self.horizon(), max_horizon)
    }
}

/// Length and finiteness check shared by every forecast series
pub fn validate_series(series: &'static str, values: &[f64], expected: usize) -> Result<()> {
    if values.len() != expected {
        return Err(OptimizerError::ForecastLengthMismatch {
            series,
            expected,
            actual: values.len(),
        });
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(OptimizerError::NonFiniteValue { series, index });
    }
    Ok(())
}

/// Hour-by-hour decisions produced by a scheduling strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub modes: Vec<Mode>,
    /// Indoor temperature at the end of each hour
    pub trajectory: Vec<f64>,
}

/// Decides a mode for every hour of a validated input
pub trait SchedulingStrategy: Send + Sync {
    fn plan(&self, simulator: &ThermalSimulator, input: &OptimizationInput) -> Plan;

    /// Tag recorded on every result
    fn version(&self) -> &str;
}
