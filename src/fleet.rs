use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::comfort::{assess_schedule, ComfortRiskReport, ComfortRiskThresholds};
use crate::domain::{
    BuildingParameters, HeatPumpParameters, Mode, OptimizationResult, PriceForecast,
    WeatherForecast,
};
use crate::error::OptimizerError;
use crate::optimizer::{ComfortBand, HeatPumpOptimizer, OptimizationInput};
use crate::simulation::ThermalSimulator;

/// A registered heat pump installation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSpec {
    pub device_id: String,
    pub building: BuildingParameters,
    pub heat_pump: HeatPumpParameters,
    pub comfort: ComfortBand,
    /// Falls back to the comfort band midpoint
    #[serde(default)]
    pub current_indoor_temp_c: Option<f64>,
    /// Manually proposed schedule to check for comfort risk
    #[serde(default)]
    pub proposed_modes: Option<Vec<String>>,
}

impl DeviceSpec {
    pub fn current_indoor_temp_c(&self) -> f64 {
        self.current_indoor_temp_c
            .unwrap_or_else(|| self.comfort.midpoint())
    }
}

/// Devices plus the forecasts they share
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub start_time: DateTime<FixedOffset>,
    pub weather: WeatherForecast,
    pub prices: PriceForecast,
    pub devices: Vec<DeviceSpec>,
}

impl Scenario {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing scenario {}", path.display()))
    }

    pub fn input_for(&self, device: &DeviceSpec, horizon: usize) -> Result<OptimizationInput, OptimizerError> {
        OptimizationInput::from_forecasts(
            device.building,
            device.heat_pump,
            device.current_indoor_temp_c(),
            &self.weather,
            &self.prices,
            device.comfort,
            self.start_time,
            horizon,
        )
    }
}

#[derive(Debug, Serialize)]
pub struct DeviceOutcome {
    pub device_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<OptimizationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comfort_risk: Option<ComfortRiskReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Optimises independent inputs concurrently on the blocking pool.
/// Output order follows input order.
pub async fn optimize_fleet(
    optimizer: Arc<HeatPumpOptimizer>,
    requests: Vec<(String, OptimizationInput)>,
) -> Result<Vec<(String, Result<OptimizationResult, OptimizerError>)>> {
    let mut tasks = JoinSet::new();
    for (index, (device_id, input)) in requests.into_iter().enumerate() {
        let optimizer = Arc::clone(&optimizer);
        tasks.spawn_blocking(move || {
            let result = optimizer.optimize(&input);
            (index, device_id, result)
        });
    }

    let mut results = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        results.push(joined.context("optimization task failed")?);
    }
    results.sort_by_key(|(index, _, _)| *index);

    Ok(results
        .into_iter()
        .map(|(_, device_id, result)| (device_id, result))
        .collect())
}

fn comfort_risk_for(
    scenario: &Scenario,
    device: &DeviceSpec,
    proposed: &[String],
    thresholds: &ComfortRiskThresholds,
    max_horizon_hours: usize,
) -> Result<ComfortRiskReport, OptimizerError> {
    let modes = proposed
        .iter()
        .map(|name| Mode::parse(name))
        .collect::<Result<Vec<_>, _>>()?;
    let hours = modes.len();
    let simulator = ThermalSimulator::new(&device.building, &device.heat_pump);
    assess_schedule(
        &simulator,
        device.current_indoor_temp_c(),
        &scenario.weather.temperature[..hours.min(scenario.weather.temperature.len())],
        &modes,
        &scenario.weather.solar_radiation[..hours.min(scenario.weather.solar_radiation.len())],
        device.comfort.min_c,
        device.comfort.max_c,
        thresholds,
        max_horizon_hours,
    )
}

/// Plans every device in the scenario and checks any proposed schedules.
pub async fn run_scenario(
    scenario: &Scenario,
    optimizer: Arc<HeatPumpOptimizer>,
    horizon: usize,
    thresholds: &ComfortRiskThresholds,
) -> Result<Vec<DeviceOutcome>> {
    let mut outcomes: Vec<DeviceOutcome> = Vec::with_capacity(scenario.devices.len());
    let mut requests = Vec::new();
    // Outcome index of each request; device ids need not be unique
    let mut slots = Vec::new();

    for device in &scenario.devices {
        let comfort_risk = match &device.proposed_modes {
            Some(proposed) => match comfort_risk_for(
                scenario,
                device,
                proposed,
                thresholds,
                optimizer.max_horizon_hours,
            ) {
                Ok(report) => Some(report),
                Err(e) => {
                    warn!(device_id = %device.device_id, error = %e, "comfort risk check rejected");
                    None
                }
            },
            None => None,
        };

        let mut outcome = DeviceOutcome {
            device_id: device.device_id.clone(),
            plan: None,
            comfort_risk,
            error: None,
        };
        match scenario.input_for(device, horizon) {
            Ok(input) => {
                slots.push(outcomes.len());
                requests.push((device.device_id.clone(), input));
            }
            Err(e) => {
                warn!(device_id = %device.device_id, error = %e, "invalid optimization input");
                outcome.error = Some(e.to_string());
            }
        }
        outcomes.push(outcome);
    }

    info!(devices = requests.len(), horizon, "optimizing fleet");
    let results = optimize_fleet(optimizer, requests).await?;
    for (slot, (_, result)) in slots.into_iter().zip(results) {
        let outcome = &mut outcomes[slot];
        match result {
            Ok(plan) => outcome.plan = Some(plan),
            Err(e) => outcome.error = Some(e.to_string()),
        }
    }

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HeatPumpType, InsulationLevel};
    use crate::optimizer::MAX_HORIZON_HOURS;
    use chrono::TimeZone;

    fn scenario() -> Scenario {
        let device = |id: &str, power: f64| DeviceSpec {
            device_id: id.to_string(),
            building: BuildingParameters::new(110.0, 275.0, InsulationLevel::Low).unwrap(),
            heat_pump: HeatPumpParameters::new(HeatPumpType::AirSource, power, 3.2).unwrap(),
            comfort: ComfortBand::new(19.0, 23.0).unwrap(),
            current_indoor_temp_c: None,
            proposed_modes: None,
        };
        Scenario {
            start_time: FixedOffset::east_opt(7200)
                .unwrap()
                .with_ymd_and_hms(2025, 1, 10, 0, 0, 0)
                .unwrap(),
            weather: WeatherForecast {
                timestamps: vec![],
                temperature: (0..48).map(|h| -5.0 - (h % 24) as f64 * 0.2).collect(),
                solar_radiation: (0..48).map(|h| if (10..15).contains(&(h % 24)) { 150.0 } else { 0.0 }).collect(),
            },
            prices: PriceForecast {
                timestamps: vec![],
                prices: (0..24).map(|h| 40.0 + (h as f64 - 12.0).abs() * 5.0).collect(),
            },
            devices: vec![device("hp-1", 6.0), device("hp-2", 9.0), device("hp-3", 4.0)],
        }
    }

    #[test]
    fn test_current_temp_defaults_to_midpoint() {
        let s = scenario();
        assert_eq!(s.devices[0].current_indoor_temp_c(), 21.0);
    }

    #[tokio::test]
    async fn test_fleet_keeps_order_and_matches_serial() {
        let s = scenario();
        let optimizer = Arc::new(HeatPumpOptimizer::default());
        let requests: Vec<_> = s
            .devices
            .iter()
            .map(|d| (d.device_id.clone(), s.input_for(d, 24).unwrap()))
            .collect();

        let serial: Vec<_> = requests
            .iter()
            .map(|(_, input)| optimizer.optimize(input).unwrap())
            .collect();
        let parallel = optimize_fleet(Arc::clone(&optimizer), requests).await.unwrap();

        let ids: Vec<_> = parallel.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["hp-1", "hp-2", "hp-3"]);
        for ((_, result), expected) in parallel.into_iter().zip(serial) {
            assert_eq!(result.unwrap(), expected);
        }
    }

    #[tokio::test]
    async fn test_run_scenario_reports_per_device_errors() {
        let mut s = scenario();
        s.prices.prices.truncate(20);
        s.devices[1].proposed_modes = Some(vec!["OFF".to_string(); 24]);

        let outcomes = run_scenario(
            &s,
            Arc::new(HeatPumpOptimizer::default()),
            24,
            &ComfortRiskThresholds::default(),
        )
        .await
        .unwrap();

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.plan.is_none() && o.error.is_some()));
        assert!(outcomes[1].comfort_risk.is_some());
    }

    #[tokio::test]
    async fn test_run_scenario_keeps_devices_with_shared_id() {
        let mut s = scenario();
        s.devices[0].device_id = "dup".to_string();
        s.devices[1].device_id = "dup".to_string();

        let outcomes = run_scenario(
            &s,
            Arc::new(HeatPumpOptimizer::default()),
            24,
            &ComfortRiskThresholds::default(),
        )
        .await
        .unwrap();

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.plan.is_some() && o.error.is_none()));
        let costs: Vec<f64> = outcomes
            .iter()
            .map(|o| o.plan.as_ref().map_or(f64::NAN, |p| p.total_cost))
            .collect();
        // 6 kW and 9 kW pumps under the same id each keep their own plan
        let optimizer = HeatPumpOptimizer::default();
        for (device, cost) in s.devices.iter().zip(&costs) {
            let expected = optimizer.optimize(&s.input_for(device, 24).unwrap()).unwrap();
            assert_eq!(*cost, expected.total_cost);
        }
        assert_ne!(costs[0], costs[1]);
    }

    #[test]
    fn test_unknown_proposed_mode() {
        let s = scenario();
        let err = comfort_risk_for(
            &s,
            &s.devices[0],
            &["NORMAL".to_string(), "TURBO".to_string()],
            &ComfortRiskThresholds::default(),
            MAX_HORIZON_HOURS,
        )
        .unwrap_err();
        assert_eq!(err, OptimizerError::UnknownMode("TURBO".into()));
    }
}
