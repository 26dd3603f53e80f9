pub mod cost;
pub mod explain;
pub mod greedy;
pub mod pricing;
pub mod realtime;
pub mod types;

pub use greedy::*;
pub use pricing::*;
pub use realtime::*;
pub use types::*;

use tracing::info;

use crate::domain::OptimizationResult;
use crate::error::Result;
use crate::simulation::ThermalSimulator;

/// Runs a scheduling strategy, then prices, baselines and annotates its plan.
pub struct HeatPumpOptimizer {
    pub strategy: Box<dyn SchedulingStrategy>,
    pub max_horizon_hours: usize,
}

impl Default for HeatPumpOptimizer {
    fn default() -> Self {
        Self {
            strategy: Box::new(GreedyScheduler::default()),
            max_horizon_hours: MAX_HORIZON_HOURS,
        }
    }
}

impl HeatPumpOptimizer {
    pub fn new(strategy: Box<dyn SchedulingStrategy>, max_horizon_hours: usize) -> Self {
        Self {
            strategy,
            max_horizon_hours,
        }
    }

    /// Validates `input`, then plans the whole horizon. Pure apart from logging.
    pub fn optimize(&self, input: &OptimizationInput) -> Result<OptimizationResult> {
        input.validate(self.max_horizon_hours)?;
        info!(
            hours = input.horizon(),
            start_time = %input.start_time,
            "starting heat pump optimization"
        );

        let simulator = ThermalSimulator::new(&input.building, &input.heat_pump);
        let plan = self.strategy.plan(&simulator, input);
        let (trajectory, final_indoor_temp_c) =
            start_of_hour_temps(input.current_indoor_temp_c, &plan.trajectory);

        let total_cost = cost::schedule_cost(
            &simulator,
            &plan.modes,
            &input.electricity_prices,
            &input.outdoor_temps_c,
            &trajectory,
        );
        let baseline_cost = cost::baseline_cost(
            &simulator,
            input.current_indoor_temp_c,
            &input.electricity_prices,
            &input.outdoor_temps_c,
            &input.solar_radiation_w_m2,
        );
        let total_energy_kwh = cost::schedule_energy_kwh(
            &simulator,
            &plan.modes,
            &input.outdoor_temps_c,
            &trajectory,
        );
        let entries = explain::annotate(
            &plan.modes,
            &trajectory,
            &input.outdoor_temps_c,
            &input.electricity_prices,
            input.start_time,
        );

        let savings = baseline_cost - total_cost;
        info!(total_cost, baseline_cost, savings, "optimization complete");

        Ok(OptimizationResult {
            entries,
            total_cost,
            baseline_cost,
            savings,
            total_energy_kwh,
            trajectory,
            final_indoor_temp_c,
            optimizer_version: self.strategy.version().to_string(),
        })
    }
}

/// Shifts end-of-hour temperatures to start-of-hour: hour 0 carries the
/// measured temperature, the last end-of-hour value is returned separately.
fn start_of_hour_temps(initial_temp_c: f64, end_of_hour: &[f64]) -> (Vec<f64>, f64) {
    let final_temp_c = end_of_hour.last().copied().unwrap_or(initial_temp_c);
    let start_of_hour = std::iter::once(initial_temp_c)
        .chain(end_of_hour.iter().copied())
        .take(end_of_hour.len())
        .collect();
    (start_of_hour, final_temp_c)
}
