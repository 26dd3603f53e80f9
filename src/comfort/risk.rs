use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};
use tracing::warn;
use validator::Validate;

use super::ComfortScorer;
use crate::domain::Mode;
use crate::error::{OptimizerError, Result};
use crate::optimizer::validate_series;
use crate::simulation::ThermalSimulator;

const PIPE_FREEZE_WARNING: &str = "⚠️ CRITICAL: Risk of pipe freezing!";

/// Warning and recommendation thresholds for a proposed schedule
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ComfortRiskThresholds {
    /// Absolute indoor floor below which pipes may freeze (°C)
    pub pipe_freeze_c: f64,
    /// Hours outside the band tolerated before flagging the plan
    #[validate(range(max = 168))]
    pub uncomfortable_hours: usize,
    #[validate(range(min = 0.0, max = 100.0))]
    pub good_score: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub acceptable_score: f64,
}

impl Default for ComfortRiskThresholds {
    fn default() -> Self {
        Self {
            pipe_freeze_c: 16.0,
            uncomfortable_hours: 6,
            good_score: 90.0,
            acceptable_score: 70.0,
        }
    }
}

/// Assessment of a caller-supplied schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComfortRiskReport {
    pub comfort_score: f64,
    pub min_predicted_temp_c: f64,
    pub max_predicted_temp_c: f64,
    pub hours_outside: usize,
    pub warnings: Vec<String>,
    pub recommendation: String,
}

impl ComfortRiskReport {
    pub fn pipe_freeze_risk(&self, thresholds: &ComfortRiskThresholds) -> bool {
        self.min_predicted_temp_c < thresholds.pipe_freeze_c
    }
}

/// Simulates `proposed_modes` with [`ThermalSimulator::simulate_day`] and
/// scores the result. Only the on/off state of each mode matters here.
/// Schedules longer than `max_horizon_hours` are rejected before simulating.
#[allow(clippy::too_many_arguments)]
pub fn assess_schedule(
    simulator: &ThermalSimulator,
    initial_temp_c: f64,
    outdoor_temps_c: &[f64],
    proposed_modes: &[Mode],
    solar_radiation_w_m2: &[f64],
    comfort_min: f64,
    comfort_max: f64,
    thresholds: &ComfortRiskThresholds,
    max_horizon_hours: usize,
) -> Result<ComfortRiskReport> {
    if comfort_max <= comfort_min {
        return Err(OptimizerError::InvalidComfortBand {
            min: comfort_min,
            max: comfort_max,
        });
    }
    let hours = proposed_modes.len();
    if hours == 0 {
        return Err(OptimizerError::EmptyHorizon);
    }
    if hours > max_horizon_hours {
        return Err(OptimizerError::HorizonTooLong {
            hours,
            max: max_horizon_hours,
        });
    }
    validate_series("outdoor_temps", outdoor_temps_c, hours)?;
    validate_series("solar_radiation", solar_radiation_w_m2, hours)?;

    let on_off: Vec<bool> = proposed_modes.iter().map(|m| m.is_on()).collect();
    let trajectory =
        simulator.simulate_day(initial_temp_c, outdoor_temps_c, &on_off, solar_radiation_w_m2);
    let score = ComfortScorer.score(&trajectory, comfort_min, comfort_max);

    let (min_temp, max_temp) = match trajectory.iter().copied().minmax_by(f64::total_cmp) {
        MinMaxResult::MinMax(lo, hi) => (lo, hi),
        MinMaxResult::OneElement(t) => (t, t),
        MinMaxResult::NoElements => (initial_temp_c, initial_temp_c),
    };

    let mut warnings = Vec::new();
    if min_temp < comfort_min {
        warnings.push(format!("Temperature may drop to {min_temp:.1}°C"));
    }
    if min_temp < thresholds.pipe_freeze_c {
        warnings.push(PIPE_FREEZE_WARNING.to_string());
    }
    if score.hours_outside > thresholds.uncomfortable_hours {
        warnings.push(format!("Uncomfortable for {} hours", score.hours_outside));
    }
    for warning in &warnings {
        warn!(min_temp_c = min_temp, score = score.score, "{warning}");
    }

    let recommendation = if score.score >= thresholds.good_score {
        "Schedule looks good!"
    } else if score.score >= thresholds.acceptable_score {
        "Acceptable, but consider more heating during cold periods"
    } else {
        "Not recommended - temperature will drop too much"
    };

    Ok(ComfortRiskReport {
        comfort_score: score.score,
        min_predicted_temp_c: min_temp,
        max_predicted_temp_c: max_temp,
        hours_outside: score.hours_outside,
        warnings,
        recommendation: recommendation.to_string(),
    })
}
