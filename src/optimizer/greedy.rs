use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{OptimizationInput, Plan, PriceCategory, PriceThresholds, SchedulingStrategy};
use crate::domain::Mode;
use crate::simulation::ThermalSimulator;

/// Greedy, price-driven scheduler:
/// - BOOST in cheap hours to pre-heat the thermal mass
/// - ECO in expensive hours while there is a buffer above comfort_min
/// - NORMAL otherwise
///
/// Single forward pass; an hour's decision is never revisited once later
/// hours are known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreedyScheduler {
    pub thresholds: PriceThresholds,
    /// Buffer above comfort_min required to coast in ECO during an expensive hour (°C)
    pub eco_margin_c: f64,
    /// Buffer above comfort_min required to stay in NORMAL during an expensive hour (°C)
    pub normal_margin_c: f64,
}

impl Default for GreedyScheduler {
    fn default() -> Self {
        Self {
            thresholds: PriceThresholds::default(),
            eco_margin_c: 2.0,
            normal_margin_c: 0.5,
        }
    }
}

/// Outcome of one scheduled hour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourDecision {
    pub mode: Mode,
    pub indoor_temp_c: f64,
    /// The first choice undershot comfort_min and was replaced by BOOST
    pub safety_corrected: bool,
}

impl GreedyScheduler {
    pub fn new(thresholds: PriceThresholds, eco_margin_c: f64, normal_margin_c: f64) -> Self {
        Self {
            thresholds,
            eco_margin_c,
            normal_margin_c,
        }
    }

    /// Mode before the running temperature is considered: BOOST for cheap
    /// hours, NORMAL for everything else.
    pub fn initial_mode(category: PriceCategory) -> Mode {
        match category {
            PriceCategory::Cheap => Mode::Boost,
            PriceCategory::Moderate | PriceCategory::Expensive => Mode::Normal,
        }
    }

    /// Expensive hours trade heating for the buffer above comfort_min.
    pub fn choose_mode(&self, category: PriceCategory, indoor_temp_c: f64, comfort_min: f64) -> Mode {
        match category {
            PriceCategory::Expensive if indoor_temp_c > comfort_min + self.eco_margin_c => Mode::Eco,
            PriceCategory::Expensive if indoor_temp_c > comfort_min + self.normal_margin_c => {
                Mode::Normal
            }
            PriceCategory::Expensive => Mode::Boost,
            _ => Self::initial_mode(category),
        }
    }

    /// Simulates one hour in the chosen mode and applies the safety correction:
    /// an undershoot of comfort_min is re-simulated at full power from the same
    /// starting temperature, and that result is kept even if it still undershoots.
    #[allow(clippy::too_many_arguments)]
    pub fn step_hour(
        &self,
        simulator: &ThermalSimulator,
        hour: usize,
        category: PriceCategory,
        indoor_temp_c: f64,
        outdoor_temp_c: f64,
        solar_radiation_w_m2: f64,
        comfort_min: f64,
    ) -> HourDecision {
        let mode = self.choose_mode(category, indoor_temp_c, comfort_min);
        let t_new = simulator.simulate_mode(indoor_temp_c, outdoor_temp_c, mode, solar_radiation_w_m2);

        if t_new >= comfort_min {
            return HourDecision {
                mode,
                indoor_temp_c: t_new,
                safety_corrected: false,
            };
        }

        let corrected =
            simulator.simulate_mode(indoor_temp_c, outdoor_temp_c, Mode::Boost, solar_radiation_w_m2);
        debug!(
            hour,
            rejected_mode = %mode,
            undershoot_c = comfort_min - t_new,
            "safety correction: forcing BOOST"
        );
        if corrected < comfort_min {
            warn!(
                hour,
                indoor_temp_c = corrected,
                comfort_min,
                "rated power insufficient to hold comfort_min"
            );
        }

        HourDecision {
            mode: Mode::Boost,
            indoor_temp_c: corrected,
            safety_corrected: true,
        }
    }

    /// Full forward pass over the horizon. Each hour starts from the previous
    /// hour's (possibly corrected) temperature.
    pub fn decide(&self, simulator: &ThermalSimulator, input: &OptimizationInput) -> Vec<HourDecision> {
        let categories = self.thresholds.classify_all(&input.electricity_prices);
        let hours = categories.len();

        let (_, decisions) = (0..hours).fold(
            (input.current_indoor_temp_c, Vec::with_capacity(hours)),
            |(indoor_temp_c, mut decisions), hour| {
                let decision = self.step_hour(
                    simulator,
                    hour,
                    categories[hour],
                    indoor_temp_c,
                    input.outdoor_temps_c[hour],
                    input.solar_radiation_w_m2[hour],
                    input.comfort_min_temp_c,
                );
                decisions.push(decision);
                (decision.indoor_temp_c, decisions)
            },
        );
        decisions
    }
}

impl SchedulingStrategy for GreedyScheduler {
    fn plan(&self, simulator: &ThermalSimulator, input: &OptimizationInput) -> Plan {
        let decisions = self.decide(simulator, input);
        Plan {
            modes: decisions.iter().map(|d| d.mode).collect(),
            trajectory: decisions.iter().map(|d| d.indoor_temp_c).collect(),
        }
    }

    fn version(&self) -> &str {
        "greedy-v1.0"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BuildingParameters, HeatPumpParameters, HeatPumpType, InsulationLevel};
    use chrono::{FixedOffset, TimeZone};

    fn simulator(rated_power_kw: f64) -> ThermalSimulator {
        let building = BuildingParameters::new(100.0, 250.0, InsulationLevel::Medium).unwrap();
        let heat_pump =
            HeatPumpParameters::new(HeatPumpType::AirSource, rated_power_kw, 3.5).unwrap();
        ThermalSimulator::new(&building, &heat_pump)
    }

    fn input(prices: Vec<f64>, outdoor: f64, start_temp: f64) -> OptimizationInput {
        let hours = prices.len();
        OptimizationInput {
            building: BuildingParameters::new(100.0, 250.0, InsulationLevel::Medium).unwrap(),
            heat_pump: HeatPumpParameters::new(HeatPumpType::AirSource, 6.0, 3.5).unwrap(),
            current_indoor_temp_c: start_temp,
            outdoor_temps_c: vec![outdoor; hours],
            electricity_prices: prices,
            solar_radiation_w_m2: vec![0.0; hours],
            comfort_min_temp_c: 19.0,
            comfort_max_temp_c: 23.0,
            start_time: FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(2025, 1, 15, 0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_expensive_hour_mode_selection() {
        let scheduler = GreedyScheduler::default();
        assert_eq!(scheduler.choose_mode(PriceCategory::Expensive, 21.5, 19.0), Mode::Eco);
        assert_eq!(scheduler.choose_mode(PriceCategory::Expensive, 21.0, 19.0), Mode::Normal);
        assert_eq!(scheduler.choose_mode(PriceCategory::Expensive, 19.6, 19.0), Mode::Normal);
        assert_eq!(scheduler.choose_mode(PriceCategory::Expensive, 19.5, 19.0), Mode::Boost);
        assert_eq!(scheduler.choose_mode(PriceCategory::Cheap, 30.0, 19.0), Mode::Boost);
        assert_eq!(scheduler.choose_mode(PriceCategory::Moderate, 10.0, 19.0), Mode::Normal);
    }

    #[test]
    fn test_flat_prices_never_boost_from_price() {
        let sim = simulator(6.0);
        // Mild weather: NORMAL holds comfort, so nothing is corrected either
        let plan = GreedyScheduler::default().plan(&sim, &input(vec![80.0; 24], 10.0, 21.0));
        assert!(plan.modes.iter().all(|m| *m == Mode::Normal));
    }

    #[test]
    fn test_safety_correction_matches_boost_simulation() {
        let sim = simulator(1.0);
        // Expensive hour with 2.1 °C of buffer -> ECO, which undershoots at -40 °C
        let decision = GreedyScheduler::default().step_hour(
            &sim,
            0,
            PriceCategory::Expensive,
            21.5,
            -40.0,
            0.0,
            19.4,
        );
        let eco = sim.simulate_mode(21.5, -40.0, Mode::Eco, 0.0);
        assert!(eco < 19.4);
        assert!(decision.safety_corrected);
        assert_eq!(decision.mode, Mode::Boost);
        assert_eq!(decision.indoor_temp_c, sim.simulate_mode(21.5, -40.0, Mode::Boost, 0.0));
        assert!(decision.indoor_temp_c >= 19.4);
    }

    #[test]
    fn test_undersized_pump_accepts_undershoot() {
        let sim = simulator(0.5);
        let decision = GreedyScheduler::default().step_hour(
            &sim,
            0,
            PriceCategory::Moderate,
            19.0,
            -25.0,
            0.0,
            19.0,
        );
        assert!(decision.safety_corrected);
        assert_eq!(decision.mode, Mode::Boost);
        assert!(decision.indoor_temp_c < 19.0);
    }

    #[test]
    fn test_temperature_carries_between_hours() {
        let sim = simulator(6.0);
        let inp = input(vec![10.0, 100.0, 55.0, 10.0], -5.0, 21.0);
        let decisions = GreedyScheduler::default().decide(&sim, &inp);

        let mut t = inp.current_indoor_temp_c;
        for (hour, d) in decisions.iter().enumerate() {
            let expected = sim.simulate_mode(t, inp.outdoor_temps_c[hour], d.mode, 0.0);
            assert_eq!(d.indoor_temp_c, expected);
            t = d.indoor_temp_c;
        }
        assert_eq!(decisions[0].mode, Mode::Boost);
        assert_eq!(decisions[3].mode, Mode::Boost);
    }

    #[test]
    fn test_earlier_hours_are_not_revised() {
        // A cold snap late in the horizon must not change the first hours
        let sim = simulator(6.0);
        let prices = vec![50.0, 90.0, 10.0, 90.0, 90.0, 90.0];
        let mild = input(prices.clone(), 0.0, 22.0);
        let mut cold = mild.clone();
        cold.outdoor_temps_c[4] = -30.0;
        cold.outdoor_temps_c[5] = -30.0;

        let scheduler = GreedyScheduler::default();
        let a = scheduler.decide(&sim, &mild);
        let b = scheduler.decide(&sim, &cold);
        assert_eq!(a[..4], b[..4]);
    }
}
