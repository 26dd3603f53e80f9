use crate::domain::Mode;
use crate::simulation::ThermalSimulator;

/// EUR/MWh to EUR/kWh
const PER_MWH_TO_PER_KWH: f64 = 1.0 / 1000.0;

/// Cost of one hour (EUR)
pub fn hourly_cost(
    simulator: &ThermalSimulator,
    outdoor_temp_c: f64,
    indoor_temp_c: f64,
    mode: Mode,
    price_eur_mwh: f64,
) -> f64 {
    simulator.estimate_power_consumption(outdoor_temp_c, indoor_temp_c, mode)
        * price_eur_mwh
        * PER_MWH_TO_PER_KWH
}

/// Total cost of a schedule (EUR). Slices are walked in lockstep.
pub fn schedule_cost(
    simulator: &ThermalSimulator,
    modes: &[Mode],
    prices_eur_mwh: &[f64],
    outdoor_temps_c: &[f64],
    trajectory: &[f64],
) -> f64 {
    modes
        .iter()
        .zip(prices_eur_mwh)
        .zip(outdoor_temps_c.iter().zip(trajectory))
        .map(|((&mode, &price), (&outdoor, &indoor))| {
            hourly_cost(simulator, outdoor, indoor, mode, price)
        })
        .sum()
}

/// Estimated electricity use of a schedule (kWh)
pub fn schedule_energy_kwh(
    simulator: &ThermalSimulator,
    modes: &[Mode],
    outdoor_temps_c: &[f64],
    trajectory: &[f64],
) -> f64 {
    modes
        .iter()
        .zip(outdoor_temps_c.iter().zip(trajectory))
        .map(|(&mode, (&outdoor, &indoor))| {
            simulator.estimate_power_consumption(outdoor, indoor, mode)
        })
        .sum()
}

/// Cost of the naive strategy: heat pump on every hour, simulated through
/// `simulate_day` and priced as NORMAL.
pub fn baseline_cost(
    simulator: &ThermalSimulator,
    initial_temp_c: f64,
    prices_eur_mwh: &[f64],
    outdoor_temps_c: &[f64],
    solar_radiation_w_m2: &[f64],
) -> f64 {
    let hours = outdoor_temps_c.len();
    let trajectory = simulator.simulate_day(
        initial_temp_c,
        outdoor_temps_c,
        &vec![true; hours],
        solar_radiation_w_m2,
    );
    schedule_cost(
        simulator,
        &vec![Mode::Normal; hours],
        prices_eur_mwh,
        outdoor_temps_c,
        &trajectory,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BuildingParameters, HeatPumpParameters, HeatPumpType, InsulationLevel};

    fn simulator() -> ThermalSimulator {
        let building = BuildingParameters::new(100.0, 250.0, InsulationLevel::High).unwrap();
        let heat_pump = HeatPumpParameters::new(HeatPumpType::GroundSource, 5.0, 4.0).unwrap();
        ThermalSimulator::new(&building, &heat_pump)
    }

    #[test]
    fn test_hourly_cost_units() {
        // 5 kW BOOST for one hour at 100 EUR/MWh = 5 kWh * 0.1 EUR/kWh
        let cost = hourly_cost(&simulator(), -5.0, 21.0, Mode::Boost, 100.0);
        assert!((cost - 0.5).abs() < 1e-12);
        assert_eq!(hourly_cost(&simulator(), -5.0, 21.0, Mode::Off, 500.0), 0.0);
    }

    #[test]
    fn test_schedule_cost_sums_hours() {
        let sim = simulator();
        let modes = [Mode::Boost, Mode::Eco, Mode::Off];
        let prices = [20.0, 150.0, 300.0];
        let cost = schedule_cost(&sim, &modes, &prices, &[0.0; 3], &[21.0; 3]);
        // 5*0.02 + 1.5*0.15 + 0
        assert!((cost - 0.325).abs() < 1e-9);
        let energy = schedule_energy_kwh(&sim, &modes, &[0.0; 3], &[21.0; 3]);
        assert!((energy - 6.5).abs() < 1e-9);
    }

    #[test]
    fn test_baseline_is_normal_every_hour() {
        let sim = simulator();
        let prices: Vec<f64> = (0..24).map(|h| 40.0 + h as f64).collect();
        let cost = baseline_cost(&sim, 21.0, &prices, &[-10.0; 24], &[0.0; 24]);
        let expected: f64 = prices.iter().map(|p| 3.5 * p / 1000.0).sum();
        assert!((cost - expected).abs() < 1e-9);
    }

    #[test]
    fn test_negative_prices_reduce_cost() {
        let sim = simulator();
        let cost = schedule_cost(&sim, &[Mode::Boost], &[-20.0], &[0.0], &[21.0]);
        assert!(cost < 0.0);
    }
}
