use serde::Serialize;

use crate::domain::{BuildingParameters, HeatPumpParameters, Mode};

/// Seconds in one simulation step
pub const HOUR_SECONDS: f64 = 3600.0;

/// Glazed area as a share of floor area
pub const WINDOW_TO_FLOOR_RATIO: f64 = 0.15;

/// Solar transmittance (g-value) of double glazing
pub const SOLAR_GAIN_FACTOR: f64 = 0.7;

/// Heat flows behind a single step, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatBalance {
    pub heat_loss_w: f64,
    pub solar_gain_w: f64,
    pub heat_pump_w: f64,
    pub net_heat_flow_w: f64,
}

/// Single-node RC model of a building heated by one heat pump.
///
/// Physics:
/// - C * dT/dt = Q_hp + Q_solar - UA * (T_in - T_out)
/// - Q_hp = COP(T_out, T_in) * P_rated * fraction
/// - Q_solar = G * A_window * g
///
/// The output temperature is deliberately left unclamped.
#[derive(Debug, Clone)]
pub struct ThermalSimulator {
    heat_pump: HeatPumpParameters,
    ua_w_per_k: f64,
    thermal_mass_j_per_k: f64,
    window_area_m2: f64,
    solar_gain_factor: f64,
}

impl ThermalSimulator {
    pub fn new(building: &BuildingParameters, heat_pump: &HeatPumpParameters) -> Self {
        Self {
            heat_pump: *heat_pump,
            ua_w_per_k: building.ua_w_per_k(),
            thermal_mass_j_per_k: building.thermal_mass_j_per_k(),
            window_area_m2: WINDOW_TO_FLOOR_RATIO * building.floor_area_m2(),
            solar_gain_factor: SOLAR_GAIN_FACTOR,
        }
    }

    pub fn ua_w_per_k(&self) -> f64 {
        self.ua_w_per_k
    }

    pub fn thermal_mass_j_per_k(&self) -> f64 {
        self.thermal_mass_j_per_k
    }

    pub fn window_area_m2(&self) -> f64 {
        self.window_area_m2
    }

    pub fn heat_pump(&self) -> &HeatPumpParameters {
        &self.heat_pump
    }

    /// Energy balance for one step without advancing the temperature
    pub fn heat_balance(
        &self,
        indoor_temp_c: f64,
        outdoor_temp_c: f64,
        heat_pump_on: bool,
        power_fraction: f64,
        solar_radiation_w_m2: f64,
    ) -> HeatBalance {
        let heat_loss_w = self.ua_w_per_k * (indoor_temp_c - outdoor_temp_c);
        let solar_gain_w = solar_radiation_w_m2 * self.window_area_m2 * self.solar_gain_factor;
        let heat_pump_w = if heat_pump_on {
            let electric_w = self.heat_pump.rated_power_kw() * power_fraction * 1000.0;
            self.heat_pump.cop(outdoor_temp_c, indoor_temp_c) * electric_w
        } else {
            0.0
        };

        HeatBalance {
            heat_loss_w,
            solar_gain_w,
            heat_pump_w,
            net_heat_flow_w: heat_pump_w + solar_gain_w - heat_loss_w,
        }
    }

    /// Advance the indoor temperature by `dt_seconds`.
    pub fn simulate_step(
        &self,
        indoor_temp_c: f64,
        outdoor_temp_c: f64,
        heat_pump_on: bool,
        power_fraction: f64,
        solar_radiation_w_m2: f64,
        dt_seconds: f64,
    ) -> f64 {
        let balance = self.heat_balance(
            indoor_temp_c,
            outdoor_temp_c,
            heat_pump_on,
            power_fraction,
            solar_radiation_w_m2,
        );
        indoor_temp_c + balance.net_heat_flow_w * dt_seconds / self.thermal_mass_j_per_k
    }

    /// One-hour step
    pub fn simulate_hour(
        &self,
        indoor_temp_c: f64,
        outdoor_temp_c: f64,
        heat_pump_on: bool,
        power_fraction: f64,
        solar_radiation_w_m2: f64,
    ) -> f64 {
        self.simulate_step(
            indoor_temp_c,
            outdoor_temp_c,
            heat_pump_on,
            power_fraction,
            solar_radiation_w_m2,
            HOUR_SECONDS,
        )
    }

    /// One-hour step in the given mode
    pub fn simulate_mode(
        &self,
        indoor_temp_c: f64,
        outdoor_temp_c: f64,
        mode: Mode,
        solar_radiation_w_m2: f64,
    ) -> f64 {
        self.simulate_hour(
            indoor_temp_c,
            outdoor_temp_c,
            mode.is_on(),
            mode.power_fraction(),
            solar_radiation_w_m2,
        )
    }

    /// Hour-by-hour trajectory for an on/off schedule.
    ///
    /// Every "on" hour runs at the NORMAL power fraction regardless of the
    /// mode the caller had in mind; the always-on baseline relies on this.
    /// Series are walked in lockstep and the result has one temperature per
    /// hour (the state at the end of that hour). Callers validate lengths.
    pub fn simulate_day(
        &self,
        initial_temp_c: f64,
        outdoor_temps_c: &[f64],
        on_off_schedule: &[bool],
        solar_radiation_w_m2: &[f64],
    ) -> Vec<f64> {
        outdoor_temps_c
            .iter()
            .zip(on_off_schedule)
            .zip(solar_radiation_w_m2)
            .scan(initial_temp_c, |indoor, ((&outdoor, &on), &solar)| {
                *indoor = self.simulate_hour(
                    *indoor,
                    outdoor,
                    on,
                    Mode::Normal.power_fraction(),
                    solar,
                );
                Some(*indoor)
            })
            .collect()
    }

    /// Electrical energy drawn over one hour in `mode` (kWh).
    ///
    /// A nameplate lookup: rated power times the mode's fraction, independent
    /// of the heat actually delivered.
    pub fn estimate_power_consumption(
        &self,
        _outdoor_temp_c: f64,
        _indoor_temp_c: f64,
        mode: Mode,
    ) -> f64 {
        self.heat_pump.rated_power_kw() * mode.power_fraction()
    }
}
