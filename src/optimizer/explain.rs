use chrono::{DateTime, Duration, FixedOffset};

use crate::domain::{schedule::round_to, Mode, ScheduleEntry};

/// BOOST hours below this price are described as pre-heating (EUR/MWh)
const PREHEAT_PRICE_EUR_MWH: f64 = 40.0;

/// Human-readable reason for a mode choice. Descriptive only.
pub fn reason(mode: Mode, price_eur_mwh: f64, outdoor_temp_c: f64) -> String {
    match mode {
        Mode::Boost if price_eur_mwh < PREHEAT_PRICE_EUR_MWH => {
            format!("Pre-heating during cheap electricity ({price_eur_mwh:.1} EUR/MWh)")
        }
        Mode::Boost => format!("Preventing temperature drop (outdoor: {outdoor_temp_c:.1}°C)"),
        Mode::Eco => format!(
            "Coasting on thermal mass during expensive hour ({price_eur_mwh:.1} EUR/MWh)"
        ),
        Mode::Off => "Mild weather, no heating needed".to_string(),
        Mode::Normal => format!("Standard operation ({price_eur_mwh:.1} EUR/MWh)"),
    }
}

/// Builds one annotated entry per hour starting at `start_time`.
pub fn annotate(
    modes: &[Mode],
    trajectory: &[f64],
    outdoor_temps_c: &[f64],
    prices_eur_mwh: &[f64],
    start_time: DateTime<FixedOffset>,
) -> Vec<ScheduleEntry> {
    modes
        .iter()
        .zip(trajectory)
        .zip(outdoor_temps_c.iter().zip(prices_eur_mwh))
        .enumerate()
        .map(|(hour, ((&mode, &indoor), (&outdoor, &price)))| ScheduleEntry {
            hour,
            timestamp: start_time + Duration::hours(hour as i64),
            mode,
            expected_indoor_temp_c: round_to(indoor, 1),
            outdoor_temp_c: round_to(outdoor, 1),
            electricity_price_eur_mwh: round_to(price, 2),
            reason: reason(mode, price, outdoor),
        })
        .collect()
}
