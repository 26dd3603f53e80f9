use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::Mode;

/// One hour of a computed heating plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub hour: usize,
    pub timestamp: DateTime<FixedOffset>,
    pub mode: Mode,
    /// Rounded to 0.1 °C
    pub expected_indoor_temp_c: f64,
    /// Rounded to 0.1 °C
    pub outdoor_temp_c: f64,
    /// Rounded to 0.01 EUR/MWh
    pub electricity_price_eur_mwh: f64,
    pub reason: String,
}

/// Priced and explained schedule for a full horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub entries: Vec<ScheduleEntry>,
    /// EUR
    pub total_cost: f64,
    /// EUR, always-on NORMAL operation
    pub baseline_cost: f64,
    /// `baseline_cost - total_cost`, negative when the plan costs more
    pub savings: f64,
    pub total_energy_kwh: f64,
    /// Unrounded indoor temperature at the start of each hour (°C);
    /// the first value is the measured starting temperature
    pub trajectory: Vec<f64>,
    /// Indoor temperature at the end of the last hour (°C)
    pub final_indoor_temp_c: f64,
    pub optimizer_version: String,
}

impl OptimizationResult {
    pub fn modes(&self) -> Vec<Mode> {
        self.entries.iter().map(|e| e.mode).collect()
    }

    pub fn entry_at(&self, t: DateTime<FixedOffset>) -> Option<&ScheduleEntry> {
        self.entries
            .iter()
            .find(|e| t >= e.timestamp && t < e.timestamp + chrono::Duration::hours(1))
    }

    pub fn hours_in_mode(&self, mode: Mode) -> usize {
        self.entries.iter().filter(|e| e.mode == mode).count()
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(hour: usize, mode: Mode, start: DateTime<FixedOffset>) -> ScheduleEntry {
        ScheduleEntry {
            hour,
            timestamp: start + chrono::Duration::hours(hour as i64),
            mode,
            expected_indoor_temp_c: 21.0,
            outdoor_temp_c: -5.0,
            electricity_price_eur_mwh: 50.0,
            reason: String::new(),
        }
    }

    #[test]
    fn test_entry_lookup() {
        let start = FixedOffset::east_opt(7200)
            .unwrap()
            .with_ymd_and_hms(2025, 1, 15, 0, 0, 0)
            .unwrap();
        let result = OptimizationResult {
            entries: vec![entry(0, Mode::Boost, start), entry(1, Mode::Eco, start)],
            total_cost: 0.0,
            baseline_cost: 0.0,
            savings: 0.0,
            total_energy_kwh: 0.0,
            trajectory: vec![21.0, 21.0],
            final_indoor_temp_c: 21.0,
            optimizer_version: "test".into(),
        };

        let t = start + chrono::Duration::minutes(90);
        assert_eq!(result.entry_at(t).map(|e| e.mode), Some(Mode::Eco));
        assert!(result.entry_at(start + chrono::Duration::hours(2)).is_none());
        assert_eq!(result.modes(), vec![Mode::Boost, Mode::Eco]);
        assert_eq!(result.hours_in_mode(Mode::Boost), 1);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(19.876, 1), 19.9);
        assert_eq!(round_to(42.4449, 2), 42.44);
    }
}
