use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::domain::Mode;

/// Grid operator stress signal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GridStress {
    #[default]
    Normal,
    Warning,
    /// Demand response is active
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub mode: Mode,
    pub reason: String,
}

/// Immediate mode for the current hour, from live conditions only.
/// Rules apply in order; the first match wins.
pub fn recommend_now(outdoor_temp_c: f64, price_eur_mwh: f64, grid_stress: GridStress) -> Recommendation {
    let (mode, reason) = if grid_stress == GridStress::Critical {
        (Mode::Off, "Grid emergency - demand response active".to_string())
    } else if outdoor_temp_c < -15.0 && price_eur_mwh < 60.0 {
        (
            Mode::Boost,
            format!("Very cold ({outdoor_temp_c}°C) and reasonable price"),
        )
    } else if price_eur_mwh < 30.0 {
        (Mode::Boost, "Cheap electricity - pre-heating".to_string())
    } else if price_eur_mwh > 80.0 {
        (Mode::Eco, "Expensive electricity - coasting".to_string())
    } else {
        (Mode::Normal, "Standard operation".to_string())
    };

    Recommendation { mode, reason }
}
