use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::{ensure_positive, Result};

/// Thermal mass per m² of floor for medium (mixed) construction, J/K.
pub const THERMAL_MASS_PER_M2_J_K: f64 = 100_000.0;

/// Envelope area approximation for a typical detached house.
pub const ENVELOPE_AREA_PER_FLOOR_AREA: f64 = 4.0;

/// Building envelope quality
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InsulationLevel {
    /// Old, poorly insulated stock
    Low,
    /// Average renovation standard
    Medium,
    /// Current building code (U < 0.17 W/m²K)
    High,
}

impl InsulationLevel {
    /// Thermal transmittance of the envelope (W/m²K)
    pub fn u_value(&self) -> f64 {
        match self {
            InsulationLevel::Low => 0.50,
            InsulationLevel::Medium => 0.30,
            InsulationLevel::High => 0.17,
        }
    }
}

/// Physical description of a building. Fields are private so that every
/// instance has passed validation; all derived coefficients are pure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BuildingParameters {
    floor_area_m2: f64,
    volume_m3: f64,
    insulation: InsulationLevel,
}

impl BuildingParameters {
    pub fn new(floor_area_m2: f64, volume_m3: f64, insulation: InsulationLevel) -> Result<Self> {
        ensure_positive("floor_area", floor_area_m2)?;
        ensure_positive("volume", volume_m3)?;
        Ok(Self {
            floor_area_m2,
            volume_m3,
            insulation,
        })
    }

    pub fn floor_area_m2(&self) -> f64 {
        self.floor_area_m2
    }

    pub fn volume_m3(&self) -> f64 {
        self.volume_m3
    }

    pub fn insulation(&self) -> InsulationLevel {
        self.insulation
    }

    pub fn u_value(&self) -> f64 {
        self.insulation.u_value()
    }

    /// External surface area (m²)
    pub fn envelope_area_m2(&self) -> f64 {
        ENVELOPE_AREA_PER_FLOOR_AREA * self.floor_area_m2
    }

    /// Heat capacity of the building (J/K)
    pub fn thermal_mass_j_per_k(&self) -> f64 {
        THERMAL_MASS_PER_M2_J_K * self.floor_area_m2
    }

    /// Overall envelope heat-loss coefficient UA (W/K)
    pub fn ua_w_per_k(&self) -> f64 {
        self.u_value() * self.envelope_area_m2()
    }
}

#[derive(Deserialize)]
struct RawBuilding {
    floor_area_m2: f64,
    volume_m3: f64,
    insulation: InsulationLevel,
}

impl<'de> Deserialize<'de> for BuildingParameters {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawBuilding::deserialize(deserializer)?;
        BuildingParameters::new(raw.floor_area_m2, raw.volume_m3, raw.insulation)
            .map_err(serde::de::Error::custom)
    }
}
