use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::{ensure_positive, OptimizerError, Result};

/// Lower bound applied to every COP estimate
pub const COP_MIN: f64 = 2.0;
/// Upper bound applied to every COP estimate
pub const COP_MAX: f64 = 5.0;

/// Ground loop temperature seen by a ground source heat pump (°C)
pub const GROUND_REFERENCE_TEMP_C: f64 = 5.0;

/// Fraction of the Carnot COP a real compressor achieves
pub const CARNOT_EFFICIENCY: f64 = 0.45;

const KELVIN_OFFSET: f64 = 273.15;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum HeatPumpType {
    /// Ground source, brine-to-water
    #[serde(rename = "GSHP")]
    #[strum(serialize = "GSHP")]
    GroundSource,
    /// Air source, air-to-water
    #[serde(rename = "ASHP")]
    #[strum(serialize = "ASHP")]
    AirSource,
}

/// Operating mode for one scheduled hour
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Mode {
    /// Full power, used in price valleys and for safety corrections
    Boost,
    Normal,
    /// Reduced heating, coasting on thermal mass
    Eco,
    Off,
}

impl Mode {
    /// Share of rated electrical power drawn in this mode
    pub const fn power_fraction(self) -> f64 {
        match self {
            Mode::Boost => 1.0,
            Mode::Normal => 0.7,
            Mode::Eco => 0.3,
            Mode::Off => 0.0,
        }
    }

    pub const fn is_on(self) -> bool {
        !matches!(self, Mode::Off)
    }

    /// Parses a mode name, reporting unknown names as a validation error
    pub fn parse(name: &str) -> Result<Self> {
        name.parse()
            .map_err(|_| OptimizerError::UnknownMode(name.to_string()))
    }
}

/// Heat pump nameplate data
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatPumpParameters {
    kind: HeatPumpType,
    rated_power_kw: f64,
    rated_cop: f64,
}

impl HeatPumpParameters {
    pub fn new(kind: HeatPumpType, rated_power_kw: f64, rated_cop: f64) -> Result<Self> {
        ensure_positive("rated_power", rated_power_kw)?;
        if !(COP_MIN..=COP_MAX).contains(&rated_cop) {
            return Err(OptimizerError::RatedCopOutOfRange(rated_cop));
        }
        Ok(Self {
            kind,
            rated_power_kw,
            rated_cop,
        })
    }

    pub fn kind(&self) -> HeatPumpType {
        self.kind
    }

    pub fn rated_power_kw(&self) -> f64 {
        self.rated_power_kw
    }

    pub fn rated_cop(&self) -> f64 {
        self.rated_cop
    }

    /// Cold-side temperature the compressor lifts heat from (°C)
    pub fn source_temp_c(&self, outdoor_temp_c: f64) -> f64 {
        match self.kind {
            HeatPumpType::GroundSource => GROUND_REFERENCE_TEMP_C,
            HeatPumpType::AirSource => outdoor_temp_c,
        }
    }

    /// Carnot-based COP, always within [`COP_MIN`, `COP_MAX`].
    ///
    /// When the indoor temperature meets the source temperature the Carnot
    /// ratio diverges; the clamp maps that to `COP_MAX` (or `COP_MIN` for a
    /// negative lift) instead of faulting.
    pub fn cop(&self, outdoor_temp_c: f64, indoor_temp_c: f64) -> f64 {
        let t_hot_k = indoor_temp_c + KELVIN_OFFSET;
        let t_cold_k = self.source_temp_c(outdoor_temp_c) + KELVIN_OFFSET;
        let cop_real = t_hot_k / (t_hot_k - t_cold_k) * CARNOT_EFFICIENCY;

        if cop_real.is_nan() {
            return COP_MIN;
        }
        cop_real.clamp(COP_MIN, COP_MAX)
    }
}

#[derive(Deserialize)]
struct RawHeatPump {
    #[serde(rename = "type")]
    kind: HeatPumpType,
    rated_power_kw: f64,
    #[serde(default = "default_rated_cop")]
    rated_cop: f64,
}

fn default_rated_cop() -> f64 {
    3.5
}

impl<'de> Deserialize<'de> for HeatPumpParameters {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawHeatPump::deserialize(deserializer)?;
        HeatPumpParameters::new(raw.kind, raw.rated_power_kw, raw.rated_cop)
            .map_err(serde::de::Error::custom)
    }
}
