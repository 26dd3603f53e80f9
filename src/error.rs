use thiserror::Error;

/// Input-validation failures raised before any simulation runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizerError {
    #[error("Forecast horizon must contain at least one hour")]
    EmptyHorizon,

    #[error("Forecast horizon of {hours}h exceeds maximum of {max}h")]
    HorizonTooLong { hours: usize, max: usize },

    #[error("Forecast series '{series}' has {actual} values, expected {expected}")]
    ForecastLengthMismatch {
        series: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Forecast series '{series}' has a non-finite value at hour {index}")]
    NonFiniteValue { series: &'static str, index: usize },

    #[error("Parameter '{name}' must be strictly positive (got {value})")]
    NonPositiveParameter { name: &'static str, value: f64 },

    #[error("Comfort band is empty: min {min}°C must be below max {max}°C")]
    InvalidComfortBand { min: f64, max: f64 },

    #[error("Rated COP {0} outside the supported range 2.0-5.0")]
    RatedCopOutOfRange(f64),

    #[error("Unknown heat pump mode: {0}")]
    UnknownMode(String),
}

pub type Result<T> = std::result::Result<T, OptimizerError>;

/// Rejects zero, negative and NaN values for a physical parameter.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(OptimizerError::NonPositiveParameter { name, value })
    }
}
