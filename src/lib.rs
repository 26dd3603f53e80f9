//! Day-ahead heat pump scheduling.
//!
//! A single-node RC thermal model of the building drives a greedy,
//! price-aware scheduler that picks BOOST / NORMAL / ECO / OFF for every
//! hour while keeping the indoor temperature above the comfort minimum.

pub mod comfort;
pub mod config;
pub mod domain;
pub mod error;
pub mod fleet;
pub mod optimizer;
pub mod simulation;
pub mod telemetry;

pub use error::{OptimizerError, Result};
