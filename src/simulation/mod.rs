//! # Building Thermal Simulation
//!
//! Single-node resistance-capacitance (RC) model: the building is one thermal
//! capacitor losing heat through its envelope, heated by a heat pump whose COP
//! depends on the temperature lift, plus free solar gain through the windows.
//!
//! ## Usage
//!
//! ```rust
//! use heat_pump_optimizer::domain::{BuildingParameters, HeatPumpParameters, HeatPumpType, InsulationLevel, Mode};
//! use heat_pump_optimizer::simulation::ThermalSimulator;
//!
//! let building = BuildingParameters::new(100.0, 250.0, InsulationLevel::Medium).unwrap();
//! let heat_pump = HeatPumpParameters::new(HeatPumpType::AirSource, 6.0, 3.5).unwrap();
//! let sim = ThermalSimulator::new(&building, &heat_pump);
//!
//! // One hour with the pump off at -5 °C outside
//! let t = sim.simulate_mode(21.0, -5.0, Mode::Off, 0.0);
//! assert!((t - 19.88).abs() < 0.01);
//! ```

pub mod thermal;

pub use thermal::{HeatBalance, ThermalSimulator, HOUR_SECONDS};
