//! LDAR leak-rate engine.
//!
//! - Distribution registry, fitting and sampling ([`dist`])
//! - Bounded, unit-converted leak draws ([`leak`], [`units`])
//! - Per-subtype model loading from a program file ([`loader`])
//! - Geospatial and temporal helpers ([`geo`], [`daylight`], [`orbit`], [`reduce`])
//! - Weather file provisioning ([`weather`])
//!
//! The binary entry point is in `main.rs`.

pub mod daylight;
pub mod dist;
pub mod error;
pub mod exit_codes;
pub mod geo;
pub mod leak;
pub mod loader;
pub mod logging;
pub mod orbit;
pub mod reduce;
pub mod units;
pub mod weather;

pub use dist::{fit_dist, DistFamily, FittedDistribution};
pub use error::{Error, ErrorCategory, Result};
pub use leak::{LeakRateModel, LeakSampler};
pub use loader::ProgramDistributions;
pub use units::{GasConverter, UnitConversion, UnitConverter};
