//! Leak-rate distribution engine.
//!
//! - [`family`]: registry of supported families by scipy-style name
//! - [`fitted`]: immutable distribution objects with sample/pdf/cdf
//! - [`fit`]: parametric construction and fixed-location MLE with fallback

pub mod family;
pub mod fit;
pub mod fitted;

pub use family::DistFamily;
pub use fit::{fit_dist, fit_once, fit_with_fallback};
pub use fitted::{DistParams, FittedDistribution};
