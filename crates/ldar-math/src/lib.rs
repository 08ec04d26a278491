//! LDAR simulator math utilities.

pub mod math;

pub use math::erf::*;
pub use math::gamma::*;
pub use math::interp::*;
pub use math::stable::*;
