//! Core math modules.

pub mod erf;
pub mod gamma;
pub mod interp;
pub mod stable;
