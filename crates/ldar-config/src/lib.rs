//! LDAR simulator program configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for the leak-rate subset of a program file
//! - Program path resolution (CLI → env → working directory)
//! - Semantic validation with structured errors

pub mod program;
pub mod resolve;
pub mod validate;

pub use program::{LeakRateSource, Program, ShapeSpec, SubtypeLeakConfig};
pub use resolve::{resolve_program, ConfigSource, ProgramPath};
pub use validate::{validate_program, ValidationError, ValidationResult};
