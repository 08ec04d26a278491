//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::program::{LeakRateSource, Program, SubtypeLeakConfig};

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::MissingField(_) => 64,
            ValidationError::InvalidValue { .. } => 65,
        }
    }
}

/// Validate a program's leak-rate configuration semantically.
///
/// Distribution family names and shape arity are checked later, when the
/// distributions are built, since only the engine knows the registry.
pub fn validate_program(program: &Program) -> ValidationResult<()> {
    if program.subtypes.is_empty() {
        return Err(ValidationError::SemanticError(
            "program defines no subtypes".to_string(),
        ));
    }

    for (id, subtype) in &program.subtypes {
        validate_subtype(id, subtype)?;
    }

    Ok(())
}

/// Validate a single subtype's leak-rate fields.
fn validate_subtype(id: &str, subtype: &SubtypeLeakConfig) -> ValidationResult<()> {
    match subtype.source() {
        LeakRateSource::Dist => {
            if subtype.dist_type.as_deref().map_or(true, str::is_empty) {
                return Err(ValidationError::MissingField(format!(
                    "subtypes.{}.dist_type",
                    id
                )));
            }
            match subtype.dist_scale {
                None => {
                    return Err(ValidationError::MissingField(format!(
                        "subtypes.{}.dist_scale",
                        id
                    )))
                }
                Some(scale) if !scale.is_finite() => {
                    return Err(ValidationError::InvalidValue {
                        field: format!("subtypes.{}.dist_scale", id),
                        message: format!("Must be finite, got {}", scale),
                    })
                }
                Some(_) => {}
            }
            if let Some(sigma) = subtype.dist_sigma {
                if !(sigma.is_finite() && sigma > 0.0) {
                    return Err(ValidationError::InvalidValue {
                        field: format!("subtypes.{}.dist_sigma", id),
                        message: format!("Must be finite and > 0, got {}", sigma),
                    });
                }
            }
        }
        LeakRateSource::Sample => {
            if subtype.leak_rates_file.is_none() {
                return Err(ValidationError::MissingField(format!(
                    "subtypes.{}.leak_rates_file",
                    id
                )));
            }
        }
    }

    if let Some(max) = subtype.max_leak_rate {
        if !(max.is_finite() && max > 0.0) {
            return Err(ValidationError::InvalidValue {
                field: format!("subtypes.{}.max_leak_rate", id),
                message: format!("Must be finite and > 0, got {}", max),
            });
        }
    }

    Ok(())
}
