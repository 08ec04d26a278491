//! Program configuration types.
//!
//! Only the leak-rate subset of a program file is modeled here. Unknown
//! keys are ignored so full simulator program files load unchanged.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::validate::{ValidationError, ValidationResult};

/// Leak-rate portion of a simulation program.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub program_name: Option<String>,

    /// Subtype identifier to leak-rate configuration.
    #[serde(default)]
    pub subtypes: BTreeMap<String, SubtypeLeakConfig>,
}

/// How a subtype's leak rates are modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeakRateSource {
    /// Parametric distribution built from `dist_*` fields.
    #[default]
    Dist,
    /// Empirical samples read from `leak_rates_file`.
    Sample,
}

impl std::fmt::Display for LeakRateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeakRateSource::Dist => write!(f, "dist"),
            LeakRateSource::Sample => write!(f, "sample"),
        }
    }
}

/// Leak-rate configuration for one equipment/component subtype.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubtypeLeakConfig {
    /// Absent means `dist`.
    #[serde(default)]
    pub leak_rate_source: Option<LeakRateSource>,

    /// Statistical family name (`lognorm`, `gamma`, ...).
    #[serde(default)]
    pub dist_type: Option<String>,

    #[serde(default)]
    pub dist_shape: Option<ShapeSpec>,

    /// Scale parameter. For `lognorm` this is the log-space mean (mu).
    #[serde(default)]
    pub dist_scale: Option<f64>,

    /// Alternate shape specification; overrides `dist_shape` when set.
    #[serde(default)]
    pub dist_sigma: Option<f64>,

    /// Empirical leak-rate file, relative to the program's working directory.
    #[serde(default)]
    pub leak_rates_file: Option<PathBuf>,

    /// Upper bound (exclusive) on sampled leak rates.
    #[serde(default)]
    pub max_leak_rate: Option<f64>,

    /// Units of raw distribution draws as `[metric, increment]`.
    #[serde(default)]
    pub leak_rate_units: Option<(String, String)>,
}

impl SubtypeLeakConfig {
    /// Effective leak-rate source; an absent field means `dist`.
    pub fn source(&self) -> LeakRateSource {
        self.leak_rate_source.unwrap_or_default()
    }
}

/// Shape parameters as written in a program file.
///
/// Accepts a bare number, a list of numbers, or a string holding either
/// in JSON notation (`"[2, 23.4]"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShapeSpec {
    Scalar(f64),
    List(Vec<f64>),
    Text(String),
}

impl ShapeSpec {
    /// Normalize to an ordered sequence of shape parameters.
    ///
    /// Text is parsed as JSON first; scalars become single-element lists.
    pub fn normalize(&self) -> ValidationResult<Vec<f64>> {
        match self {
            ShapeSpec::Scalar(v) => Ok(vec![*v]),
            ShapeSpec::List(values) => Ok(values.clone()),
            ShapeSpec::Text(text) => parse_shape_text(text),
        }
    }
}

impl From<f64> for ShapeSpec {
    fn from(value: f64) -> Self {
        ShapeSpec::Scalar(value)
    }
}

impl From<Vec<f64>> for ShapeSpec {
    fn from(values: Vec<f64>) -> Self {
        ShapeSpec::List(values)
    }
}

fn parse_shape_text(text: &str) -> ValidationResult<Vec<f64>> {
    let invalid = |message: String| ValidationError::InvalidValue {
        field: "dist_shape".to_string(),
        message,
    };

    let value: serde_json::Value = serde_json::from_str(text.trim())
        .map_err(|e| invalid(format!("cannot parse {:?}: {}", text, e)))?;

    match value {
        serde_json::Value::Number(n) => n
            .as_f64()
            .map(|v| vec![v])
            .ok_or_else(|| invalid(format!("{} is not representable as f64", n))),
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_f64()
                    .ok_or_else(|| invalid(format!("non-numeric shape element {}", item)))
            })
            .collect(),
        other => Err(invalid(format!("expected a number or list, got {}", other))),
    }
}

impl Program {
    /// Load a program from a YAML or JSON file.
    ///
    /// `.json` files are parsed as JSON; everything else as YAML.
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Parse a program from a JSON string.
    pub fn from_json_str(json: &str) -> ValidationResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Parse a program from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> ValidationResult<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| ValidationError::ParseError(format!("Invalid YAML: {}", e)))
    }

    /// Look up a subtype by identifier.
    pub fn subtype(&self, id: &str) -> Option<&SubtypeLeakConfig> {
        self.subtypes.get(id)
    }
}
