//! Registry of supported distribution families.
//!
//! Families are addressed by their scipy.stats names so existing program
//! files keep working. Unknown names fail at load time.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};

/// A supported statistical family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistFamily {
    /// `lognorm(s; loc, scale)`: `loc + scale * exp(s * Z)`.
    #[serde(rename = "lognorm")]
    LogNormal,
    /// `norm(loc, scale)`.
    #[serde(rename = "norm")]
    Normal,
    /// `expon(loc, scale)`.
    #[serde(rename = "expon")]
    Exponential,
    /// `gamma(a; loc, scale)`.
    Gamma,
    /// `weibull_min(c; loc, scale)`.
    WeibullMin,
}

impl DistFamily {
    /// Every registered family.
    pub const ALL: [DistFamily; 5] = [
        DistFamily::LogNormal,
        DistFamily::Normal,
        DistFamily::Exponential,
        DistFamily::Gamma,
        DistFamily::WeibullMin,
    ];

    /// Registry name as used in program files.
    pub fn name(&self) -> &'static str {
        match self {
            DistFamily::LogNormal => "lognorm",
            DistFamily::Normal => "norm",
            DistFamily::Exponential => "expon",
            DistFamily::Gamma => "gamma",
            DistFamily::WeibullMin => "weibull_min",
        }
    }

    /// Names of the shape parameters, in order.
    pub fn shape_names(&self) -> &'static [&'static str] {
        match self {
            DistFamily::LogNormal => &["s"],
            DistFamily::Normal | DistFamily::Exponential => &[],
            DistFamily::Gamma => &["a"],
            DistFamily::WeibullMin => &["c"],
        }
    }

    /// Number of shape parameters the family takes.
    pub fn num_shapes(&self) -> usize {
        self.shape_names().len()
    }

    /// Whether the configured scale is a log-space mean that must be
    /// exponentiated before use.
    pub fn scale_is_log_mean(&self) -> bool {
        matches!(self, DistFamily::LogNormal)
    }

    /// Resolve a family by registry name.
    pub fn lookup(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|family| family.name() == name)
            .ok_or_else(|| Error::UnknownFamily {
                name: name.to_string(),
            })
    }
}

impl FromStr for DistFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::lookup(s)
    }
}

impl std::fmt::Display for DistFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_round_trips_names() {
        for family in DistFamily::ALL {
            assert_eq!(DistFamily::lookup(family.name()).unwrap(), family);
            assert_eq!(family.to_string(), family.name());
        }
    }

    #[test]
    fn unknown_family_fails_fast() {
        let err = "lognormal".parse::<DistFamily>().unwrap_err();
        assert!(matches!(err, Error::UnknownFamily { ref name } if name == "lognormal"));
    }

    #[test]
    fn shape_arity() {
        assert_eq!(DistFamily::LogNormal.num_shapes(), 1);
        assert_eq!(DistFamily::Normal.num_shapes(), 0);
        assert_eq!(DistFamily::WeibullMin.shape_names(), &["c"]);
        assert!(DistFamily::LogNormal.scale_is_log_mean());
        assert!(!DistFamily::Gamma.scale_is_log_mean());
    }

    #[test]
    fn serde_uses_registry_names() {
        let json = serde_json::to_string(&DistFamily::WeibullMin).unwrap();
        assert_eq!(json, "\"weibull_min\"");
        let back: DistFamily = serde_json::from_str("\"lognorm\"").unwrap();
        assert_eq!(back, DistFamily::LogNormal);
    }
}
