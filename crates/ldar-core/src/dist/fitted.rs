//! Immutable parametric distributions built from a family and parameters.

use ldar_math::{gamma_cdf, gamma_pdf, log_gamma, normal_cdf, normal_pdf};
use rand::Rng;
use rand_distr::{Distribution, Exp, Gamma, LogNormal, Normal, Weibull};
use serde::Serialize;

use super::family::DistFamily;
use crate::error::{Error, Result};

/// Concrete sampler for the standardized-location law (loc = 0).
#[derive(Debug, Clone)]
enum Law {
    LogNormal(LogNormal<f64>),
    Normal(Normal<f64>),
    Exponential(Exp<f64>),
    Gamma(Gamma<f64>),
    Weibull(Weibull<f64>),
}

/// A distribution keyed by `(family, shape, loc, scale)`.
///
/// Built once at load time and shared read-only afterwards. Draws take an
/// explicit random source.
#[derive(Debug, Clone)]
pub struct FittedDistribution {
    family: DistFamily,
    shape: Vec<f64>,
    loc: f64,
    scale: f64,
    law: Law,
}

/// Serializable parameter summary of a [`FittedDistribution`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistParams {
    pub family: DistFamily,
    pub shape: Vec<f64>,
    pub loc: f64,
    pub scale: f64,
}

impl FittedDistribution {
    /// Construct a distribution, validating arity and parameter ranges.
    pub fn new(family: DistFamily, shape: Vec<f64>, loc: f64, scale: f64) -> Result<Self> {
        if shape.len() != family.num_shapes() {
            return Err(Error::InvalidShape(format!(
                "{} takes {} shape parameter(s) {:?}, got {:?}",
                family,
                family.num_shapes(),
                family.shape_names(),
                shape
            )));
        }
        let invalid = |reason: String| Error::InvalidParameters {
            family: family.name().to_string(),
            reason,
        };
        if !loc.is_finite() {
            return Err(invalid(format!("loc must be finite, got {}", loc)));
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(invalid(format!("scale must be finite and > 0, got {}", scale)));
        }
        if let Some(bad) = shape.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
            return Err(invalid(format!("shape must be finite and > 0, got {}", bad)));
        }

        let reason = |e: rand_distr::NormalError| invalid(e.to_string());
        let law = match family {
            DistFamily::LogNormal => Law::LogNormal(LogNormal::new(scale.ln(), shape[0]).map_err(reason)?),
            DistFamily::Normal => Law::Normal(Normal::new(0.0, scale).map_err(reason)?),
            DistFamily::Exponential => Law::Exponential(
                Exp::new(1.0 / scale).map_err(|e| invalid(e.to_string()))?,
            ),
            DistFamily::Gamma => {
                Law::Gamma(Gamma::new(shape[0], scale).map_err(|e| invalid(e.to_string()))?)
            }
            DistFamily::WeibullMin => {
                Law::Weibull(Weibull::new(scale, shape[0]).map_err(|e| invalid(e.to_string()))?)
            }
        };

        Ok(Self {
            family,
            shape,
            loc,
            scale,
            law,
        })
    }

    pub fn family(&self) -> DistFamily {
        self.family
    }

    pub fn shape(&self) -> &[f64] {
        &self.shape
    }

    pub fn loc(&self) -> f64 {
        self.loc
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Parameter summary for reporting.
    pub fn params(&self) -> DistParams {
        DistParams {
            family: self.family,
            shape: self.shape.clone(),
            loc: self.loc,
            scale: self.scale,
        }
    }

    /// Draw one value.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let standardized = match &self.law {
            Law::LogNormal(d) => d.sample(rng),
            Law::Normal(d) => d.sample(rng),
            Law::Exponential(d) => d.sample(rng),
            Law::Gamma(d) => d.sample(rng),
            Law::Weibull(d) => d.sample(rng),
        };
        self.loc + standardized
    }

    /// Probability density at `x`.
    pub fn pdf(&self, x: f64) -> f64 {
        let z = (x - self.loc) / self.scale;
        match self.family {
            DistFamily::LogNormal => {
                if z <= 0.0 {
                    return 0.0;
                }
                let s = self.shape[0];
                normal_pdf(z.ln() / s) / (s * z * self.scale)
            }
            DistFamily::Normal => normal_pdf(z) / self.scale,
            DistFamily::Exponential => {
                if z < 0.0 {
                    0.0
                } else {
                    (-z).exp() / self.scale
                }
            }
            DistFamily::Gamma => gamma_pdf(x - self.loc, self.shape[0], self.scale),
            DistFamily::WeibullMin => {
                let c = self.shape[0];
                if z < 0.0 {
                    0.0
                } else if z == 0.0 {
                    if c < 1.0 {
                        f64::INFINITY
                    } else if c == 1.0 {
                        1.0 / self.scale
                    } else {
                        0.0
                    }
                } else {
                    c * z.powf(c - 1.0) * (-z.powf(c)).exp() / self.scale
                }
            }
        }
    }

    /// Cumulative probability P(X <= x).
    pub fn cdf(&self, x: f64) -> f64 {
        let z = (x - self.loc) / self.scale;
        match self.family {
            DistFamily::LogNormal => {
                if z <= 0.0 {
                    0.0
                } else {
                    normal_cdf(z.ln() / self.shape[0])
                }
            }
            DistFamily::Normal => normal_cdf(z),
            DistFamily::Exponential => {
                if z <= 0.0 {
                    0.0
                } else {
                    -(-z).exp_m1()
                }
            }
            DistFamily::Gamma => gamma_cdf(x - self.loc, self.shape[0], self.scale),
            DistFamily::WeibullMin => {
                if z <= 0.0 {
                    0.0
                } else {
                    -(-z.powf(self.shape[0])).exp_m1()
                }
            }
        }
    }

    /// Expected value.
    pub fn mean(&self) -> f64 {
        let standardized = match self.family {
            DistFamily::LogNormal => {
                let s = self.shape[0];
                self.scale * (0.5 * s * s).exp()
            }
            DistFamily::Normal => 0.0,
            DistFamily::Exponential => self.scale,
            DistFamily::Gamma => self.shape[0] * self.scale,
            DistFamily::WeibullMin => self.scale * log_gamma(1.0 + 1.0 / self.shape[0]).exp(),
        };
        self.loc + standardized
    }
}

impl PartialEq for FittedDistribution {
    fn eq(&self, other: &Self) -> bool {
        self.family == other.family
            && self.shape == other.shape
            && self.loc == other.loc
            && self.scale == other.scale
    }
}

impl Distribution<f64> for FittedDistribution {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        FittedDistribution::sample(self, rng)
    }
}
