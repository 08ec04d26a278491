//! Fixed-location maximum-likelihood fitting.
//!
//! `fit_once` is a single attempt that returns a typed error when the data
//! fall outside the family's support or the solver stalls. `fit_with_fallback`
//! drops non-positive samples after a first failure and tries exactly once
//! more; the second error is returned as-is.

use ldar_config::ShapeSpec;
use ldar_math::{digamma, trigamma};

use super::family::DistFamily;
use super::fitted::FittedDistribution;
use crate::error::{Error, Result};

const MAX_ITER: usize = 200;
const TOL: f64 = 1e-10;

fn fit_failed(family: DistFamily, reason: impl Into<String>) -> Error {
    Error::FitFailed {
        family: family.name().to_string(),
        reason: reason.into(),
    }
}

/// Build a distribution, either from explicit parameters or by fitting
/// `samples` with the location held at `loc`.
///
/// In parametric mode a missing shape is an empty list and a missing scale
/// is 1.0. In empirical mode `shape` and `scale` are ignored.
pub fn fit_dist(
    samples: Option<&[f64]>,
    family: DistFamily,
    loc: f64,
    shape: Option<&ShapeSpec>,
    scale: Option<f64>,
) -> Result<FittedDistribution> {
    match samples {
        Some(data) => fit_with_fallback(data, family, loc),
        None => {
            let shape = match shape {
                Some(spec) => spec.normalize()?,
                None => Vec::new(),
            };
            FittedDistribution::new(family, shape, loc, scale.unwrap_or(1.0))
        }
    }
}

/// Fit once, and on failure retry on the strictly positive samples.
pub fn fit_with_fallback(samples: &[f64], family: DistFamily, loc: f64) -> Result<FittedDistribution> {
    match fit_once(samples, family, loc) {
        Ok(dist) => Ok(dist),
        Err(first) => {
            let positive: Vec<f64> = samples.iter().copied().filter(|v| *v > 0.0).collect();
            tracing::warn!(
                family = %family,
                discarded = samples.len() - positive.len(),
                error = %first,
                "fit failed, retrying on positive samples"
            );
            fit_once(&positive, family, loc)
        }
    }
}

/// One MLE attempt with the location fixed.
pub fn fit_once(samples: &[f64], family: DistFamily, loc: f64) -> Result<FittedDistribution> {
    if samples.is_empty() {
        return Err(fit_failed(family, "no samples"));
    }
    if let Some(bad) = samples.iter().find(|v| !v.is_finite()) {
        return Err(fit_failed(family, format!("non-finite sample {}", bad)));
    }
    let shifted: Vec<f64> = samples.iter().map(|v| v - loc).collect();

    let (shape, scale) = match family {
        DistFamily::LogNormal => fit_lognorm(&shifted, loc)?,
        DistFamily::Normal => fit_norm(&shifted)?,
        DistFamily::Exponential => fit_expon(&shifted, loc)?,
        DistFamily::Gamma => fit_gamma(&shifted, loc)?,
        DistFamily::WeibullMin => fit_weibull(&shifted, loc)?,
    };
    FittedDistribution::new(family, shape, loc, scale)
}

fn require_positive(family: DistFamily, shifted: &[f64], loc: f64) -> Result<()> {
    if shifted.iter().any(|v| *v <= 0.0) {
        return Err(fit_failed(family, format!("data must be > loc ({})", loc)));
    }
    Ok(())
}

fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn fit_lognorm(shifted: &[f64], loc: f64) -> Result<(Vec<f64>, f64)> {
    let family = DistFamily::LogNormal;
    require_positive(family, shifted, loc)?;
    let logs: Vec<f64> = shifted.iter().map(|v| v.ln()).collect();
    let mu = mean(&logs);
    let var = logs.iter().map(|l| (l - mu).powi(2)).sum::<f64>() / logs.len() as f64;
    let s = var.sqrt();
    if s <= 0.0 {
        return Err(fit_failed(family, "degenerate data: zero log variance"));
    }
    Ok((vec![s], mu.exp()))
}

fn fit_norm(shifted: &[f64]) -> Result<(Vec<f64>, f64)> {
    let rms = (shifted.iter().map(|d| d * d).sum::<f64>() / shifted.len() as f64).sqrt();
    if rms <= 0.0 {
        return Err(fit_failed(DistFamily::Normal, "degenerate data: zero spread"));
    }
    Ok((Vec::new(), rms))
}

fn fit_expon(shifted: &[f64], loc: f64) -> Result<(Vec<f64>, f64)> {
    let family = DistFamily::Exponential;
    if shifted.iter().any(|v| *v < 0.0) {
        return Err(fit_failed(family, format!("data must be >= loc ({})", loc)));
    }
    let scale = mean(shifted);
    if scale <= 0.0 {
        return Err(fit_failed(family, "degenerate data: all samples at loc"));
    }
    Ok((Vec::new(), scale))
}

/// Solve ln(a) - digamma(a) = ln(mean) - mean(ln x) by Newton from the
/// Minka starting point.
fn fit_gamma(shifted: &[f64], loc: f64) -> Result<(Vec<f64>, f64)> {
    let family = DistFamily::Gamma;
    require_positive(family, shifted, loc)?;
    let m = mean(shifted);
    let mean_log = shifted.iter().map(|v| v.ln()).sum::<f64>() / shifted.len() as f64;
    let s = m.ln() - mean_log;
    if !(s > 0.0) {
        return Err(fit_failed(family, "degenerate data: zero spread"));
    }

    let mut a = (3.0 - s + ((s - 3.0).powi(2) + 24.0 * s).sqrt()) / (12.0 * s);
    for _ in 0..MAX_ITER {
        let f = a.ln() - digamma(a) - s;
        let df = 1.0 / a - trigamma(a);
        let mut next = a - f / df;
        if !(next > 0.0) {
            next = a / 2.0;
        }
        if (next - a).abs() <= TOL * a {
            return Ok((vec![next], m / next));
        }
        a = next;
    }
    Err(fit_failed(family, "shape iteration did not converge"))
}

/// Newton on the Weibull profile equation for c, with data normalized by
/// its maximum to keep `x^c` bounded.
fn fit_weibull(shifted: &[f64], loc: f64) -> Result<(Vec<f64>, f64)> {
    let family = DistFamily::WeibullMin;
    require_positive(family, shifted, loc)?;
    let max = shifted.iter().copied().fold(f64::MIN, f64::max);
    let y: Vec<f64> = shifted.iter().map(|v| v / max).collect();
    let logs: Vec<f64> = y.iter().map(|v| v.ln()).collect();
    let n = y.len() as f64;
    let mean_log = logs.iter().sum::<f64>() / n;
    let sd_log = (logs.iter().map(|l| (l - mean_log).powi(2)).sum::<f64>() / n).sqrt();
    if sd_log <= 0.0 {
        return Err(fit_failed(family, "degenerate data: zero log variance"));
    }

    // g(c) = sum(y^c ln y) / sum(y^c) - 1/c - mean(ln y)
    let mut c = std::f64::consts::PI / (6.0f64.sqrt() * sd_log);
    for _ in 0..MAX_ITER {
        let (mut s0, mut s1, mut s2) = (0.0, 0.0, 0.0);
        for (yi, li) in y.iter().zip(&logs) {
            let p = yi.powf(c);
            s0 += p;
            s1 += p * li;
            s2 += p * li * li;
        }
        let g = s1 / s0 - 1.0 / c - mean_log;
        let dg = (s2 * s0 - s1 * s1) / (s0 * s0) + 1.0 / (c * c);
        let mut next = c - g / dg;
        if !(next > 0.0) || !next.is_finite() {
            next = c / 2.0;
        }
        if (next - c).abs() <= TOL * c {
            let s0: f64 = y.iter().map(|v| v.powf(next)).sum();
            let scale = max * (s0 / n).powf(1.0 / next);
            return Ok((vec![next], scale));
        }
        c = next;
    }
    Err(fit_failed(family, "shape iteration did not converge"))
}
