//! Error function and standard normal helpers.
//!
//! `erf(x) = P(1/2, x²)` for x >= 0, so both functions reuse the
//! regularized incomplete gamma implementation.

use super::gamma::{gamma_p, gamma_q};
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Error function.
pub fn erf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x == 0.0 {
        return 0.0;
    }
    let p = gamma_p(0.5, x * x);
    if x > 0.0 {
        p
    } else {
        -p
    }
}

/// Complementary error function, `1 - erf(x)`, without cancellation for large x.
pub fn erfc(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x == 0.0 {
        return 1.0;
    }
    let q = gamma_q(0.5, x * x);
    if x > 0.0 {
        q
    } else {
        2.0 - q
    }
}

/// Standard normal CDF Φ(z).
pub fn normal_cdf(z: f64) -> f64 {
    if z == f64::INFINITY {
        return 1.0;
    }
    if z == f64::NEG_INFINITY {
        return 0.0;
    }
    0.5 * erfc(-z * FRAC_1_SQRT_2)
}

/// Standard normal density φ(z).
pub fn normal_pdf(z: f64) -> f64 {
    (-0.5 * z * z).exp() / (2.0 * PI).sqrt()
}
