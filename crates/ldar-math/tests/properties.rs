//! Property-based tests for ldar-math numerical functions.
//!
//! Uses proptest to verify mathematical properties hold across many random inputs.

use proptest::prelude::*;
use ldar_math::{
    digamma, erf, erfc, gamma_cdf, gamma_p, gamma_q, interp, log_gamma, normal_cdf, trigamma,
};

/// Tolerance for floating point comparisons.
const TOL: f64 = 1e-10;

/// Extended tolerance for functions built on series approximations.
const SERIES_TOL: f64 = 1e-8;

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() <= tol.max(tol * a.abs().max(b.abs()))
}

// ============================================================================
// log_gamma / polygamma properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Recurrence: log Γ(z+1) = log Γ(z) + ln z.
    #[test]
    fn log_gamma_recurrence(z in 0.1..50.0f64) {
        let lhs = log_gamma(z + 1.0);
        let rhs = log_gamma(z) + z.ln();
        prop_assert!(approx_eq(lhs, rhs, SERIES_TOL), "z={} lhs={} rhs={}", z, lhs, rhs);
    }

    /// Recurrence: ψ(x+1) = ψ(x) + 1/x.
    #[test]
    fn digamma_recurrence(x in 0.05..40.0f64) {
        let lhs = digamma(x + 1.0);
        let rhs = digamma(x) + 1.0 / x;
        prop_assert!(approx_eq(lhs, rhs, SERIES_TOL), "x={} lhs={} rhs={}", x, lhs, rhs);
    }

    /// ψ is increasing, so trigamma (its derivative) is positive.
    #[test]
    fn trigamma_positive(x in 0.01..100.0f64) {
        prop_assert!(trigamma(x) > 0.0);
    }

    /// ψ(x) ≈ (log Γ(x+h) - log Γ(x-h)) / 2h.
    #[test]
    fn digamma_matches_log_gamma_derivative(x in 1.0..30.0f64) {
        let h = 1e-5;
        let numeric = (log_gamma(x + h) - log_gamma(x - h)) / (2.0 * h);
        prop_assert!(approx_eq(digamma(x), numeric, 1e-5), "x={}", x);
    }
}

// ============================================================================
// incomplete gamma / erf properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn gamma_p_q_sum_to_one(a in 0.05..60.0f64, x in 0.0..120.0f64) {
        let sum = gamma_p(a, x) + gamma_q(a, x);
        prop_assert!(approx_eq(sum, 1.0, TOL), "a={} x={} sum={}", a, x, sum);
    }

    #[test]
    fn gamma_cdf_is_monotone(shape in 0.1..20.0f64, scale in 0.01..10.0f64, x in 0.0..50.0f64, dx in 0.0..5.0f64) {
        let lo = gamma_cdf(x, shape, scale);
        let hi = gamma_cdf(x + dx, shape, scale);
        prop_assert!(hi >= lo - TOL, "cdf decreased: {} -> {}", lo, hi);
        prop_assert!((0.0..=1.0).contains(&lo));
    }

    #[test]
    fn erf_plus_erfc_is_one(x in -6.0..6.0f64) {
        prop_assert!(approx_eq(erf(x) + erfc(x), 1.0, TOL));
    }

    #[test]
    fn normal_cdf_symmetry(z in -8.0..8.0f64) {
        prop_assert!(approx_eq(normal_cdf(z) + normal_cdf(-z), 1.0, TOL));
    }
}

// ============================================================================
// interpolation properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Interpolation stays within the range of the sampled values.
    #[test]
    fn interp_bounded_by_fp(mut xs in prop::collection::vec(-100.0..100.0f64, 2..20), x in -150.0..150.0f64) {
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let fp: Vec<f64> = xs.iter().map(|v| v * 2.0 + 1.0).collect();
        let y = interp(x, &xs, &fp);
        let lo = fp.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = fp.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(y >= lo - TOL && y <= hi + TOL, "y={} outside [{}, {}]", y, lo, hi);
    }

    /// Interpolating a linear function reproduces it inside the knot range.
    #[test]
    fn interp_exact_on_lines(x in 0.0..10.0f64) {
        let xp = [0.0, 2.5, 5.0, 10.0];
        let fp: Vec<f64> = xp.iter().map(|v| 3.0 * v - 4.0).collect();
        prop_assert!(approx_eq(interp(x, &xp, &fp), 3.0 * x - 4.0, TOL));
    }
}
