//! One-dimensional piecewise-linear interpolation.

/// Linearly interpolate `x` over the points `(xp[i], fp[i])`.
///
/// `xp` must be non-decreasing. Values left of `xp[0]` return `fp[0]` and
/// values right of the last point return the last `fp`, matching
/// `numpy.interp`. Returns NaN for empty or mismatched inputs.
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    if xp.is_empty() || xp.len() != fp.len() || x.is_nan() {
        return f64::NAN;
    }
    let last = xp.len() - 1;
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[last] {
        return fp[last];
    }

    // Last index with xp[j] <= x; x < xp[last] keeps j + 1 in bounds.
    let j = xp.partition_point(|v| *v <= x) - 1;
    let (x0, x1) = (xp[j], xp[j + 1]);
    let (y0, y1) = (fp[j], fp[j + 1]);
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

/// Cumulative sums of `values`.
pub fn cumsum(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |acc, v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}
