//! Survey-gap and top-emitter reductions.

use ldar_math::{cumsum, interp};

use crate::error::{Error, Result};

/// Longest run (in days) between condition days, counting the lead-in before
/// the first true day and the tail after the last one.
///
/// The lead-in is the index of the first true day and the tail is
/// `len - index of last true day`. With no true days the result is the
/// sequence length.
pub fn gap_calculator(condition: &[bool]) -> usize {
    let days: Vec<usize> = condition
        .iter()
        .enumerate()
        .filter_map(|(i, met)| met.then_some(i))
        .collect();

    let (first, last) = match (days.first(), days.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return condition.len(),
    };
    let mid = days.windows(2).map(|w| w[1] - w[0]).max().unwrap_or(0);
    first.max(mid).max(condition.len() - last)
}

/// Rate threshold above which the top `proportion` of cumulative emissions
/// lies.
///
/// Sorted rates are accumulated into a cumulative-proportion curve. The
/// curve is read at `1 - proportion` of the rank axis, and that cumulative
/// emission is mapped back to a rate. Both lookups are linear and clamp at
/// the ends.
pub fn get_prop_rate(proportion: f64, rates: &[f64]) -> Result<f64> {
    if rates.len() < 2 {
        return Err(Error::InsufficientData(format!(
            "need at least two emission rates, got {}",
            rates.len()
        )));
    }
    let mut sorted = rates.to_vec();
    sorted.sort_by(f64::total_cmp);
    let cum_rates = cumsum(&sorted);
    let total = cum_rates.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(total > 0.0) {
        return Err(Error::InsufficientData(
            "total emissions must be positive".into(),
        ));
    }

    let cum_prop: Vec<f64> = cum_rates.iter().map(|c| c / total).collect();
    let last = (sorted.len() - 1) as f64;
    let rank: Vec<f64> = (0..sorted.len()).map(|i| i as f64 / last).collect();

    let prop_emissions = interp(1.0 - proportion, &rank, &cum_prop);
    Ok(interp(prop_emissions * total, &cum_rates, &sorted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_with_interior_days() {
        let mut v = [false; 10];
        for i in [2, 5, 9] {
            v[i] = true;
        }
        assert_eq!(gap_calculator(&v), 4);
    }

    #[test]
    fn gap_all_false_is_length() {
        assert_eq!(gap_calculator(&[false; 7]), 7);
        assert_eq!(gap_calculator(&[]), 0);
    }

    #[test]
    fn gap_single_day() {
        let mut v = [false; 12];
        v[0] = true;
        assert_eq!(gap_calculator(&v), 12);
        let mut v = [false; 12];
        v[8] = true;
        assert_eq!(gap_calculator(&v), 8);
    }

    #[test]
    fn gap_every_day() {
        assert_eq!(gap_calculator(&[true; 5]), 1);
    }

    #[test]
    fn prop_rate_extremes_clamp() {
        let rates = [1.0, 2.0, 3.0, 4.0];
        // proportion 0 reads the full curve -> the largest rate
        assert!((get_prop_rate(0.0, &rates).unwrap() - 4.0).abs() < 1e-12);
        // proportion 1 reads rank 0 -> the smallest rate
        assert!((get_prop_rate(1.0, &rates).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn prop_rate_interpolates() {
        // sorted [1,2,3,4], cum [1,3,6,10], prop [.1,.3,.6,1], rank [0,1/3,2/3,1]
        // 1 - 0.5 = 0.5 on rank -> prop 0.45 -> cum 4.5 -> rate 2.5
        let v = get_prop_rate(0.5, &[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert!((v - 2.5).abs() < 1e-12);
    }

    #[test]
    fn prop_rate_needs_data() {
        assert!(get_prop_rate(0.1, &[5.0]).is_err());
        assert!(get_prop_rate(0.1, &[0.0, 0.0]).is_err());
    }
}
