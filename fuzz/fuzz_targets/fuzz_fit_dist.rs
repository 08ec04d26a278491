//! Fuzz target for maximum-likelihood fitting.
//!
//! Arbitrary samples (NaN, infinities, duplicates, negatives) must produce
//! a fitted distribution or an error, never a panic or a hang.

#![no_main]

use arbitrary::Arbitrary;
use ldar_core::dist::{fit_dist, DistFamily};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FitInput {
    family: u8,
    loc: f64,
    samples: Vec<f64>,
}

fuzz_target!(|input: FitInput| {
    let family = DistFamily::ALL[input.family as usize % DistFamily::ALL.len()];
    let _ = fit_dist(Some(&input.samples), family, input.loc, None, None);
});
