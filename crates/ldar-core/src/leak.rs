//! Bounded, unit-converted leak-rate draws.

use rand::Rng;
use serde::Serialize;

use crate::dist::FittedDistribution;
use crate::error::{Error, Result};
use crate::units::{GasConverter, UnitConversion, UnitConverter};

static DEFAULT_CONVERTER: GasConverter = GasConverter {
    density_g_per_l: crate::units::METHANE_DENSITY_G_PER_L,
};

/// Draws leak magnitudes from a distribution with optional conversion and
/// an exclusive upper bound.
///
/// The rejection loop has no retry cap. A `max_size` with no probability
/// mass below it never returns.
pub struct LeakSampler<'a> {
    dist: &'a FittedDistribution,
    max_size: Option<f64>,
    conversion: Option<UnitConversion>,
    converter: &'a dyn UnitConverter,
}

impl<'a> LeakSampler<'a> {
    pub fn new(dist: &'a FittedDistribution) -> Self {
        Self {
            dist,
            max_size: None,
            conversion: None,
            converter: &DEFAULT_CONVERTER,
        }
    }

    /// Exclusive upper bound on returned values.
    ///
    /// `None` and `Some(0.0)` both mean unbounded. A negative bound is kept
    /// as-is and never returns for non-negative families, so callers taking
    /// user input must reject it first.
    pub fn with_max_size(mut self, max_size: Option<f64>) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_conversion(mut self, conversion: Option<UnitConversion>) -> Self {
        self.conversion = conversion;
        self
    }

    pub fn with_converter(mut self, converter: &'a dyn UnitConverter) -> Self {
        self.converter = converter;
        self
    }

    /// Draw until a value below `max_size` comes up.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64> {
        loop {
            let mut value = self.dist.sample(rng);
            if let Some(units) = self.conversion.as_ref().filter(|u| u.needs_conversion()) {
                value = self
                    .converter
                    .convert(value, &units.metric, &units.increment)?;
            }
            match self.max_size {
                Some(max) if max != 0.0 && value >= max => continue,
                _ => return Ok(value),
            }
        }
    }
}

/// The per-subtype leak model produced at load time. Exactly one of the
/// two forms exists per subtype.
#[derive(Debug, Clone, PartialEq)]
pub enum LeakRateModel {
    Distribution(FittedDistribution),
    Empirical(Vec<f64>),
}

impl LeakRateModel {
    pub fn distribution(&self) -> Option<&FittedDistribution> {
        match self {
            LeakRateModel::Distribution(d) => Some(d),
            LeakRateModel::Empirical(_) => None,
        }
    }

    pub fn empirical_leak_rates(&self) -> Option<&[f64]> {
        match self {
            LeakRateModel::Distribution(_) => None,
            LeakRateModel::Empirical(rates) => Some(rates),
        }
    }

    /// One raw draw: a distribution sample, or a uniformly chosen element
    /// of the empirical rates.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64> {
        match self {
            LeakRateModel::Distribution(d) => Ok(d.sample(rng)),
            LeakRateModel::Empirical(rates) => {
                if rates.is_empty() {
                    return Err(Error::InsufficientData("empirical leak rates are empty".into()));
                }
                Ok(rates[rng.random_range(0..rates.len())])
            }
        }
    }

    pub fn summary(&self) -> ModelSummary {
        match self {
            LeakRateModel::Distribution(d) => ModelSummary::Dist { params: d.params() },
            LeakRateModel::Empirical(rates) => ModelSummary::Sample {
                count: rates.len(),
                min: rates.iter().copied().fold(f64::INFINITY, f64::min),
                max: rates.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            },
        }
    }
}

/// JSON-friendly description of a [`LeakRateModel`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ModelSummary {
    Dist {
        #[serde(flatten)]
        params: crate::dist::DistParams,
    },
    Sample {
        count: usize,
        min: f64,
        max: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::DistFamily;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Doubler;

    impl UnitConverter for Doubler {
        fn convert(&self, value: f64, _metric: &str, _increment: &str) -> Result<f64> {
            Ok(value * 2.0)
        }
    }

    fn lognorm() -> FittedDistribution {
        FittedDistribution::new(DistFamily::LogNormal, vec![1.5], 0.0, 1.0).unwrap()
    }

    #[test]
    fn no_conversion_is_identity() {
        let d = lognorm();
        let sampler = LeakSampler::new(&d);
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(sampler.sample(&mut a).unwrap(), d.sample(&mut b));
        }
    }

    #[test]
    fn conversion_applies_injected_converter() {
        let d = lognorm();
        let sampler = LeakSampler::new(&d)
            .with_conversion(Some(UnitConversion::new("kilogram", "hour")))
            .with_converter(&Doubler);
        let mut a = StdRng::seed_from_u64(1);
        let mut b = StdRng::seed_from_u64(1);
        assert_eq!(sampler.sample(&mut a).unwrap(), 2.0 * d.sample(&mut b));
    }

    #[test]
    fn gram_per_hour_skips_conversion() {
        // Only the metric is native here, yet no conversion happens.
        let d = lognorm();
        let sampler = LeakSampler::new(&d)
            .with_conversion(Some(UnitConversion::new("gram", "hour")))
            .with_converter(&Doubler);
        let mut a = StdRng::seed_from_u64(9);
        let mut b = StdRng::seed_from_u64(9);
        assert_eq!(sampler.sample(&mut a).unwrap(), d.sample(&mut b));
    }

    #[test]
    fn max_size_is_exclusive_bound() {
        let d = lognorm();
        let sampler = LeakSampler::new(&d).with_max_size(Some(0.5));
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            assert!(sampler.sample(&mut rng).unwrap() < 0.5);
        }
    }

    #[test]
    fn zero_max_size_is_unbounded() {
        let d = lognorm();
        let bounded = LeakSampler::new(&d).with_max_size(Some(0.0));
        let mut a = StdRng::seed_from_u64(11);
        let mut b = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            assert_eq!(bounded.sample(&mut a).unwrap(), d.sample(&mut b));
        }
    }

    #[test]
    fn unknown_unit_surfaces_from_sampler() {
        let d = lognorm();
        let sampler =
            LeakSampler::new(&d).with_conversion(Some(UnitConversion::new("furlong", "hour")));
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            sampler.sample(&mut rng),
            Err(Error::UnknownUnit { .. })
        ));
    }

    #[test]
    fn empirical_draw_picks_member() {
        let model = LeakRateModel::Empirical(vec![0.1, 0.2, 0.3]);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let v = model.draw(&mut rng).unwrap();
            assert!([0.1, 0.2, 0.3].contains(&v));
        }
        assert!(model.distribution().is_none());
        assert!(LeakRateModel::Empirical(vec![]).draw(&mut rng).is_err());
    }

    #[test]
    fn summary_serializes_mode_tag() {
        let model = LeakRateModel::Distribution(lognorm());
        let json = serde_json::to_value(model.summary()).unwrap();
        assert_eq!(json["mode"], "dist");
        assert_eq!(json["family"], "lognorm");
        let json = serde_json::to_value(LeakRateModel::Empirical(vec![1.0, 4.0]).summary()).unwrap();
        assert_eq!(json["mode"], "sample");
        assert_eq!(json["count"], 2);
    }
}
