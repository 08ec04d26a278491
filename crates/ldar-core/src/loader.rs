//! Program distribution loader.
//!
//! Resolves every subtype of a [`Program`] into a [`LeakRateModel`] once, at
//! configuration-load time. Parametric subtypes become a
//! [`FittedDistribution`]; sample subtypes read the first column of their
//! leak-rate file. The program itself is left untouched.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ldar_config::{LeakRateSource, Program, ShapeSpec, SubtypeLeakConfig, ValidationError};

use crate::dist::{fit_dist, DistFamily};
use crate::error::{Error, Result};
use crate::leak::LeakRateModel;
use crate::units::UnitConversion;

/// A loaded subtype: its leak model plus the sampling settings that travel
/// with it.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtypeModel {
    pub model: LeakRateModel,
    pub max_leak_rate: Option<f64>,
    pub units: Option<UnitConversion>,
}

/// Leak models for every subtype of a program.
#[derive(Debug, Clone)]
pub struct ProgramDistributions {
    working_dir: PathBuf,
    subtypes: BTreeMap<String, SubtypeModel>,
}

impl ProgramDistributions {
    /// Build models for every subtype. Relative `leak_rates_file` paths
    /// resolve against `working_dir`. The first failing subtype aborts the
    /// load.
    pub fn load(program: &Program, working_dir: &Path) -> Result<Self> {
        let mut subtypes = BTreeMap::new();
        for (id, cfg) in &program.subtypes {
            let model = unpackage_dist(id, cfg, working_dir)?;
            subtypes.insert(
                id.clone(),
                SubtypeModel {
                    model,
                    max_leak_rate: cfg.max_leak_rate,
                    units: cfg.leak_rate_units.clone().map(UnitConversion::from),
                },
            );
        }
        tracing::info!(
            subtypes = subtypes.len(),
            working_dir = %working_dir.display(),
            "loaded leak-rate models"
        );
        Ok(Self {
            working_dir: working_dir.to_path_buf(),
            subtypes,
        })
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn get(&self, subtype: &str) -> Option<&SubtypeModel> {
        self.subtypes.get(subtype)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SubtypeModel)> {
        self.subtypes.iter()
    }

    pub fn len(&self) -> usize {
        self.subtypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subtypes.is_empty()
    }
}

/// Resolve one subtype's leak model.
pub fn unpackage_dist(id: &str, cfg: &SubtypeLeakConfig, working_dir: &Path) -> Result<LeakRateModel> {
    match cfg.source() {
        LeakRateSource::Dist => {
            let name = cfg
                .dist_type
                .as_deref()
                .ok_or_else(|| ValidationError::MissingField(format!("subtypes.{id}.dist_type")))?;
            let family = DistFamily::lookup(name)?;
            let configured = cfg
                .dist_scale
                .ok_or_else(|| ValidationError::MissingField(format!("subtypes.{id}.dist_scale")))?;
            let scale = if family.scale_is_log_mean() {
                configured.exp()
            } else {
                configured
            };
            let shape = match cfg.dist_sigma {
                Some(sigma) => Some(ShapeSpec::Scalar(sigma)),
                None => cfg.dist_shape.clone(),
            };
            let dist = fit_dist(None, family, 0.0, shape.as_ref(), Some(scale))?;
            tracing::debug!(
                subtype = id,
                family = %family,
                shape = ?dist.shape(),
                scale = dist.scale(),
                "resolved parametric leak distribution"
            );
            Ok(LeakRateModel::Distribution(dist))
        }
        LeakRateSource::Sample => {
            let file = cfg.leak_rates_file.as_ref().ok_or_else(|| {
                ValidationError::MissingField(format!("subtypes.{id}.leak_rates_file"))
            })?;
            let rates = read_leak_rates(&working_dir.join(file))?;
            tracing::debug!(
                subtype = id,
                file = %file.display(),
                count = rates.len(),
                "loaded empirical leak rates"
            );
            Ok(LeakRateModel::Empirical(rates))
        }
    }
}

/// Read the first column of a CSV file with a header row.
pub fn read_leak_rates(path: &Path) -> Result<Vec<f64>> {
    let sample_err = |reason: String| Error::SampleFile {
        path: path.to_path_buf(),
        reason,
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| sample_err(e.to_string()))?;

    let mut rates = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| sample_err(e.to_string()))?;
        let field = record.get(0).unwrap_or("").trim();
        let value: f64 = field
            .parse()
            .map_err(|_| sample_err(format!("row {}: not a number: {:?}", row + 1, field)))?;
        rates.push(value);
    }
    if rates.is_empty() {
        return Err(sample_err("no leak rates in first column".into()));
    }
    Ok(rates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist_cfg(dist_type: &str, shape: Option<ShapeSpec>, scale: f64) -> SubtypeLeakConfig {
        SubtypeLeakConfig {
            dist_type: Some(dist_type.into()),
            dist_shape: shape,
            dist_scale: Some(scale),
            ..Default::default()
        }
    }

    #[test]
    fn lognorm_scale_is_exponentiated_once() {
        let cfg = dist_cfg("lognorm", Some(ShapeSpec::Scalar(2.0)), 1.5);
        let model = unpackage_dist("a", &cfg, Path::new(".")).unwrap();
        let dist = model.distribution().unwrap();
        assert!((dist.scale() - 1.5f64.exp()).abs() < 1e-12);

        // Loading the same config again must not compound the exp.
        let again = unpackage_dist("a", &cfg, Path::new(".")).unwrap();
        assert_eq!(model, again);
    }

    #[test]
    fn non_lognorm_scale_is_used_verbatim() {
        let cfg = dist_cfg("gamma", Some(ShapeSpec::Scalar(2.0)), 1.5);
        let model = unpackage_dist("a", &cfg, Path::new(".")).unwrap();
        assert_eq!(model.distribution().unwrap().scale(), 1.5);
    }

    #[test]
    fn sigma_overrides_shape() {
        let mut cfg = dist_cfg("lognorm", Some(ShapeSpec::Scalar(9.0)), 0.0);
        cfg.dist_sigma = Some(0.4);
        let model = unpackage_dist("a", &cfg, Path::new(".")).unwrap();
        assert_eq!(model.distribution().unwrap().shape(), &[0.4]);
    }

    #[test]
    fn absent_source_defaults_to_parametric() {
        let cfg = dist_cfg("expon", None, 2.0);
        assert!(cfg.leak_rate_source.is_none());
        let model = unpackage_dist("a", &cfg, Path::new(".")).unwrap();
        assert!(matches!(model, LeakRateModel::Distribution(_)));
    }

    #[test]
    fn unknown_family_fails_load() {
        let cfg = dist_cfg("cauchy", None, 1.0);
        let err = unpackage_dist("a", &cfg, Path::new(".")).unwrap_err();
        assert!(matches!(err, Error::UnknownFamily { .. }));
    }

    #[test]
    fn missing_sample_file_is_fatal() {
        let cfg = SubtypeLeakConfig {
            leak_rate_source: Some(LeakRateSource::Sample),
            leak_rates_file: Some(PathBuf::from("does-not-exist.csv")),
            ..Default::default()
        };
        let err = unpackage_dist("a", &cfg, Path::new("/nonexistent")).unwrap_err();
        assert!(matches!(err, Error::SampleFile { .. }));
    }
}
