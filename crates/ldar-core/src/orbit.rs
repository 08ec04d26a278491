//! Satellite coverage footprints along a predicted ground track.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::geo::{ecef_to_llh, Geodetic};

/// Half-width of a footprint, in degrees of latitude/longitude.
pub const FOOTPRINT_OFFSET_DEG: f64 = 0.1;

/// Anything that can report a satellite's ECEF position (km) at a time.
pub trait OrbitPredictor {
    fn position_ecef(&self, at: DateTime<Utc>) -> Result<[f64; 3]>;
}

/// Quadrilateral in `(lon, lat)` degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoveragePolygon {
    pub vertices: [(f64, f64); 4],
}

impl CoveragePolygon {
    /// Box spanning two successive ground points.
    pub fn between(start: Geodetic, end: Geodetic) -> Self {
        let d = FOOTPRINT_OFFSET_DEG;
        Self {
            vertices: [
                (start.lon_deg, start.lat_deg + d),
                (start.lon_deg + d, start.lat_deg),
                (end.lon_deg, end.lat_deg - d),
                (end.lon_deg - d, end.lat_deg),
            ],
        }
    }

    /// Ray-casting point-in-polygon test.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        let v = &self.vertices;
        let mut inside = false;
        let mut j = v.len() - 1;
        for i in 0..v.len() {
            let (xi, yi) = v[i];
            let (xj, yj) = v[j];
            if (yi > lat) != (yj > lat) && lon < (xj - xi) * (lat - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

/// A footprint stamped with the start of its interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageFootprint {
    pub time: DateTime<Utc>,
    pub polygon: CoveragePolygon,
}

/// Walk `[start, end)` in steps of `interval_minutes`, building one footprint
/// per step from the ground points at `t` and `t + interval`.
pub fn init_orbit_poly<P: OrbitPredictor + ?Sized>(
    predictor: &P,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    interval_minutes: f64,
) -> Result<Vec<CoverageFootprint>> {
    if !(interval_minutes.is_finite() && interval_minutes > 0.0) {
        return Err(Error::InvalidArgument(format!(
            "orbit interval must be positive, got {} minutes",
            interval_minutes
        )));
    }
    let step = Duration::milliseconds((interval_minutes * 60_000.0).round() as i64);
    if step <= Duration::zero() {
        return Err(Error::InvalidArgument(format!(
            "orbit interval {} minutes rounds to zero",
            interval_minutes
        )));
    }

    let mut footprints = Vec::new();
    let mut t = start;
    while t < end {
        let here = ecef_to_llh(predictor.position_ecef(t)?);
        let next = ecef_to_llh(predictor.position_ecef(t + step)?);
        footprints.push(CoverageFootprint {
            time: t,
            polygon: CoveragePolygon::between(here, next),
        });
        t += step;
    }
    tracing::debug!(count = footprints.len(), "built orbit coverage footprints");
    Ok(footprints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::llh_to_ecef;
    use chrono::TimeZone;

    /// Ground track moving east along the equator at one degree per minute.
    struct EquatorTrack {
        epoch: DateTime<Utc>,
    }

    impl OrbitPredictor for EquatorTrack {
        fn position_ecef(&self, at: DateTime<Utc>) -> Result<[f64; 3]> {
            let minutes = (at - self.epoch).num_seconds() as f64 / 60.0;
            Ok(llh_to_ecef(Geodetic {
                lat_deg: 0.0,
                lon_deg: minutes,
                alt_km: 700.0,
            }))
        }
    }

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn steps_until_end_exclusive() {
        let track = EquatorTrack { epoch: epoch() };
        let out = init_orbit_poly(&track, epoch(), epoch() + Duration::minutes(10), 2.0).unwrap();
        assert_eq!(out.len(), 5);
        assert_eq!(out[0].time, epoch());
        assert_eq!(out[4].time, epoch() + Duration::minutes(8));
    }

    #[test]
    fn overshooting_interval_still_terminates() {
        let track = EquatorTrack { epoch: epoch() };
        let out = init_orbit_poly(&track, epoch(), epoch() + Duration::minutes(5), 3.0).unwrap();
        assert_eq!(out.len(), 2);
        let none = init_orbit_poly(&track, epoch(), epoch(), 3.0).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn polygon_vertices_follow_track() {
        let track = EquatorTrack { epoch: epoch() };
        let out = init_orbit_poly(&track, epoch(), epoch() + Duration::minutes(1), 1.0).unwrap();
        let [p1, p2, p3, p4] = out[0].polygon.vertices;
        assert!((p1.0 - 0.0).abs() < 1e-9 && (p1.1 - 0.1).abs() < 1e-6);
        assert!((p2.0 - 0.1).abs() < 1e-9 && p2.1.abs() < 1e-6);
        assert!((p3.0 - 1.0).abs() < 1e-9 && (p3.1 + 0.1).abs() < 1e-6);
        assert!((p4.0 - 0.9).abs() < 1e-9 && p4.1.abs() < 1e-6);
        assert!(out[0].polygon.contains(0.5, 0.01));
        assert!(!out[0].polygon.contains(0.5, 0.5));
    }

    #[test]
    fn non_positive_interval_rejected() {
        let track = EquatorTrack { epoch: epoch() };
        let err = init_orbit_poly(&track, epoch(), epoch() + Duration::minutes(5), 0.0).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(init_orbit_poly(&track, epoch(), epoch(), -1.0).is_err());
    }
}
