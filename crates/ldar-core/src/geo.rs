//! Nearest-index lookup and WGS-84 coordinate conversion.

use serde::Serialize;

/// WGS-84 semi-major (equatorial) axis, km.
pub const WGS84_A_KM: f64 = 6378.1370;
/// WGS-84 semi-minor (polar) axis, km.
pub const WGS84_B_KM: f64 = 6356.752314;

/// Index of the candidate closest to `dd`; the first one on ties.
///
/// As with numpy `argmin`, a NaN distance wins: the first NaN candidate is
/// returned, and a NaN `dd` yields index 0.
pub fn geo_idx(dd: f64, candidates: &[f64]) -> Option<usize> {
    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| (i, (c - dd).abs()))
        .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
            Some((_, bd)) if bd.is_nan() => best,
            Some(_) if d.is_nan() => Some((i, d)),
            Some((_, bd)) if bd <= d => best,
            _ => Some((i, d)),
        })
        .map(|(i, _)| i)
}

/// Geodetic position on the WGS-84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Geodetic {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub alt_km: f64,
}

/// ECEF `[x, y, z]` in km to geodetic coordinates, using Bowring's
/// closed-form latitude.
pub fn ecef_to_llh(ecef_km: [f64; 3]) -> Geodetic {
    let [x, y, z] = ecef_km;
    let a = WGS84_A_KM;
    let b = WGS84_B_KM;
    let p = x.hypot(y);
    let lon = y.atan2(x);

    if p < 1e-9 {
        return Geodetic {
            lat_deg: 90.0f64.copysign(z),
            lon_deg: lon.to_degrees(),
            alt_km: z.abs() - b,
        };
    }

    let theta = (z * a).atan2(p * b);
    let esq = 1.0 - (b / a).powi(2);
    let epsq = (a / b).powi(2) - 1.0;
    let lat = (z + epsq * b * theta.sin().powi(3)).atan2(p - esq * a * theta.cos().powi(3));
    let n = a * a / (a * a * lat.cos().powi(2) + b * b * lat.sin().powi(2)).sqrt();

    Geodetic {
        lat_deg: lat.to_degrees(),
        lon_deg: lon.to_degrees(),
        alt_km: p / lat.cos() - n,
    }
}

/// Geodetic coordinates to ECEF `[x, y, z]` in km.
pub fn llh_to_ecef(pos: Geodetic) -> [f64; 3] {
    let lat = pos.lat_deg.to_radians();
    let lon = pos.lon_deg.to_radians();
    let e2 = 1.0 - (WGS84_B_KM / WGS84_A_KM).powi(2);
    let (sin_lat, cos_lat) = lat.sin_cos();
    let n = WGS84_A_KM / (1.0 - e2 * sin_lat * sin_lat).sqrt();

    [
        (n + pos.alt_km) * cos_lat * lon.cos(),
        (n + pos.alt_km) * cos_lat * lon.sin(),
        (n * (1.0 - e2) + pos.alt_km) * sin_lat,
    ]
}
