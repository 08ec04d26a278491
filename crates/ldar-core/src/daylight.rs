//! Civil-twilight daylight window.
//!
//! Solar declination and the equation of time follow Spencer (1971). The sun
//! centre is taken at -6° with no refraction. Times are local decimal hours
//! under a fixed UTC offset.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::f64::consts::PI;

/// Sun-centre elevation marking civil twilight, degrees.
pub const CIVIL_TWILIGHT_DEG: f64 = -6.0;

/// UTC offset of the reference deployment (Mountain Standard Time).
pub const DEFAULT_UTC_OFFSET_HOURS: f64 = -7.0;

/// Local sunrise and sunset as decimal hours in `[0, 24)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Daylight {
    pub sunrise: f64,
    pub sunset: f64,
}

impl Daylight {
    /// Hours between sunrise and sunset, allowing for wrap past midnight.
    pub fn length_hours(&self) -> f64 {
        (self.sunset - self.sunrise).rem_euclid(24.0)
    }
}

/// Daylight window at the default UTC offset.
///
/// Returns `None` when the sun never crosses the twilight line that day.
pub fn quick_cal_daylight(date: NaiveDate, lat_deg: f64, lon_deg: f64) -> Option<Daylight> {
    daylight_with_offset(date, lat_deg, lon_deg, DEFAULT_UTC_OFFSET_HOURS)
}

pub fn daylight_with_offset(
    date: NaiveDate,
    lat_deg: f64,
    lon_deg: f64,
    utc_offset_hours: f64,
) -> Option<Daylight> {
    let b = 2.0 * PI * (date.ordinal() as f64 - 1.0) / 365.0;
    let decl = 0.006918 - 0.399912 * b.cos() + 0.070257 * b.sin() - 0.006758 * (2.0 * b).cos()
        + 0.000907 * (2.0 * b).sin()
        - 0.002697 * (3.0 * b).cos()
        + 0.00148 * (3.0 * b).sin();
    let eot_min = 229.18
        * (0.000075 + 0.001868 * b.cos()
            - 0.032077 * b.sin()
            - 0.014615 * (2.0 * b).cos()
            - 0.04089 * (2.0 * b).sin());

    let lat = lat_deg.to_radians();
    let cos_h = (CIVIL_TWILIGHT_DEG.to_radians().sin() - lat.sin() * decl.sin())
        / (lat.cos() * decl.cos());
    if !(-1.0..=1.0).contains(&cos_h) {
        return None;
    }
    let half_day_h = cos_h.acos().to_degrees() / 15.0;
    let noon_utc_h = 12.0 - lon_deg / 15.0 - eot_min / 60.0;

    Some(Daylight {
        sunrise: (noon_utc_h - half_day_h + utc_offset_hours).rem_euclid(24.0),
        sunset: (noon_utc_h + half_day_h + utc_offset_hours).rem_euclid(24.0),
    })
}
