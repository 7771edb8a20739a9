//! Low-precision sun position from the Astronomical Almanac.
//!
//! Good to about 0.01° between 1950 and 2050 and still usable well beyond.
//! This is the fallback engine: it cannot fail and needs no data files.

use super::provider::{SolarPositionProvider, normalize_180, normalize_360};
use crate::constants::J2000_JD;
use crate::error::EphemerisError;

/// Mean longitude and apparent longitude of the sun, degrees.
fn almanac_longitudes(jd_utc: f64) -> (f64, f64) {
    let n = jd_utc - J2000_JD;
    let mean_longitude = normalize_360(280.460 + 0.985_647_4 * n);
    let g = normalize_360(357.528 + 0.985_600_3 * n).to_radians();
    let lambda = normalize_360(mean_longitude + 1.915 * g.sin() + 0.020 * (2.0 * g).sin());
    (mean_longitude, lambda)
}

/// Closed-form equation of time in minutes.
///
/// Mean longitude minus apparent right ascension, both from the almanac
/// formulas. Used whenever the active engine has no native model.
pub fn equation_of_time_minutes(jd_utc: f64) -> f64 {
    let n = jd_utc - J2000_JD;
    let (mean_longitude, lambda) = almanac_longitudes(jd_utc);
    let epsilon = (23.439 - 0.000_000_4 * n).to_radians();
    let lambda = lambda.to_radians();
    let right_ascension = (epsilon.cos() * lambda.sin()).atan2(lambda.cos()).to_degrees();
    4.0 * normalize_180(mean_longitude - right_ascension)
}

/// Fallback solar model.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateSolarModel;

impl ApproximateSolarModel {
    pub const NAME: &'static str = "approximate";

    pub fn new() -> Self {
        Self
    }
}

impl SolarPositionProvider for ApproximateSolarModel {
    fn longitude_at(&self, jd_utc: f64) -> Result<f64, EphemerisError> {
        if !jd_utc.is_finite() {
            return Err(EphemerisError::OutOfRange(jd_utc));
        }
        Ok(almanac_longitudes(jd_utc).1)
    }
}
