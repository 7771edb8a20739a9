//! Analytical solar ephemeris after Meeus, *Astronomical Algorithms*.
//!
//! Geometric longitude from the ch.25 series, corrected for nutation in
//! longitude (ch.22, four leading terms) and annual aberration, evaluated in
//! Terrestrial Time via a piecewise ΔT polynomial (Espenak & Meeus, 2006).
//! Accuracy is a few thousandths of a degree over 1800–2200, ample for
//! locating solar-term boundaries to within a minute or two.
//!
//! The equation of time uses Smart's series (Meeus eq. 28.3).

use std::f64::consts::PI;

use super::provider::{SolarPositionProvider, normalize_360};
use crate::constants::{J2000_JD, SECONDS_PER_DAY};
use crate::error::EphemerisError;
use crate::time::julian::julian_centuries;

/// Arcseconds to degrees.
const AS2DEG: f64 = 1.0 / 3600.0;

/// Beyond ±10 centuries of J2000 the series and ΔT fit are not trusted.
const MAX_CENTURIES: f64 = 10.0;

/// Mean elements of the sun for Julian centuries `t` (TT).
#[derive(Debug, Clone, Copy)]
struct SolarElements {
    /// Geometric mean longitude, degrees.
    mean_longitude: f64,
    /// Mean anomaly, degrees.
    mean_anomaly: f64,
    /// Orbital eccentricity of the earth.
    eccentricity: f64,
    /// Longitude of the moon's ascending node, degrees.
    node: f64,
}

impl SolarElements {
    fn at(t: f64) -> Self {
        let t2 = t * t;
        Self {
            mean_longitude: normalize_360(280.466_46 + 36_000.769_83 * t + 0.000_303_2 * t2),
            mean_anomaly: normalize_360(357.529_11 + 35_999.050_29 * t - 0.000_153_7 * t2),
            eccentricity: 0.016_708_634 - 0.000_042_037 * t - 0.000_000_126_7 * t2,
            node: normalize_360(125.044_52 - 1_934.136_261 * t),
        }
    }

    /// Equation of the centre, degrees.
    fn centre(&self, t: f64) -> f64 {
        let m = self.mean_anomaly.to_radians();
        (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * m.sin()
            + (0.019_993 - 0.000_101 * t) * (2.0 * m).sin()
            + 0.000_289 * (3.0 * m).sin()
    }

    /// Earth–sun distance in AU for a given true anomaly.
    fn radius(&self, true_anomaly: f64) -> f64 {
        let e = self.eccentricity;
        1.000_001_018 * (1.0 - e * e) / (1.0 + e * true_anomaly.to_radians().cos())
    }
}

/// Nutation in longitude and obliquity, degrees (Meeus ch.22 short series).
fn nutation(t: f64, elements: &SolarElements) -> (f64, f64) {
    let omega = elements.node.to_radians();
    let l_sun = elements.mean_longitude.to_radians();
    let l_moon = normalize_360(218.316_5 + 481_267.881_3 * t).to_radians();

    let delta_psi = -17.20 * omega.sin() - 1.32 * (2.0 * l_sun).sin() - 0.23 * (2.0 * l_moon).sin()
        + 0.21 * (2.0 * omega).sin();
    let delta_eps = 9.20 * omega.cos() + 0.57 * (2.0 * l_sun).cos() + 0.10 * (2.0 * l_moon).cos()
        - 0.09 * (2.0 * omega).cos();

    (delta_psi * AS2DEG, delta_eps * AS2DEG)
}

/// Mean obliquity of the ecliptic, degrees (Meeus eq. 22.2).
fn mean_obliquity(t: f64) -> f64 {
    let seconds = 21.448 - 46.815_0 * t - 0.000_59 * t * t + 0.001_813 * t * t * t;
    23.0 + (26.0 + seconds / 60.0) / 60.0
}

/// ΔT = TT − UT in seconds for a decimal year.
///
/// Piecewise polynomials from the NASA eclipse pages (Espenak & Meeus).
pub fn delta_t_seconds(year: f64) -> f64 {
    let long_term = |y: f64| {
        let u = (y - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u
    };

    match year {
        y if y < 1800.0 => long_term(y),
        y if y < 1860.0 => {
            let t = y - 1800.0;
            13.72 - 0.332_447 * t + 0.006_861_2 * t.powi(2) + 0.004_111_6 * t.powi(3)
                - 0.000_374_36 * t.powi(4)
                + 0.000_012_127_2 * t.powi(5)
                - 0.000_000_169_9 * t.powi(6)
                + 0.000_000_000_875 * t.powi(7)
        }
        y if y < 1900.0 => {
            let t = y - 1860.0;
            7.62 + 0.573_7 * t - 0.251_754 * t.powi(2) + 0.016_806_68 * t.powi(3)
                - 0.000_447_362_4 * t.powi(4)
                + t.powi(5) / 233_174.0
        }
        y if y < 1920.0 => {
            let t = y - 1900.0;
            -2.79 + 1.494_119 * t - 0.059_893_9 * t.powi(2) + 0.006_196_6 * t.powi(3)
                - 0.000_197 * t.powi(4)
        }
        y if y < 1941.0 => {
            let t = y - 1920.0;
            21.20 + 0.844_93 * t - 0.076_100 * t.powi(2) + 0.002_093_6 * t.powi(3)
        }
        y if y < 1961.0 => {
            let t = y - 1950.0;
            29.07 + 0.407 * t - t.powi(2) / 233.0 + t.powi(3) / 2547.0
        }
        y if y < 1986.0 => {
            let t = y - 1975.0;
            45.45 + 1.067 * t - t.powi(2) / 260.0 - t.powi(3) / 718.0
        }
        y if y < 2005.0 => {
            let t = y - 2000.0;
            63.86 + 0.334_5 * t - 0.060_374 * t.powi(2)
                + 0.001_727_5 * t.powi(3)
                + 0.000_651_814 * t.powi(4)
                + 0.000_023_735_99 * t.powi(5)
        }
        y if y < 2050.0 => {
            let t = y - 2000.0;
            62.92 + 0.322_17 * t + 0.005_589 * t.powi(2)
        }
        y if y < 2150.0 => long_term(y) - 0.562_8 * (2150.0 - y),
        y => long_term(y),
    }
}

/// The default high-precision engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeeusEphemeris;

impl MeeusEphemeris {
    pub const NAME: &'static str = "meeus";

    pub fn new() -> Self {
        Self
    }

    /// Julian centuries in TT for a UTC Julian Day.
    fn centuries_tt(jd_utc: f64) -> Result<f64, EphemerisError> {
        if !jd_utc.is_finite() {
            return Err(EphemerisError::OutOfRange(jd_utc));
        }
        let year = 2000.0 + (jd_utc - J2000_JD) / 365.25;
        let jde = jd_utc + delta_t_seconds(year) / SECONDS_PER_DAY;
        let t = julian_centuries(jde);
        if t.abs() > MAX_CENTURIES {
            return Err(EphemerisError::OutOfRange(jd_utc));
        }
        Ok(t)
    }

    /// Apparent longitude for Julian centuries `t` (TT).
    fn apparent_longitude(t: f64) -> f64 {
        let el = SolarElements::at(t);
        let centre = el.centre(t);
        let true_longitude = el.mean_longitude + centre;
        let radius = el.radius(el.mean_anomaly + centre);
        let (delta_psi, _) = nutation(t, &el);
        let aberration = -20.4898 * AS2DEG / radius;
        normalize_360(true_longitude + delta_psi + aberration)
    }
}

impl SolarPositionProvider for MeeusEphemeris {
    fn longitude_at(&self, jd_utc: f64) -> Result<f64, EphemerisError> {
        Ok(Self::apparent_longitude(Self::centuries_tt(jd_utc)?))
    }

    fn equation_of_time_at(&self, jd_utc: f64) -> Result<Option<f64>, EphemerisError> {
        let t = Self::centuries_tt(jd_utc)?;
        let el = SolarElements::at(t);
        let (_, delta_eps) = nutation(t, &el);
        let epsilon = (mean_obliquity(t) + delta_eps).to_radians();

        let y = (epsilon / 2.0).tan().powi(2);
        let l0 = el.mean_longitude.to_radians();
        let m = el.mean_anomaly.to_radians();
        let e = el.eccentricity;

        let radians = y * (2.0 * l0).sin() - 2.0 * e * m.sin()
            + 4.0 * e * y * m.sin() * (2.0 * l0).cos()
            - 0.5 * y * y * (4.0 * l0).sin()
            - 1.25 * e * e * (2.0 * m).sin();

        // One radian of hour angle is 720/π minutes of time.
        Ok(Some(radians * 720.0 / PI))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::julian::julian_day_from_utc;
    use chrono::{TimeZone, Utc};

    fn jd(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> f64 {
        julian_day_from_utc(Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap())
    }

    #[test]
    fn test_meeus_example_25a() {
        // Meeus example 25.a: 1992-10-13 0h TD, apparent λ = 199.90895°
        let jd_tt = 2_448_908.5;
        let t = julian_centuries(jd_tt);
        let lambda = MeeusEphemeris::apparent_longitude(t);
        assert!((lambda - 199.908_95).abs() < 0.002, "λ = {lambda}");
    }

    #[test]
    fn test_equinox_and_solstice_longitudes() {
        let engine = MeeusEphemeris::new();
        // 2024 March equinox 03:06 UTC, June solstice 20:51 UTC
        let march = engine.longitude_at(jd(2024, 3, 20, 3, 6)).unwrap();
        assert!(march < 0.01 || march > 359.99, "march = {march}");
        let june = engine.longitude_at(jd(2024, 6, 20, 20, 51)).unwrap();
        assert!((june - 90.0).abs() < 0.01, "june = {june}");
    }

    #[test]
    fn test_lichun_2024_longitude() {
        // 입춘 2024 falls at 08:27 UTC on 4 February
        let lambda = MeeusEphemeris::new()
            .longitude_at(jd(2024, 2, 4, 8, 27))
            .unwrap();
        assert!((lambda - 315.0).abs() < 0.01, "λ = {lambda}");
    }

    #[test]
    fn test_equation_of_time_extremes() {
        let engine = MeeusEphemeris::new();
        let feb = engine.equation_of_time_at(jd(2024, 2, 11, 12, 0)).unwrap().unwrap();
        assert!((feb - (-14.2)).abs() < 0.3, "feb = {feb}");
        let nov = engine.equation_of_time_at(jd(2024, 11, 3, 12, 0)).unwrap().unwrap();
        assert!((nov - 16.4).abs() < 0.3, "nov = {nov}");
    }

    #[test]
    fn test_delta_t_is_continuous_enough() {
        assert!((delta_t_seconds(2000.0) - 63.86).abs() < 0.01);
        assert!((delta_t_seconds(2004.999) - delta_t_seconds(2005.0)).abs() < 1.0);
        assert!((delta_t_seconds(1985.999) - delta_t_seconds(1986.0)).abs() < 1.0);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let engine = MeeusEphemeris::new();
        assert!(matches!(
            engine.longitude_at(J2000_JD + 400_000.0),
            Err(EphemerisError::OutOfRange(_))
        ));
        assert!(engine.longitude_at(f64::NAN).is_err());
    }
}
