//! Wall clock + timezone → UTC instant, Julian Day and true solar time.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::julian::julian_day_from_utc;
use super::zone::{Zone, resolve_zone};
use crate::error::{ChartError, Result};

/// How reliable the reported birth time is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeAccuracy {
    #[default]
    Exact,
    Approximate,
    /// No hour pillar is produced.
    Unknown,
}

impl TimeAccuracy {
    pub fn has_hour(self) -> bool {
        !matches!(self, TimeAccuracy::Unknown)
    }
}

impl std::str::FromStr for TimeAccuracy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exact" => Ok(TimeAccuracy::Exact),
            "approximate" | "approx" => Ok(TimeAccuracy::Approximate),
            "unknown" => Ok(TimeAccuracy::Unknown),
            other => Err(format!(
                "unknown time accuracy '{other}' (expected exact, approximate or unknown)"
            )),
        }
    }
}

/// Geographic position of the birth place, degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ChartError::invalid_input(format!(
                "latitude must be between -90 and 90 degrees (got {latitude})"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ChartError::invalid_input(format!(
                "longitude must be between -180 and 180 degrees (got {longitude})"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Where the equation-of-time value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EotSource {
    Engine,
    Approximation,
}

/// Shift from civil clock to local apparent (true solar) time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolarTimeCorrection {
    /// 4 minutes per degree east of the zone's nominal meridian.
    pub longitude_minutes: f64,
    pub equation_of_time_minutes: f64,
    pub total_minutes: f64,
    pub eot_source: EotSource,
    /// Civil wall clock shifted by `total_minutes`.
    pub wall: NaiveDateTime,
}

/// A birth instant on every time scale the pillar resolver needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedTime {
    pub utc: DateTime<Utc>,
    pub julian_day: f64,
    /// Civil wall clock as entered.
    pub local: NaiveDateTime,
    pub utc_offset_seconds: i32,
    pub timezone: String,
    pub solar: Option<SolarTimeCorrection>,
}

impl NormalizedTime {
    /// The wall clock used for hour reckoning.
    pub fn reckoning_wall(&self) -> NaiveDateTime {
        self.solar.as_ref().map_or(self.local, |s| s.wall)
    }

    /// Nominal meridian of the zone offset in effect, degrees east.
    pub fn zone_meridian(&self) -> f64 {
        f64::from(self.utc_offset_seconds) / 3600.0 * 15.0
    }
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a wall-clock string.
///
/// A bare date is accepted only when the time is unknown; it is read as noon
/// so that the solar computations sit in the middle of the day.
pub fn parse_wall_clock(input: &str, accuracy: TimeAccuracy) -> Result<NaiveDateTime> {
    let input = input.trim();
    if let Some(wall) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
    {
        return Ok(wall);
    }

    match NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        Ok(date) if !accuracy.has_hour() => Ok(date.and_time(NaiveTime::MIN + Duration::hours(12))),
        Ok(_) => Err(ChartError::invalid_input(format!(
            "'{input}' has no time of day; pass a time or set time accuracy to unknown"
        ))),
        Err(_) => Err(ChartError::invalid_input(format!(
            "cannot parse '{input}' as YYYY-MM-DD[THH:MM[:SS]]"
        ))),
    }
}

/// Resolve a wall-clock reading in a timezone to UTC and Julian Day.
///
/// True solar time is not applied here; see [`true_solar_correction`].
pub fn normalize(
    local: &str,
    timezone: &str,
    coordinates: Option<Coordinates>,
    accuracy: TimeAccuracy,
) -> Result<NormalizedTime> {
    let wall = parse_wall_clock(local, accuracy)?;
    let zone: Zone = resolve_zone(timezone, coordinates.map(|c| (c.latitude, c.longitude)))?;
    let offset = zone.offset_for_local(&wall)?;

    let utc = (wall - Duration::seconds(i64::from(offset.local_minus_utc()))).and_utc();

    Ok(NormalizedTime {
        utc,
        julian_day: julian_day_from_utc(utc),
        local: wall,
        utc_offset_seconds: offset.local_minus_utc(),
        timezone: zone.label(),
        solar: None,
    })
}

/// Build the true-solar-time correction for a normalized instant.
pub fn true_solar_correction(
    time: &NormalizedTime,
    longitude: f64,
    equation_of_time_minutes: f64,
    eot_source: EotSource,
) -> SolarTimeCorrection {
    let longitude_minutes = 4.0 * (longitude - time.zone_meridian());
    let total_minutes = longitude_minutes + equation_of_time_minutes;
    let shift = Duration::milliseconds((total_minutes * 60_000.0).round() as i64);

    SolarTimeCorrection {
        longitude_minutes,
        equation_of_time_minutes,
        total_minutes,
        eot_source,
        wall: time.local + shift,
    }
}
