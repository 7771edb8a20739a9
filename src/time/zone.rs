//! Timezone resolution: IANA ids, fixed offsets, and coordinate lookup.

use chrono::{FixedOffset, LocalResult, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use tzf_rs::DefaultFinder;

use crate::error::{ChartError, Result};

static FINDER: Lazy<DefaultFinder> = Lazy::new(DefaultFinder::new);

/// A resolved timezone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Zone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl Zone {
    pub fn label(&self) -> String {
        match self {
            Zone::Named(tz) => tz.name().to_string(),
            Zone::Fixed(offset) => format_offset(offset.local_minus_utc()),
        }
    }

    /// Offset in effect for a local wall-clock reading.
    ///
    /// Ambiguous readings (clocks set back) take the earlier instant; readings
    /// inside a forward gap do not exist and are rejected.
    pub fn offset_for_local(&self, wall: &NaiveDateTime) -> Result<FixedOffset> {
        match self {
            Zone::Fixed(offset) => Ok(*offset),
            Zone::Named(tz) => match tz.from_local_datetime(wall) {
                LocalResult::Single(dt) => Ok(dt.offset().fix()),
                LocalResult::Ambiguous(earlier, _) => Ok(earlier.offset().fix()),
                LocalResult::None => Err(ChartError::invalid_input(format!(
                    "{wall} does not exist in {} (skipped by a clock change)",
                    tz.name()
                ))),
            },
        }
    }
}

/// Resolve a timezone id.
///
/// Accepts IANA names (`Asia/Seoul`), `UTC`/`Z`, numeric offsets (`+09:00`,
/// `-0530`, `UTC+9`), and `auto` or an empty string when coordinates are
/// given, in which case the zone is looked up from the coordinates.
pub fn resolve_zone(id: &str, coordinates: Option<(f64, f64)>) -> Result<Zone> {
    let id = id.trim();

    if id.is_empty() || id.eq_ignore_ascii_case("auto") {
        let (latitude, longitude) = coordinates.ok_or_else(|| {
            ChartError::invalid_input("timezone 'auto' requires latitude and longitude")
        })?;
        return Ok(Zone::Named(zone_from_coordinates(latitude, longitude)?));
    }

    if let Ok(tz) = id.parse::<Tz>() {
        return Ok(Zone::Named(tz));
    }

    parse_fixed_offset(id)
        .map(Zone::Fixed)
        .ok_or_else(|| ChartError::invalid_input(format!("unknown timezone '{id}'")))
}

/// IANA zone containing the coordinates.
pub fn zone_from_coordinates(latitude: f64, longitude: f64) -> Result<Tz> {
    let name = FINDER.get_tz_name(longitude, latitude);
    name.parse::<Tz>().map_err(|_| {
        ChartError::invalid_input(format!(
            "no timezone found for coordinates {latitude:.4}, {longitude:.4}"
        ))
    })
}

fn parse_fixed_offset(id: &str) -> Option<FixedOffset> {
    let upper = id.to_ascii_uppercase();
    let rest = upper
        .strip_prefix("UTC")
        .or_else(|| upper.strip_prefix("GMT"))
        .unwrap_or(&upper);

    if rest.is_empty() || rest == "Z" || upper == "Z" {
        return FixedOffset::east_opt(0);
    }

    let (sign, digits) = match rest.as_bytes().first()? {
        b'+' => (1, &rest[1..]),
        b'-' => (-1, &rest[1..]),
        _ => return None,
    };

    if !digits.bytes().all(|b| b.is_ascii_digit() || b == b':') {
        return None;
    }

    let (hours, minutes) = if let Some((h, m)) = digits.split_once(':') {
        (h.parse::<i32>().ok()?, m.parse::<i32>().ok()?)
    } else if digits.len() == 4 {
        (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?)
    } else {
        (digits.parse::<i32>().ok()?, 0)
    };

    if hours > 14 || minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

pub fn format_offset(seconds: i32) -> String {
    let sign = if seconds < 0 { '-' } else { '+' };
    let abs = seconds.abs();
    format!("{sign}{:02}:{:02}", abs / 3600, (abs % 3600) / 60)
}
