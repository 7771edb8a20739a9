//! Julian Day conversions on chrono types.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::constants::{SECONDS_PER_DAY, UNIX_EPOCH_JD};

/// Julian Day (UTC scale) of an instant, with sub-second resolution.
pub fn julian_day_from_utc(instant: DateTime<Utc>) -> f64 {
    let seconds =
        instant.timestamp() as f64 + f64::from(instant.timestamp_subsec_nanos()) / 1e9;
    UNIX_EPOCH_JD + seconds / SECONDS_PER_DAY
}

/// Julian Day of a naive date-time read as UTC.
pub fn julian_day_from_naive(wall: NaiveDateTime) -> f64 {
    julian_day_from_utc(wall.and_utc())
}

/// Instant for a Julian Day, rounded to the millisecond.
pub fn utc_from_julian_day(jd: f64) -> Option<DateTime<Utc>> {
    let millis = ((jd - UNIX_EPOCH_JD) * SECONDS_PER_DAY * 1000.0).round();
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}

/// Julian Day Number of a calendar date (the integer JD at its noon).
pub fn julian_day_number(date: NaiveDate) -> i64 {
    let midnight = julian_day_from_naive(date.and_hms_opt(0, 0, 0).unwrap_or_default());
    (midnight + 0.5).floor() as i64
}

/// Julian centuries since J2000.0 for a Julian Day.
pub fn julian_centuries(jd: f64) -> f64 {
    (jd - crate::constants::J2000_JD) / 36_525.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_known_julian_days() {
        let j2000 = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert!((julian_day_from_utc(j2000) - 2_451_545.0).abs() < 1e-9);

        let epoch = Utc.with_ymd_and_hms(1984, 2, 2, 0, 0, 0).unwrap();
        assert!((julian_day_from_utc(epoch) - 2_445_732.5).abs() < 1e-9);
    }

    #[test]
    fn test_roundtrip_to_millisecond() {
        let t = Utc.with_ymd_and_hms(2024, 2, 4, 8, 27, 13).unwrap();
        let back = utc_from_julian_day(julian_day_from_utc(t)).unwrap();
        assert!((back - t).num_milliseconds().abs() <= 1);
    }

    #[test]
    fn test_julian_day_number() {
        let d = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        assert_eq!(julian_day_number(d), 2_451_545);
    }
}
