//! Year, month, day and hour pillar derivations.
//!
//! Each derivation is a small pure function; [`resolve_pillars`] wires them
//! to a normalized birth instant and a solar-term locator.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Serialize;

use super::{FourPillars, HourBoundary};
use crate::constants::{DAY_EPOCH_JD, YEAR_EPOCH};
use crate::cycle::{Branch, Ganji, Stem};
use crate::error::{ChartError, PillarStage, Result};
use crate::solar::terms::{SolarTermInfo, SolarTermLocator, SurroundingTerms};
use crate::time::normalize::{NormalizedTime, TimeAccuracy};

/// First-month (寅) stem for each year stem modulo 5: 甲己→丙, 乙庚→戊,
/// 丙辛→庚, 丁壬→壬, 戊癸→甲.
const FIVE_TIGER_STEMS: [usize; 5] = [2, 4, 6, 8, 0];

/// Solar-term facts about the birth instant, reused by the luck projector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolarContext {
    /// Apparent solar longitude at birth, degrees.
    pub sun_longitude: f64,
    pub solar_year: i32,
    /// 입춘 of the civil year of birth.
    pub lichun: SolarTermInfo,
    pub surrounding: SurroundingTerms,
    /// The jie term whose month the birth falls in.
    pub governing_jie: SolarTermInfo,
    pub next_jie: SolarTermInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPillars {
    pub pillars: FourPillars,
    pub context: SolarContext,
    /// Wall clock the hour was reckoned on.
    pub reckoning_wall: NaiveDateTime,
}

/// The solar year containing an instant: the civil year once its 입춘 has
/// passed, the previous one before that.
pub fn solar_year_of(civil_year: i32, julian_day: f64, lichun_julian_day: f64) -> i32 {
    if julian_day >= lichun_julian_day {
        civil_year
    } else {
        civil_year - 1
    }
}

/// Year pillar of a solar year, anchored at 1984 = 甲子.
pub fn year_pillar(solar_year: i32) -> Ganji {
    Ganji::from_cycle(i64::from(solar_year) - i64::from(YEAR_EPOCH))
}

/// Month stem by the five-tiger rule.
pub fn month_stem_for(year_stem: Stem, month_branch: Branch) -> Stem {
    let first = FIVE_TIGER_STEMS[year_stem.index() % 5];
    let month_number = (month_branch.index() + 12 - Branch::In.index()) % 12;
    Stem::from_index((first + month_number) as i64)
}

pub fn month_pillar(year_stem: Stem, month_branch: Branch) -> Result<Ganji> {
    let stem = month_stem_for(year_stem, month_branch);
    Ganji::new(stem, month_branch).ok_or_else(|| {
        ChartError::pillar(
            PillarStage::Month,
            format!("five-tiger rule produced unpaired {stem}{month_branch}"),
        )
    })
}

/// Day pillar of the UTC day containing `julian_day`.
///
/// Day count since 1984-02-02T00:00Z (甲子).
pub fn day_pillar_for_julian_day(julian_day: f64) -> Ganji {
    let offset = (julian_day + 0.5).floor() as i64 - (DAY_EPOCH_JD + 0.5).floor() as i64;
    Ganji::from_cycle(offset)
}

/// Day whose stem opens the hour cycle at a clock hour.
///
/// Under the traditional policy 00:00–00:59 still belongs to the 子 hour of
/// the night before, so the previous day's stem applies.
pub fn hour_day_basis(day: Ganji, hour: u32, boundary: HourBoundary) -> Ganji {
    match boundary {
        HourBoundary::Traditional if hour == 0 => day.offset(-1),
        _ => day,
    }
}

/// Two-hour slot of a clock hour: 23–00 → 子, 01–02 → 丑, …
pub fn hour_branch(hour: u32) -> Branch {
    Branch::from_index(i64::from((hour + 1) / 2))
}

/// Hour pillar from the (policy-adjusted) day stem and clock hour.
pub fn hour_pillar(day_stem: Stem, hour: u32) -> Result<Ganji> {
    if hour > 23 {
        return Err(ChartError::pillar(
            PillarStage::Hour,
            format!("hour {hour} is outside 0..=23"),
        ));
    }
    let branch = hour_branch(hour);
    let stem = Stem::from_index(((day_stem.index() % 5) * 2 + branch.index()) as i64);
    Ganji::new(stem, branch).ok_or_else(|| {
        ChartError::pillar(PillarStage::Hour, format!("unpaired {stem}{branch}"))
    })
}

/// Derive all four pillars for a normalized birth instant.
pub fn resolve_pillars(
    time: &NormalizedTime,
    accuracy: TimeAccuracy,
    boundary: HourBoundary,
    locator: &mut SolarTermLocator<'_>,
) -> Result<ResolvedPillars> {
    let jd = time.julian_day;

    let civil_year = time.local.year();
    let lichun = locator.lichun(civil_year)?;
    let solar_year = solar_year_of(civil_year, jd, lichun.julian_day);
    let sun_longitude = locator.longitude_at(jd)?;
    log_debug!(
        "sun at {sun_longitude:.4}°, 입춘 {civil_year} at {}, solar year {solar_year}",
        lichun.utc
    );
    let year = year_pillar(solar_year);

    let surrounding = locator.find_surrounding_solar_terms(jd)?;
    let governing_jie = locator.governing_jie(jd)?;
    let next_jie = locator.next_jie(jd)?;
    let month = month_pillar(year.stem(), governing_jie.month_branch)?;

    let day = day_pillar_for_julian_day(jd);
    let wall = time.reckoning_wall();
    let hour = if accuracy.has_hour() {
        let basis = hour_day_basis(day, wall.hour(), boundary);
        Some(hour_pillar(basis.stem(), wall.hour())?)
    } else {
        None
    };

    Ok(ResolvedPillars {
        pillars: FourPillars {
            year,
            month,
            day,
            hour,
        },
        context: SolarContext {
            sun_longitude,
            solar_year,
            lichun,
            surrounding,
            governing_jie,
            next_jie,
        },
        reckoning_wall: wall,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solar::MeeusEphemeris;
    use crate::time::normalize::normalize;
    use chrono::NaiveDate;

    fn wall(y: i32, m: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn jd(y: i32, m: u32, d: u32, h: u32, mi: u32) -> f64 {
        crate::time::julian::julian_day_from_naive(wall(y, m, d, h, mi))
    }

    #[test]
    fn test_day_epoch_is_gapja() {
        assert_eq!(day_pillar_for_julian_day(DAY_EPOCH_JD), Ganji::from_cycle(0));
        assert_eq!(day_pillar_for_julian_day(jd(1984, 2, 2, 0, 0)).hanja(), "甲子");
        assert_eq!(day_pillar_for_julian_day(jd(1984, 2, 2, 23, 59)).hanja(), "甲子");
        assert_eq!(day_pillar_for_julian_day(jd(1984, 2, 3, 0, 0)).hanja(), "乙丑");
        // Before the anchor the count runs backward
        assert_eq!(day_pillar_for_julian_day(jd(1984, 2, 1, 12, 0)).hanja(), "癸亥");
    }

    #[test]
    fn test_traditional_keeps_early_zi_hour_on_previous_day() {
        let day: Ganji = "乙丑".parse().unwrap();
        assert_eq!(hour_day_basis(day, 0, HourBoundary::Traditional).hanja(), "甲子");
        assert_eq!(hour_day_basis(day, 0, HourBoundary::Modern), day);
        for hour in 1..24 {
            assert_eq!(hour_day_basis(day, hour, HourBoundary::Traditional), day);
        }
    }

    #[test]
    fn test_day_pillar_follows_utc_not_local_date() {
        let engine = MeeusEphemeris::new();
        let mut locator = SolarTermLocator::new(&engine);

        // 05:00 KST on the anchor day is 20:00 UTC the day before
        let t = normalize("1984-02-02T05:00", "Asia/Seoul", None, TimeAccuracy::Exact).unwrap();
        for boundary in [HourBoundary::Traditional, HourBoundary::Modern] {
            let resolved =
                resolve_pillars(&t, TimeAccuracy::Exact, boundary, &mut locator).unwrap();
            assert_eq!(resolved.pillars.day.hanja(), "癸亥");
            assert_eq!(resolved.pillars.day, day_pillar_for_julian_day(t.julian_day));
            // 卯 hour of a 癸 day
            assert_eq!(resolved.pillars.hour.unwrap().hanja(), "乙卯");
        }
    }

    #[test]
    fn test_year_pillar_anchor() {
        assert_eq!(year_pillar(1984).hanja(), "甲子");
        assert_eq!(year_pillar(2023).hanja(), "癸卯");
        assert_eq!(year_pillar(2024).hanja(), "甲辰");
        assert_eq!(year_pillar(1983).hanja(), "癸亥");
        assert_eq!(year_pillar(1900).hanja(), "庚子");
    }

    #[test]
    fn test_solar_year_switches_at_lichun() {
        assert_eq!(solar_year_of(2024, 10.0, 10.0), 2024);
        assert_eq!(solar_year_of(2024, 9.999, 10.0), 2023);
    }

    #[test]
    fn test_five_tiger_rule() {
        // 甲 and 己 years open with 丙寅, 戊 and 癸 years with 甲寅
        assert_eq!(month_pillar(Stem::Gap, Branch::In).unwrap().hanja(), "丙寅");
        assert_eq!(month_pillar(Stem::Gi, Branch::In).unwrap().hanja(), "丙寅");
        assert_eq!(month_pillar(Stem::Gye, Branch::In).unwrap().hanja(), "甲寅");
        assert_eq!(month_pillar(Stem::Gye, Branch::Chuk).unwrap().hanja(), "乙丑");
        assert_eq!(month_pillar(Stem::Gap, Branch::Ja).unwrap().hanja(), "丙子");
        for stem in crate::cycle::ALL_STEMS {
            for branch in crate::cycle::ALL_BRANCHES {
                assert!(month_pillar(stem, branch).is_ok());
            }
        }
    }

    #[test]
    fn test_hour_slots() {
        assert_eq!(hour_branch(23), Branch::Ja);
        assert_eq!(hour_branch(0), Branch::Ja);
        assert_eq!(hour_branch(1), Branch::Chuk);
        assert_eq!(hour_branch(12), Branch::O);
        assert_eq!(hour_branch(16), Branch::Sin);
        // 甲 and 己 days start with 甲子
        assert_eq!(hour_pillar(Stem::Gap, 0).unwrap().hanja(), "甲子");
        assert_eq!(hour_pillar(Stem::Gi, 23).unwrap().hanja(), "甲子");
        assert_eq!(hour_pillar(Stem::Byeong, 15).unwrap().hanja(), "丙申");
        assert!(hour_pillar(Stem::Gap, 24).is_err());
    }

    #[test]
    fn test_resolve_around_lichun_2024() {
        let engine = MeeusEphemeris::new();
        let mut locator = SolarTermLocator::new(&engine);

        let before = normalize("2024-02-04T16:28", "Asia/Seoul", None, TimeAccuracy::Exact)
            .unwrap();
        let resolved =
            resolve_pillars(&before, TimeAccuracy::Exact, HourBoundary::Traditional, &mut locator)
                .unwrap();
        assert!(resolved.context.sun_longitude < 315.0);
        assert_eq!(resolved.context.solar_year, 2023);
        assert_eq!(resolved.pillars.year.hanja(), "癸卯");
        assert_eq!(resolved.pillars.month.hanja(), "乙丑");
        assert_eq!(resolved.context.governing_jie.name, "소한");
        assert_eq!(resolved.context.next_jie.name, "입춘");

        let after = normalize("2024-02-04T17:45", "Asia/Seoul", None, TimeAccuracy::Exact)
            .unwrap();
        let resolved =
            resolve_pillars(&after, TimeAccuracy::Exact, HourBoundary::Traditional, &mut locator)
                .unwrap();
        assert!(resolved.context.sun_longitude >= 315.0);
        assert_eq!(resolved.pillars.year.hanja(), "甲辰");
        assert_eq!(resolved.pillars.month.hanja(), "丙寅");
        assert_eq!(resolved.pillars.hour.unwrap().branch(), Branch::Yu);
    }

    #[test]
    fn test_unknown_time_has_no_hour() {
        let engine = MeeusEphemeris::new();
        let mut locator = SolarTermLocator::new(&engine);
        let t = normalize("1990-07-15", "Asia/Seoul", None, TimeAccuracy::Unknown).unwrap();
        let resolved =
            resolve_pillars(&t, TimeAccuracy::Unknown, HourBoundary::Traditional, &mut locator)
                .unwrap();
        assert!(resolved.pillars.hour.is_none());
        assert_eq!(resolved.pillars.year.hanja(), "庚午");
        assert_eq!(resolved.pillars.month.branch(), Branch::Mi);
    }
}
