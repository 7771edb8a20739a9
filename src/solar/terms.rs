//! The 24 solar terms (절기 / 중기) of a year.
//!
//! Term `i` is the instant the sun's apparent longitude reaches
//! `(285 + 15·i) mod 360`, so index 0 is 소한 and index 2 is 입춘. Even
//! indices are the jie terms that open a month; odd indices are the qi
//! terms in the middle of it.
//!
//! Each term is solved with Newton-Raphson against the provider, using the
//! sun's angular speed as the derivative. A [`SolarTermLocator`] caches
//! whole years so that bracketing an instant costs at most three solves of
//! 24 terms.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

use super::provider::{SolarPositionProvider, normalize_180, normalize_360};
use crate::constants::{
    FIRST_TERM_LONGITUDE, SPEED_PROBE_DAYS, TERM_ACCEPT_DEG, TERM_LONGITUDE_STEP,
    TERM_MAX_ITERATIONS, TERM_MAX_STEP_DAYS, TERM_TOLERANCE_DEG, TROPICAL_YEAR_DAYS,
};
use crate::cycle::Branch;
use crate::error::{ChartError, PillarStage, Result};
use crate::time::julian::{julian_day_from_naive, utc_from_julian_day};

pub const TERM_COUNT: usize = 24;

/// Index of 입춘 (start of spring, 315°).
pub const LICHUN_INDEX: usize = 2;

/// Korean and hanja names, index 0 = 소한.
const TERM_NAMES: [(&str, &str); TERM_COUNT] = [
    ("소한", "小寒"),
    ("대한", "大寒"),
    ("입춘", "立春"),
    ("우수", "雨水"),
    ("경칩", "驚蟄"),
    ("춘분", "春分"),
    ("청명", "淸明"),
    ("곡우", "穀雨"),
    ("입하", "立夏"),
    ("소만", "小滿"),
    ("망종", "芒種"),
    ("하지", "夏至"),
    ("소서", "小暑"),
    ("대서", "大暑"),
    ("입추", "立秋"),
    ("처서", "處暑"),
    ("백로", "白露"),
    ("추분", "秋分"),
    ("한로", "寒露"),
    ("상강", "霜降"),
    ("입동", "立冬"),
    ("소설", "小雪"),
    ("대설", "大雪"),
    ("동지", "冬至"),
];

/// Target longitude of term `index`, degrees.
pub fn term_longitude(index: usize) -> f64 {
    normalize_360(FIRST_TERM_LONGITUDE + TERM_LONGITUDE_STEP * index as f64)
}

/// Month branch governed by term `index`.
///
/// A jie term opens the month of this branch; a qi term sits inside the
/// month opened by the jie before it, so both map to the same branch.
pub fn month_branch_of(index: usize) -> Branch {
    Branch::from_index((index / 2 + 1) as i64)
}

/// One solved solar term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolarTermInfo {
    pub index: usize,
    pub name: &'static str,
    pub hanja: &'static str,
    pub longitude: f64,
    pub julian_day: f64,
    pub utc: DateTime<Utc>,
    pub is_jie: bool,
    pub month_branch: Branch,
}

impl SolarTermInfo {
    fn new(index: usize, julian_day: f64) -> Result<Self> {
        let utc = utc_from_julian_day(julian_day).ok_or_else(|| {
            ChartError::pillar(
                PillarStage::SolarTerm,
                format!("julian day {julian_day} is not representable"),
            )
        })?;
        let (name, hanja) = TERM_NAMES[index];
        Ok(Self {
            index,
            name,
            hanja,
            longitude: term_longitude(index),
            julian_day,
            utc,
            is_jie: index % 2 == 0,
            month_branch: month_branch_of(index),
        })
    }
}

/// The terms on either side of an instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurroundingTerms {
    pub preceding: SolarTermInfo,
    pub following: SolarTermInfo,
}

/// Newton-Raphson term solver with a per-instance year cache.
pub struct SolarTermLocator<'a> {
    provider: &'a dyn SolarPositionProvider,
    cache: HashMap<i32, Vec<SolarTermInfo>>,
}

impl<'a> SolarTermLocator<'a> {
    pub fn new(provider: &'a dyn SolarPositionProvider) -> Self {
        Self {
            provider,
            cache: HashMap::new(),
        }
    }

    /// Sun longitude at `jd` from the underlying provider.
    pub fn longitude_at(&self, jd: f64) -> Result<f64> {
        Ok(self.provider.longitude_at(jd)?)
    }

    /// Degrees per day at `jd`, from a central difference.
    fn angular_speed(&self, jd: f64) -> Result<f64> {
        let ahead = self.provider.longitude_at(jd + SPEED_PROBE_DAYS)?;
        let behind = self.provider.longitude_at(jd - SPEED_PROBE_DAYS)?;
        let speed = normalize_180(ahead - behind) / (2.0 * SPEED_PROBE_DAYS);
        if !speed.is_finite() || speed <= 0.0 {
            return Err(ChartError::pillar(
                PillarStage::SolarTerm,
                format!("provider reports non-positive solar motion ({speed} °/day)"),
            ));
        }
        Ok(speed)
    }

    /// Julian Day at which the sun reaches `target`, starting from `estimate`.
    fn solve(&self, target: f64, estimate: f64) -> Result<f64> {
        let mut jd = estimate;
        let mut residual = f64::INFINITY;

        for iteration in 0..TERM_MAX_ITERATIONS {
            let lambda = self.provider.longitude_at(jd)?;
            residual = normalize_180(target - lambda);
            if residual.abs() < TERM_TOLERANCE_DEG {
                log_debug!("term {target:>5.1}° solved at JD {jd:.6} after {iteration} steps");
                return Ok(jd);
            }
            let step = residual / self.angular_speed(jd)?;
            jd += step.clamp(-TERM_MAX_STEP_DAYS, TERM_MAX_STEP_DAYS);
        }

        if residual.abs() <= TERM_ACCEPT_DEG {
            log_debug!("term {target:>5.1}° accepted at cap with residual {residual:.2e}°");
            Ok(jd)
        } else {
            Err(ChartError::pillar(
                PillarStage::SolarTerm,
                format!("no convergence for {target}° (residual {residual:.4}°)"),
            ))
        }
    }

    /// Solve term `index` of calendar `year`.
    pub fn locate_term(&self, index: usize, year: i32) -> Result<SolarTermInfo> {
        if index >= TERM_COUNT {
            return Err(ChartError::pillar(
                PillarStage::SolarTerm,
                format!("term index {index} out of range"),
            ));
        }

        let target = term_longitude(index);
        let estimate = year_anchor(year)? + index as f64 * TROPICAL_YEAR_DAYS / TERM_COUNT as f64;
        let mut jd = self.solve(target, estimate)?;

        // 소한 and 대한 sit right after New Year; make sure the solve did not
        // slip into December of the neighbouring year.
        if index < LICHUN_INDEX {
            let landed = utc_year(jd)?;
            if landed != year {
                let shift = f64::from(year - landed) * TROPICAL_YEAR_DAYS;
                log_debug!("term {index} landed in {landed}, re-solving for {year}");
                jd = self.solve(target, estimate + shift)?;
            }
        }

        SolarTermInfo::new(index, jd)
    }

    /// All 24 terms of `year`, in index (and chronological) order.
    pub fn terms_for_year(&mut self, year: i32) -> Result<&[SolarTermInfo]> {
        if !self.cache.contains_key(&year) {
            let terms = (0..TERM_COUNT)
                .map(|index| self.locate_term(index, year))
                .collect::<Result<Vec<_>>>()?;
            self.cache.insert(year, terms);
        }
        Ok(self.cache.get(&year).map(Vec::as_slice).unwrap_or_default())
    }

    /// Terms of the years around `jd`, sorted by instant.
    fn terms_around(&mut self, jd: f64) -> Result<Vec<SolarTermInfo>> {
        let year = utc_year(jd)?;
        let mut all = Vec::with_capacity(TERM_COUNT * 3);
        for y in year - 1..=year + 1 {
            all.extend_from_slice(self.terms_for_year(y)?);
        }
        all.sort_by(|a, b| a.julian_day.total_cmp(&b.julian_day));
        Ok(all)
    }

    /// The terms bracketing `jd`: `preceding.julian_day <= jd < following.julian_day`.
    pub fn find_surrounding_solar_terms(&mut self, jd: f64) -> Result<SurroundingTerms> {
        let all = self.terms_around(jd)?;
        let split = all.partition_point(|t| t.julian_day <= jd);
        match (split.checked_sub(1).and_then(|i| all.get(i)), all.get(split)) {
            (Some(preceding), Some(following)) => Ok(SurroundingTerms {
                preceding: preceding.clone(),
                following: following.clone(),
            }),
            _ => Err(ChartError::pillar(
                PillarStage::SolarTerm,
                format!("no solar terms bracket julian day {jd}"),
            )),
        }
    }

    /// The jie term in force at `jd`: the latest jie at or before it.
    ///
    /// When the nearest preceding term is a qi term this rolls back one more
    /// term to the jie that opened the month.
    pub fn governing_jie(&mut self, jd: f64) -> Result<SolarTermInfo> {
        let all = self.terms_around(jd)?;
        all.into_iter()
            .rev()
            .find(|t| t.is_jie && t.julian_day <= jd)
            .ok_or_else(|| {
                ChartError::pillar(PillarStage::Month, format!("no jie term before {jd}"))
            })
    }

    /// The first jie term strictly after `jd`.
    pub fn next_jie(&mut self, jd: f64) -> Result<SolarTermInfo> {
        let all = self.terms_around(jd)?;
        all.into_iter()
            .find(|t| t.is_jie && t.julian_day > jd)
            .ok_or_else(|| {
                ChartError::pillar(PillarStage::Month, format!("no jie term after {jd}"))
            })
    }

    /// 입춘 of `year`.
    pub fn lichun(&mut self, year: i32) -> Result<SolarTermInfo> {
        self.terms_for_year(year)?
            .get(LICHUN_INDEX)
            .cloned()
            .ok_or_else(|| ChartError::pillar(PillarStage::Year, format!("no 입춘 for {year}")))
    }
}

/// Solve the 24 terms of `year` against `provider`.
pub fn locate_solar_terms(
    year: i32,
    provider: &dyn SolarPositionProvider,
) -> Result<[SolarTermInfo; TERM_COUNT]> {
    let mut locator = SolarTermLocator::new(provider);
    let terms = locator.terms_for_year(year)?.to_vec();
    terms.try_into().map_err(|v: Vec<SolarTermInfo>| {
        ChartError::pillar(
            PillarStage::SolarTerm,
            format!("expected {TERM_COUNT} terms, solved {}", v.len()),
        )
    })
}

/// Julian Day of 6 January 00:00 UTC, near where 소한 falls.
fn year_anchor(year: i32) -> Result<f64> {
    NaiveDate::from_ymd_opt(year, 1, 6)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(julian_day_from_naive)
        .ok_or_else(|| {
            ChartError::pillar(PillarStage::SolarTerm, format!("year {year} out of range"))
        })
}

fn utc_year(jd: f64) -> Result<i32> {
    utc_from_julian_day(jd).map(|t| t.year()).ok_or_else(|| {
        ChartError::pillar(
            PillarStage::SolarTerm,
            format!("julian day {jd} is not representable"),
        )
    })
}
