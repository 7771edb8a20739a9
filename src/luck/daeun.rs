//! Decade luck (대운): direction, start age and the pillar sequence.

use serde::{Deserialize, Serialize};

use crate::analysis::{Sipsung, TwelveStage};
use crate::constants::{DAEUN_SPAN_YEARS, MAXIMUM_DAEUN_START_AGE, MINIMUM_DAEUN_START_AGE};
use crate::cycle::{Ganji, Stem};
use crate::pillar::resolver::SolarContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "male" | "m" | "남" => Ok(Gender::Male),
            "female" | "f" | "여" => Ok(Gender::Female),
            other => Err(format!("unknown gender '{other}' (expected male or female)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Yang-year men and yin-year women run forward; the other pairings
    /// run backward.
    pub fn for_birth(year_stem: Stem, gender: Gender) -> Direction {
        if year_stem.polarity().is_yang() == (gender == Gender::Male) {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    fn step(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// When the first decade begins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StartAge {
    /// Whole years, clamped to 1..=10.
    pub years: u32,
    /// Unrounded value before clamping.
    pub precise: f64,
    /// Days between birth and the jie term in the direction of travel.
    pub interval_days: f64,
}

impl StartAge {
    pub fn from_interval(interval_days: f64, days_per_year: f64) -> StartAge {
        let precise = interval_days / days_per_year;
        let years = (precise.round().max(0.0) as u32)
            .clamp(MINIMUM_DAEUN_START_AGE, MAXIMUM_DAEUN_START_AGE);
        StartAge {
            years,
            precise,
            interval_days,
        }
    }
}

/// Days from birth to the next jie (forward) or since the governing jie
/// (backward).
pub fn interval_to_boundary(birth_jd: f64, context: &SolarContext, direction: Direction) -> f64 {
    match direction {
        Direction::Forward => context.next_jie.julian_day - birth_jd,
        Direction::Backward => birth_jd - context.governing_jie.julian_day,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Daeun {
    /// 1-based position in the sequence.
    pub ordinal: u32,
    pub start_age: u32,
    /// Inclusive.
    pub end_age: u32,
    pub ganji: Ganji,
    pub stem_sipsung: Sipsung,
    pub branch_sipsung: Sipsung,
    /// The day master's phase at this decade's branch.
    pub twelve_stage: TwelveStage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaeunCycle {
    pub direction: Direction,
    pub start_age: StartAge,
    pub entries: Vec<Daeun>,
}

impl DaeunCycle {
    /// Walk the 60-cycle from the month pillar, one step per decade.
    pub fn project(
        month: Ganji,
        day_master: Stem,
        direction: Direction,
        start_age: StartAge,
        count: usize,
    ) -> DaeunCycle {
        let entries = (1..=count as u32)
            .map(|k| {
                let ganji = month.offset(direction.step() * i64::from(k));
                let start = start_age.years + DAEUN_SPAN_YEARS * (k - 1);
                Daeun {
                    ordinal: k,
                    start_age: start,
                    end_age: start + DAEUN_SPAN_YEARS - 1,
                    ganji,
                    stem_sipsung: Sipsung::of_stem(day_master, ganji.stem()),
                    branch_sipsung: Sipsung::of_branch(day_master, ganji.branch()),
                    twelve_stage: TwelveStage::of(day_master, ganji.branch()),
                }
            })
            .collect();

        DaeunCycle {
            direction,
            start_age,
            entries,
        }
    }

    /// The decade covering `age`, if any.
    pub fn active_at(&self, age: u32) -> Option<&Daeun> {
        self.entries
            .iter()
            .find(|d| (d.start_age..=d.end_age).contains(&age))
    }
}
