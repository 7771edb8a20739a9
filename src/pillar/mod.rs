//! The four pillars of a chart and how they are derived.

pub mod resolver;

use serde::{Deserialize, Serialize};

use crate::cycle::{Ganji, Stem};

pub use resolver::{
    ResolvedPillars, SolarContext, day_pillar_for_julian_day, hour_branch, hour_day_basis,
    hour_pillar, month_pillar, month_stem_for, resolve_pillars, solar_year_of, year_pillar,
};

/// Which of the four positions a pillar occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PillarKind {
    Year,
    Month,
    Day,
    Hour,
}

pub const ALL_PILLAR_KINDS: [PillarKind; 4] = [
    PillarKind::Year,
    PillarKind::Month,
    PillarKind::Day,
    PillarKind::Hour,
];

impl PillarKind {
    pub fn korean(self) -> &'static str {
        match self {
            PillarKind::Year => "년주",
            PillarKind::Month => "월주",
            PillarKind::Day => "일주",
            PillarKind::Hour => "시주",
        }
    }
}

impl std::fmt::Display for PillarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PillarKind::Year => "year",
            PillarKind::Month => "month",
            PillarKind::Day => "day",
            PillarKind::Hour => "hour",
        };
        f.write_str(name)
    }
}

/// One position of the chart; `ganji` is `None` only for an unknown hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pillar {
    pub kind: PillarKind,
    pub ganji: Option<Ganji>,
}

/// Year, month and day are always known; the hour is absent when the birth
/// time is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FourPillars {
    pub year: Ganji,
    pub month: Ganji,
    pub day: Ganji,
    pub hour: Option<Ganji>,
}

impl FourPillars {
    /// The day stem, reference point of every relational reading.
    pub fn day_master(&self) -> Stem {
        self.day.stem()
    }

    pub fn get(&self, kind: PillarKind) -> Option<Ganji> {
        match kind {
            PillarKind::Year => Some(self.year),
            PillarKind::Month => Some(self.month),
            PillarKind::Day => Some(self.day),
            PillarKind::Hour => self.hour,
        }
    }

    pub fn pillar(&self, kind: PillarKind) -> Pillar {
        Pillar {
            kind,
            ganji: self.get(kind),
        }
    }

    /// Present pillars in year, month, day, hour order.
    pub fn present(&self) -> impl Iterator<Item = (PillarKind, Ganji)> + '_ {
        ALL_PILLAR_KINDS
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|g| (kind, g)))
    }
}

/// How the 子 hour (23:00–01:00) is split between days.
///
/// The day pillar itself always counts UTC days; the policy only picks the
/// day stem that opens the hour cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HourBoundary {
    /// The whole 子 window belongs to the night before: 00:00–00:59 takes
    /// its hour stem from the previous day.
    #[default]
    Traditional,
    /// The 子 window splits at midnight.
    Modern,
}

impl std::str::FromStr for HourBoundary {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "traditional" => Ok(HourBoundary::Traditional),
            "modern" => Ok(HourBoundary::Modern),
            other => Err(format!(
                "unknown hour boundary '{other}' (expected traditional or modern)"
            )),
        }
    }
}

impl std::fmt::Display for HourBoundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            HourBoundary::Traditional => "traditional",
            HourBoundary::Modern => "modern",
        })
    }
}
