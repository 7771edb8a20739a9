//! Annual (연운) and monthly (월운) luck pillars.
//!
//! These depend only on the calendar position, not on the birth event; the
//! chart contributes the day master they are read against.

use serde::Serialize;

use crate::analysis::{Sipsung, TwelveStage};
use crate::cycle::{Branch, Ganji, Stem};
use crate::error::{ChartError, Result};
use crate::pillar::resolver::{month_pillar, year_pillar};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LuckReading {
    pub ganji: Ganji,
    pub stem_sipsung: Sipsung,
    pub branch_sipsung: Sipsung,
    pub twelve_stage: TwelveStage,
}

impl LuckReading {
    pub fn new(ganji: Ganji, day_master: Stem) -> Self {
        Self {
            ganji,
            stem_sipsung: Sipsung::of_stem(day_master, ganji.stem()),
            branch_sipsung: Sipsung::of_branch(day_master, ganji.branch()),
            twelve_stage: TwelveStage::of(day_master, ganji.branch()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnnualLuck {
    pub year: i32,
    /// Counted age (세는 나이): 1 in the birth year.
    pub korean_age: i32,
    #[serde(flatten)]
    pub reading: LuckReading,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyLuck {
    pub solar_year: i32,
    /// 1 = 寅 month (from 입춘) … 12 = 丑 month.
    pub month_number: u32,
    #[serde(flatten)]
    pub reading: LuckReading,
}

/// Pillar of a solar year.
pub fn annual_pillar(year: i32) -> Ganji {
    year_pillar(year)
}

/// Pillar of month `month_number` (1 = 寅) in a solar year.
pub fn monthly_pillar(solar_year: i32, month_number: u32) -> Result<Ganji> {
    if !(1..=12).contains(&month_number) {
        return Err(ChartError::invalid_input(format!(
            "month number {month_number} is outside 1..=12"
        )));
    }
    let branch = Branch::from_index(i64::from(month_number) + 1);
    month_pillar(year_pillar(solar_year).stem(), branch)
}

pub fn annual_luck(day_master: Stem, birth_year: i32, from_year: i32, count: usize) -> Vec<AnnualLuck> {
    (from_year..)
        .take(count)
        .map(|year| AnnualLuck {
            year,
            korean_age: year - birth_year + 1,
            reading: LuckReading::new(annual_pillar(year), day_master),
        })
        .collect()
}

pub fn monthly_luck(day_master: Stem, solar_year: i32) -> Result<Vec<MonthlyLuck>> {
    (1..=12)
        .map(|month_number| {
            Ok(MonthlyLuck {
                solar_year,
                month_number,
                reading: LuckReading::new(monthly_pillar(solar_year, month_number)?, day_master),
            })
        })
        .collect()
}
