//! Luck command implementation.
//!
//! Annual luck for a run of years and the twelve monthly pillars of the
//! first year, read against the chart's day master.

use anyhow::Result;
use chrono::Datelike;
use serde::Serialize;

use crate::args::BirthArgs;
use crate::config::Config;
use crate::luck::{AnnualLuck, Daeun, MonthlyLuck};

const DEFAULT_YEAR_COUNT: usize = 10;

#[derive(Serialize)]
struct LuckOutput<'a> {
    day_master: String,
    active_daeun: Option<&'a Daeun>,
    annual: Vec<AnnualLuck>,
    monthly: Vec<MonthlyLuck>,
}

/// Handle the luck command.
pub fn handle_luck_command(
    birth: &BirthArgs,
    from_year: Option<i32>,
    count: Option<usize>,
    config: &Config,
    json: bool,
) -> Result<()> {
    let options = super::resolve_options(config, Some(birth), birth.engine);
    let chart = super::compute(birth, &options)?;

    let from_year = from_year.unwrap_or_else(|| chrono::Local::now().year());
    let count = count.unwrap_or(DEFAULT_YEAR_COUNT);
    let annual = chart.annual_luck(from_year, count);
    let monthly = chart.monthly_luck(from_year)?;

    let age = from_year - chart.birth_year() + 1;
    let active_daeun = u32::try_from(age)
        .ok()
        .and_then(|age| chart.daeun.active_at(age));

    if json {
        return super::print_json(&LuckOutput {
            day_master: chart.pillars.day_master().to_string(),
            active_daeun,
            annual,
            monthly,
        });
    }

    log_version!();
    log_block_start!(
        "Day master {} · {} {} {} {}",
        chart.pillars.day_master(),
        chart.pillars.year.hanja(),
        chart.pillars.month.hanja(),
        chart.pillars.day.hanja(),
        chart.pillars.hour.map_or_else(|| "──".to_string(), |h| h.hanja())
    );
    if let Some(daeun) = active_daeun {
        log_indented!(
            "Daeun in {from_year}: {} (ages {}-{})",
            daeun.ganji.hanja(),
            daeun.start_age,
            daeun.end_age
        );
    }

    log_block_start!("Annual luck (세운)");
    for year in &annual {
        log_indented!(
            "{} ({:>3}세)  {} {} / {} · {}",
            year.year,
            year.korean_age,
            year.reading.ganji.hanja(),
            year.reading.stem_sipsung.korean(),
            year.reading.branch_sipsung.korean(),
            year.reading.twelve_stage.korean()
        );
    }

    log_block_start!("Monthly luck (월운) of solar year {from_year}");
    for month in &monthly {
        log_indented!(
            "{:>2}월  {} {} / {} · {}",
            month.month_number,
            month.reading.ganji.hanja(),
            month.reading.stem_sipsung.korean(),
            month.reading.branch_sipsung.korean(),
            month.reading.twelve_stage.korean()
        );
    }

    super::log_engine(&chart);
    log_end!();
    Ok(())
}
