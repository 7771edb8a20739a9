//! Chart command implementation.
//!
//! Prints the four pillars with their readings, the decade luck and the
//! sinsal, either as a log block or as JSON.

use anyhow::Result;
use chrono::Datelike;

use crate::args::BirthArgs;
use crate::chart::ChartResult;
use crate::config::Config;
use crate::pillar::ALL_PILLAR_KINDS;
use crate::time::zone::format_offset;

/// Handle the chart command.
pub fn handle_chart_command(birth: &BirthArgs, config: &Config, json: bool) -> Result<()> {
    let options = super::resolve_options(config, Some(birth), birth.engine);
    let chart = super::compute(birth, &options)?;

    if json {
        return super::print_json(&chart);
    }

    log_version!();
    display_chart(&chart);
    log_end!();
    Ok(())
}

/// Render a computed chart through the logger.
pub fn display_chart(chart: &ChartResult) {
    display_birth(chart);
    display_pillars(chart);
    display_elements(chart);
    display_daeun(chart);
    display_sinsal(chart);
    super::log_engine(chart);
}

fn display_birth(chart: &ChartResult) {
    let time = &chart.time;
    log_block_start!(
        "Birth: {} {} ({})",
        time.local.format("%Y-%m-%d %H:%M"),
        time.timezone,
        format_offset(time.utc_offset_seconds)
    );
    if !chart.metadata.time_accuracy.has_hour() {
        log_indented!("Birth time unknown, no hour pillar");
    }
    if let Some(solar) = &time.solar {
        log_indented!(
            "True solar time: {} ({:+.1} min)",
            solar.wall.format("%Y-%m-%d %H:%M"),
            solar.total_minutes
        );
    }
    log_indented!(
        "Solar year {} from 입춘 {}",
        chart.solar.solar_year,
        chart.solar.lichun.utc.format("%Y-%m-%d %H:%M UTC")
    );
    log_indented!(
        "Month term: {} ({}), next {} on {}",
        chart.solar.governing_jie.name,
        chart.solar.governing_jie.hanja,
        chart.solar.next_jie.name,
        chart.solar.next_jie.utc.format("%Y-%m-%d")
    );
}

fn display_pillars(chart: &ChartResult) {
    log_block_start!("Four pillars ({})", chart.metadata.hour_boundary);

    // Traditional right-to-left order: hour, day, month, year
    for kind in ALL_PILLAR_KINDS.iter().rev() {
        let Some(ganji) = chart.pillars.get(*kind) else {
            log_indented!("{}  ──", kind.korean());
            continue;
        };

        let relation = chart
            .analysis
            .relations
            .iter()
            .find(|r| r.pillar == *kind);
        let stage = chart
            .analysis
            .twelve_stages
            .iter()
            .find(|s| s.pillar == *kind);

        log_indented!("{}  {} ({})", kind.korean(), ganji.hanja(), ganji.korean());
        if let Some(relation) = relation {
            let hidden: Vec<String> = relation
                .hidden
                .iter()
                .map(|h| format!("{} {}", h.stem.hanja(), h.sipsung.korean()))
                .collect();
            log_indented!(
                "      천간 {} · 지지 {} · 지장간 {}",
                relation.stem,
                relation.branch,
                hidden.join(", ")
            );
        }
        if let Some(stage) = stage {
            log_indented!(
                "      운성 {} · 자좌 {}",
                stage.day_master,
                stage.seated
            );
        }
    }
}

fn display_elements(chart: &ChartResult) {
    let ohhaeng = &chart.analysis.ohhaeng;
    log_block_start!("Five elements");
    for share in &ohhaeng.shares {
        log_indented!(
            "{} {:>5.1}%  {}",
            share.element,
            share.percent,
            "█".repeat((share.percent / 5.0).round() as usize)
        );
    }
    if !ohhaeng.missing.is_empty() {
        let missing: Vec<String> = ohhaeng.missing.iter().map(|e| e.to_string()).collect();
        log_indented!("Missing: {}", missing.join(", "));
    }

    let strength = &chart.analysis.strength;
    log_block_start!(
        "Day master {} is {} ({:.1}%)",
        chart.pillars.day_master(),
        strength.class,
        strength.score
    );
    log_indented!("용신 {} · 희신 {}", strength.yongsin, strength.huisin);
    log_indented!("{}", strength.rationale);
}

fn display_daeun(chart: &ChartResult) {
    let daeun = &chart.daeun;
    log_block_start!(
        "Daeun ({:?}, starts at {} from {:.1} days)",
        daeun.direction,
        daeun.start_age.years,
        daeun.start_age.interval_days
    );
    let age_now = chrono::Utc::now().year() - chart.birth_year() + 1;
    for entry in &daeun.entries {
        let marker = if (entry.start_age as i32..=entry.end_age as i32).contains(&age_now) {
            "▸"
        } else {
            " "
        };
        log_indented!(
            "{marker} {:>2}-{:<3} {} {} / {} · {}",
            entry.start_age,
            entry.end_age,
            entry.ganji.hanja(),
            entry.stem_sipsung.korean(),
            entry.branch_sipsung.korean(),
            entry.twelve_stage.korean()
        );
    }
}

fn display_sinsal(chart: &ChartResult) {
    if chart.sinsal.is_empty() {
        return;
    }
    log_block_start!("Sinsal");
    for kind in ALL_PILLAR_KINDS {
        let names: Vec<&str> = chart
            .sinsal
            .iter()
            .filter(|s| s.pillar == kind)
            .map(|s| s.name)
            .collect();
        if !names.is_empty() {
            log_indented!("{}  {}", kind.korean(), names.join(", "));
        }
    }
}
