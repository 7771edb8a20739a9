//! Terms command implementation.
//!
//! Lists the 24 solar terms of a civil year, in UTC or a requested zone.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::chart::{EngineChoice, SolarTermsReport, compute_solar_terms};
use crate::config::Config;
use crate::solar::SolarTermInfo;
use crate::time::zone::{Zone, resolve_zone};

#[derive(Serialize)]
struct TermsOutput<'a> {
    #[serde(flatten)]
    report: &'a SolarTermsReport,
    timezone: String,
    local_times: Vec<String>,
}

/// Handle the terms command.
pub fn handle_terms_command(
    year: i32,
    timezone: Option<&str>,
    engine: Option<EngineChoice>,
    config: &Config,
    json: bool,
) -> Result<()> {
    let options = super::resolve_options(config, None, engine);
    let zone = timezone
        .map(|id| resolve_zone(id, None))
        .transpose()
        .context("Failed to resolve --tz")?;

    let report = compute_solar_terms(year, &options)
        .with_context(|| format!("Failed to locate the solar terms of {year}"))?;

    let label = zone.as_ref().map_or_else(|| "UTC".to_string(), Zone::label);
    let local_times: Vec<String> = report
        .terms
        .iter()
        .map(|term| format_in_zone(term.utc, zone.as_ref()))
        .collect();

    if json {
        return super::print_json(&TermsOutput {
            report: &report,
            timezone: label,
            local_times,
        });
    }

    log_version!();
    log_block_start!("Solar terms of {year} ({label})");
    for (term, local) in report.terms.iter().zip(&local_times) {
        log_indented!("{}", describe(term, local));
    }
    log_block_start!("Engine: {}", report.engine_name);
    if report.used_fallback_engine {
        log_warning!("Computed with the fallback engine");
    }
    log_end!();
    Ok(())
}

fn describe(term: &SolarTermInfo, local: &str) -> String {
    let month = if term.is_jie {
        format!("{}월 시작", term.month_branch.hanja())
    } else {
        String::new()
    };
    format!(
        "{:>2} {} {} {:>3}°  {}  {}",
        term.index, term.name, term.hanja, term.longitude, local, month
    )
}

fn format_in_zone(utc: DateTime<Utc>, zone: Option<&Zone>) -> String {
    const FORMAT: &str = "%Y-%m-%d %H:%M";
    match zone {
        None => utc.format(FORMAT).to_string(),
        Some(Zone::Named(tz)) => utc.with_timezone(tz).format(FORMAT).to_string(),
        Some(Zone::Fixed(offset)) => utc.with_timezone(offset).format(FORMAT).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_in_zone() {
        let utc = Utc.with_ymd_and_hms(2024, 2, 4, 8, 27, 0).unwrap();
        assert_eq!(format_in_zone(utc, None), "2024-02-04 08:27");

        let seoul = resolve_zone("Asia/Seoul", None).unwrap();
        assert_eq!(format_in_zone(utc, Some(&seoul)), "2024-02-04 17:27");

        let fixed = resolve_zone("-05:00", None).unwrap();
        assert_eq!(format_in_zone(utc, Some(&fixed)), "2024-02-04 03:27");
    }
}
