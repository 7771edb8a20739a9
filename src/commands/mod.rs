//! Command-line command handlers for saju.
//!
//! Each command lives in its own submodule. The helpers here turn parsed
//! arguments plus the loaded configuration into library inputs.

pub mod chart;
pub mod luck;
pub mod terms;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::args::BirthArgs;
use crate::chart::{BirthInput, ChartOptions, ChartResult, EngineChoice};
use crate::config::Config;
use crate::time::TimeAccuracy;

/// Merge command-line overrides onto the configured options.
pub(crate) fn resolve_options(
    config: &Config,
    birth: Option<&BirthArgs>,
    engine: Option<EngineChoice>,
) -> ChartOptions {
    let mut options = ChartOptions::from(config);
    if let Some(birth) = birth {
        if let Some(policy) = birth.policy {
            options.hour_boundary = policy;
        }
        if let Some(true_solar) = birth.true_solar {
            options.true_solar_time = true_solar;
        }
    }
    if let Some(engine) = engine {
        options.engine = engine;
    }
    options
}

/// Build the library input from the `--date`/`--time`/`--tz` family of flags.
///
/// Without an explicit `--accuracy`, a date with no clock time is treated as
/// an unknown birth time.
pub(crate) fn birth_input(birth: &BirthArgs) -> Result<BirthInput> {
    let date = birth
        .date
        .as_deref()
        .context("A birth date is required (--date)")?;

    let local = match birth.time.as_deref() {
        Some(time) => format!("{}T{}", date.trim(), time.trim()),
        None => date.trim().to_string(),
    };
    let has_clock = local.contains('T') || local.contains(' ');
    let accuracy = birth.accuracy.unwrap_or(if has_clock {
        TimeAccuracy::Exact
    } else {
        TimeAccuracy::Unknown
    });

    let mut input = BirthInput::new(local, birth.timezone.as_deref().unwrap_or("auto"))
        .with_accuracy(accuracy)
        .with_gender(birth.gender.unwrap_or_default());
    input.latitude = birth.latitude;
    input.longitude = birth.longitude;
    Ok(input)
}

/// Compute the chart for parsed birth flags, with context on failure.
pub(crate) fn compute(birth: &BirthArgs, options: &ChartOptions) -> Result<ChartResult> {
    let input = birth_input(birth)?;
    crate::chart::compute_chart(&input, options)
        .with_context(|| format!("Failed to compute chart for {} ({})", input.local, input.timezone))
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output as JSON")?
    );
    Ok(())
}

/// Log the engine line, and the fallback warning when one happened.
pub(crate) fn log_engine(chart: &ChartResult) {
    let meta = &chart.metadata;
    log_block_start!("Engine: {}", meta.engine_name);
    if meta.used_fallback_engine {
        log_warning!(
            "Computed with the fallback engine: {}",
            meta.fallback_reason.as_deref().unwrap_or("primary engine unavailable")
        );
    }
    if let Some(reason) = &meta.eot_fallback_reason {
        log_warning!("Closed-form equation of time used: {reason}");
    }
}
