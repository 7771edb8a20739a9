//! Configuration system for saju.
//!
//! Settings live in `saju.toml`, searched in:
//! 1. The directory given with `--config DIR`
//! 2. **XDG_CONFIG_HOME**/saju/saju.toml
//!
//! A missing file is not an error; every field falls back to its default.
//!
//! ```toml
//! #[Pillars]
//! hour_boundary = "traditional"  # "traditional" (day turns at 子時 start) or "modern" (midnight)
//! true_solar_time = true         # Shift the clock by longitude and equation of time
//!
//! #[Ephemeris]
//! engine = "meeus"               # "meeus" or "approximate"
//! ephemeris_timeout_ms = 2000    # Per-call budget before falling back (10-60000)
//!
//! #[Strength]
//! sinyak_below = 40.0            # Support share (%) under which the day master is weak
//! singang_above = 60.0           # Support share (%) over which the day master is strong
//! seasonal_multiplier = 2.0      # Extra weight for the month branch (1-5)
//! visible_weight = 10.0          # Weight of every visible stem and branch
//! hidden_weights = [6.0, 3.0, 1.0] # Principal, middle, residual hidden stems
//!
//! #[Luck]
//! daeun_days_per_year = 3.0      # Days between birth and term that count as one year
//! daeun_count = 10               # Decades to project (1-20)
//! ```

pub mod loading;
pub mod validation;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use crate::analysis::AnalysisOptions;
use crate::chart::{ChartOptions, EngineChoice};
use crate::constants::*;
use crate::pillar::HourBoundary;

pub use loading::{get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir};

/// Settings read from `saju.toml`.
///
/// Every field is optional in the file. After loading, [`loading::load`] fills
/// in defaults, so the resolved view is available through
/// `ChartOptions::from(&config)`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub hour_boundary: Option<HourBoundary>,
    pub true_solar_time: Option<bool>,
    pub engine: Option<EngineChoice>,
    pub ephemeris_timeout_ms: Option<u64>,

    pub sinyak_below: Option<f64>,
    pub singang_above: Option<f64>,
    pub seasonal_multiplier: Option<f64>,
    pub visible_weight: Option<f64>,
    /// Principal, middle and residual weights, in that order.
    pub hidden_weights: Option<[f64; 3]>,

    pub daeun_days_per_year: Option<f64>,
    pub daeun_count: Option<usize>,
}

impl Config {
    /// Load configuration using the module's load function
    pub fn load() -> Result<Self> {
        load()
    }

    /// Load from path using the module's load_from_path function
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        load_from_path(path)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        get_config_path()
    }

    /// Fill every unset field with its default.
    pub fn apply_defaults(&mut self) {
        self.hour_boundary.get_or_insert_with(HourBoundary::default);
        self.true_solar_time.get_or_insert(DEFAULT_TRUE_SOLAR_TIME);
        self.engine.get_or_insert_with(EngineChoice::default);
        self.ephemeris_timeout_ms
            .get_or_insert(DEFAULT_EPHEMERIS_TIMEOUT_MS);
        self.sinyak_below.get_or_insert(DEFAULT_SINYAK_BELOW);
        self.singang_above.get_or_insert(DEFAULT_SINGANG_ABOVE);
        self.seasonal_multiplier
            .get_or_insert(DEFAULT_SEASONAL_MULTIPLIER);
        self.visible_weight.get_or_insert(DEFAULT_VISIBLE_WEIGHT);
        self.hidden_weights.get_or_insert(DEFAULT_HIDDEN_WEIGHTS);
        self.daeun_days_per_year
            .get_or_insert(DEFAULT_DAEUN_DAYS_PER_YEAR);
        self.daeun_count.get_or_insert(DEFAULT_DAEUN_COUNT);
    }

    /// Print the effective settings as a log block.
    pub fn log_config(&self, source: &str) {
        let options = ChartOptions::from(self);

        log_block_start!("Loaded {source}");
        log_indented!("Hour boundary: {}", options.hour_boundary);
        log_indented!(
            "True solar time: {}",
            if options.true_solar_time { "on" } else { "off" }
        );
        log_indented!(
            "Engine: {:?} ({} ms budget)",
            options.engine,
            options.ephemeris_timeout.as_millis()
        );
        log_indented!(
            "Strength: 신약 < {}% < 중화 < {}% < 신강",
            options.analysis.sinyak_below,
            options.analysis.singang_above
        );
        log_indented!(
            "Daeun: {} decades, {} days per year",
            options.daeun_count,
            options.daeun_days_per_year
        );
    }
}

impl From<&Config> for ChartOptions {
    fn from(config: &Config) -> Self {
        let analysis = AnalysisOptions {
            visible_weight: config.visible_weight.unwrap_or(DEFAULT_VISIBLE_WEIGHT),
            hidden_weights: config.hidden_weights.unwrap_or(DEFAULT_HIDDEN_WEIGHTS),
            seasonal_multiplier: config
                .seasonal_multiplier
                .unwrap_or(DEFAULT_SEASONAL_MULTIPLIER),
            sinyak_below: config.sinyak_below.unwrap_or(DEFAULT_SINYAK_BELOW),
            singang_above: config.singang_above.unwrap_or(DEFAULT_SINGANG_ABOVE),
        };

        ChartOptions {
            hour_boundary: config.hour_boundary.unwrap_or_default(),
            true_solar_time: config.true_solar_time.unwrap_or(DEFAULT_TRUE_SOLAR_TIME),
            engine: config.engine.unwrap_or_default(),
            ephemeris_timeout: Duration::from_millis(
                config
                    .ephemeris_timeout_ms
                    .unwrap_or(DEFAULT_EPHEMERIS_TIMEOUT_MS),
            ),
            analysis,
            daeun_days_per_year: config
                .daeun_days_per_year
                .unwrap_or(DEFAULT_DAEUN_DAYS_PER_YEAR),
            daeun_count: config.daeun_count.unwrap_or(DEFAULT_DAEUN_COUNT),
        }
    }
}

#[cfg(test)]
mod tests;
