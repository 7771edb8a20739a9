//! # Saju Library
//!
//! Four Pillars (사주팔자) birth chart engine behind the `saju` binary.
//!
//! ## Architecture
//!
//! - **Cycle**: `cycle` module with the stems, branches and the 60-pair sexagenary cycle
//! - **Time**: `time` module turning a wall clock and timezone into UTC, Julian Day and
//!   true solar time
//! - **Solar**: `solar` module with the sun position engines and the 24-term locator
//! - **Pillars**: `pillar` module deriving the year, month, day and hour pillars
//! - **Analysis**: `analysis` module for ten gods, twelve stages, element balance and strength
//! - **Luck**: `luck` module for decade, annual and monthly luck
//! - **Sinsal**: `sinsal` module for the auxiliary stars
//! - **Facade**: `chart` module running the pipeline with engine fallback
//! - **Infrastructure**: configuration, argument parsing, commands and logging

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod analysis;
pub mod args;
pub mod chart;
pub mod commands;
pub mod config;
pub mod constants;
pub mod cycle;
pub mod error;
pub mod luck;
pub mod pillar;
pub mod sinsal;
pub mod solar;
pub mod time;

#[cfg(feature = "testing-support")]
pub mod testing;

pub use chart::{
    BirthInput, ChartMetadata, ChartOptions, ChartResult, EngineChoice, SolarTermsReport,
    compute_chart, compute_chart_with, compute_solar_terms,
};
pub use error::{ChartError, EphemerisError};
