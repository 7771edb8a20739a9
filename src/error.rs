//! Error taxonomy for chart computation.
//!
//! Library operations return [`ChartError`]. Ephemeris failures carry their own
//! [`EphemerisError`] so that the chart facade can decide to rerun on the
//! approximate engine instead of failing. The CLI and configuration layers
//! wrap these in `anyhow` with context, the same split used everywhere else
//! in the crate.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Which derivation a [`ChartError::PillarComputation`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PillarStage {
    Year,
    Month,
    Day,
    Hour,
    SolarTerm,
}

impl std::fmt::Display for PillarStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PillarStage::Year => "year",
            PillarStage::Month => "month",
            PillarStage::Day => "day",
            PillarStage::Hour => "hour",
            PillarStage::SolarTerm => "solar term",
        };
        f.write_str(name)
    }
}

/// Failures of a solar position backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EphemerisError {
    /// The backend reported an error of its own.
    #[error("ephemeris engine failure: {0}")]
    Engine(String),

    /// The backend did not answer within the configured budget.
    #[error("ephemeris call timed out after {0:?}")]
    Timeout(Duration),

    /// The requested Julian Day lies outside the backend's validity range.
    #[error("julian day {0} is outside the supported ephemeris range")]
    OutOfRange(f64),
}

/// Errors surfaced by chart computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    /// Wall clock, timezone or coordinates could not be resolved. Not retryable.
    #[error("invalid temporal input: {0}")]
    InvalidTemporalInput(String),

    /// An internal invariant failed (table miss, non-convergent search).
    #[error("{pillar} pillar computation failed: {reason}")]
    PillarComputation { pillar: PillarStage, reason: String },

    /// The solar position service failed and no fallback was attempted.
    #[error("ephemeris unavailable: {0}")]
    EphemerisUnavailable(#[from] EphemerisError),
}

impl ChartError {
    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        ChartError::InvalidTemporalInput(msg.into())
    }

    pub(crate) fn pillar(pillar: PillarStage, reason: impl Into<String>) -> Self {
        ChartError::PillarComputation {
            pillar,
            reason: reason.into(),
        }
    }

    /// Whether rerunning on the approximate engine can recover this error.
    pub fn is_recoverable_by_fallback(&self) -> bool {
        matches!(self, ChartError::EphemerisUnavailable(_))
    }
}

pub type Result<T, E = ChartError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_ephemeris_errors_are_recoverable() {
        let ephem: ChartError = EphemerisError::Timeout(Duration::from_millis(5)).into();
        assert!(ephem.is_recoverable_by_fallback());
        assert!(!ChartError::invalid_input("bad date").is_recoverable_by_fallback());
        assert!(!ChartError::pillar(PillarStage::Month, "table miss").is_recoverable_by_fallback());
    }

    #[test]
    fn test_pillar_error_names_the_stage() {
        let err = ChartError::pillar(PillarStage::Hour, "slot out of range");
        assert_eq!(err.to_string(), "hour pillar computation failed: slot out of range");
    }
}
