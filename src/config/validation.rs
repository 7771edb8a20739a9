//! Configuration validation functionality.
//!
//! Rejects settings that would make the strength reading or the luck
//! projection meaningless.

use anyhow::Result;

use super::Config;
use crate::constants::*;

/// Check every field that is set; unset fields are left to the defaults.
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(timeout) = config.ephemeris_timeout_ms
        && !(MINIMUM_EPHEMERIS_TIMEOUT_MS..=MAXIMUM_EPHEMERIS_TIMEOUT_MS).contains(&timeout)
    {
        anyhow::bail!(
            "ephemeris_timeout_ms ({}) must be between {} and {} milliseconds",
            timeout,
            MINIMUM_EPHEMERIS_TIMEOUT_MS,
            MAXIMUM_EPHEMERIS_TIMEOUT_MS
        );
    }

    validate_thresholds(config)?;

    if let Some(multiplier) = config.seasonal_multiplier
        && !(MINIMUM_SEASONAL_MULTIPLIER..=MAXIMUM_SEASONAL_MULTIPLIER).contains(&multiplier)
    {
        anyhow::bail!(
            "seasonal_multiplier ({}) must be between {} and {}",
            multiplier,
            MINIMUM_SEASONAL_MULTIPLIER,
            MAXIMUM_SEASONAL_MULTIPLIER
        );
    }

    if let Some(weight) = config.visible_weight
        && !(weight.is_finite() && weight > 0.0)
    {
        anyhow::bail!("visible_weight must be a positive number (got {})", weight);
    }

    if let Some(weights) = config.hidden_weights {
        validate_hidden_weights(weights)?;
    }

    if let Some(days) = config.daeun_days_per_year
        && !(days.is_finite() && days > 0.0)
    {
        anyhow::bail!(
            "daeun_days_per_year must be a positive number (got {})",
            days
        );
    }

    if let Some(count) = config.daeun_count
        && !(MINIMUM_DAEUN_COUNT..=MAXIMUM_DAEUN_COUNT).contains(&count)
    {
        anyhow::bail!(
            "daeun_count ({}) must be between {} and {}",
            count,
            MINIMUM_DAEUN_COUNT,
            MAXIMUM_DAEUN_COUNT
        );
    }

    Ok(())
}

/// Both thresholds are percentages and 신약 must sit below 신강.
fn validate_thresholds(config: &Config) -> Result<()> {
    for (name, value) in [
        ("sinyak_below", config.sinyak_below),
        ("singang_above", config.singang_above),
    ] {
        if let Some(v) = value
            && !(0.0..=100.0).contains(&v)
        {
            anyhow::bail!("{} ({}) must be between 0 and 100 percent", name, v);
        }
    }

    let sinyak = config.sinyak_below.unwrap_or(DEFAULT_SINYAK_BELOW);
    let singang = config.singang_above.unwrap_or(DEFAULT_SINGANG_ABOVE);
    if sinyak >= singang {
        anyhow::bail!(
            "sinyak_below ({}) must be lower than singang_above ({})",
            sinyak,
            singang
        );
    }

    Ok(())
}

fn validate_hidden_weights(weights: [f64; 3]) -> Result<()> {
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        anyhow::bail!(
            "hidden_weights must be non-negative numbers (got {:?})",
            weights
        );
    }
    if weights.windows(2).any(|pair| pair[0] < pair[1]) {
        anyhow::bail!(
            "hidden_weights must not increase from principal to residual (got {:?})",
            weights
        );
    }
    Ok(())
}
