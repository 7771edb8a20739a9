//! Sun position engines and the solar-term locator built on them.

pub mod approximate;
pub mod ephemeris;
pub mod provider;
pub mod terms;

pub use approximate::{ApproximateSolarModel, equation_of_time_minutes};
pub use ephemeris::MeeusEphemeris;
pub use provider::{SolarPositionProvider, TimeBoundedProvider, normalize_180, normalize_360};
pub use terms::{
    LICHUN_INDEX, SolarTermInfo, SolarTermLocator, SurroundingTerms, TERM_COUNT,
    locate_solar_terms, month_branch_of, term_longitude,
};

#[cfg(test)]
mod tests;
