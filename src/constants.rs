//! Application-wide constants: epoch anchors, configuration defaults and limits.

// # Epoch anchors

/// Sexagenary year anchor: 1984 is the 甲子 year (stem 0, branch 0).
pub const YEAR_EPOCH: i32 = 1984;

/// Julian Day of the day-pillar anchor, 1984-02-02T00:00:00 taken as a 甲子 day.
pub const DAY_EPOCH_JD: f64 = 2_445_732.5;

/// Julian Day of J2000.0 (2000-01-01T12:00:00 TT).
pub const J2000_JD: f64 = 2_451_545.0;

/// Julian Day of the Unix epoch (1970-01-01T00:00:00 UTC).
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const TROPICAL_YEAR_DAYS: f64 = 365.242_19;

// # Solar term search

/// Longitude of solar term index 0 (소한).
pub const FIRST_TERM_LONGITUDE: f64 = 285.0;
/// Longitude of 입춘, the start of the solar year.
pub const LICHUN_LONGITUDE: f64 = 315.0;
pub const TERM_LONGITUDE_STEP: f64 = 15.0;
pub const TERM_TOLERANCE_DEG: f64 = 1e-4;
/// A solve that stops at the iteration cap is still accepted within this residual.
pub const TERM_ACCEPT_DEG: f64 = 1e-2;
pub const TERM_MAX_ITERATIONS: usize = 50;
pub const TERM_MAX_STEP_DAYS: f64 = 20.0;
/// Half-width of the central difference used for the sun's angular speed.
pub const SPEED_PROBE_DAYS: f64 = 0.5;

// # Configuration defaults

pub const DEFAULT_TRUE_SOLAR_TIME: bool = true;
pub const DEFAULT_EPHEMERIS_TIMEOUT_MS: u64 = 2000;
pub const DEFAULT_SINYAK_BELOW: f64 = 40.0;
pub const DEFAULT_SINGANG_ABOVE: f64 = 60.0;
pub const DEFAULT_SEASONAL_MULTIPLIER: f64 = 2.0;
pub const DEFAULT_VISIBLE_WEIGHT: f64 = 10.0;
pub const DEFAULT_HIDDEN_WEIGHTS: [f64; 3] = [6.0, 3.0, 1.0];
pub const DEFAULT_DAEUN_DAYS_PER_YEAR: f64 = 3.0;
pub const DEFAULT_DAEUN_COUNT: usize = 10;

// # Configuration limits

pub const MINIMUM_EPHEMERIS_TIMEOUT_MS: u64 = 10;
pub const MAXIMUM_EPHEMERIS_TIMEOUT_MS: u64 = 60_000;
pub const MINIMUM_DAEUN_COUNT: usize = 1;
pub const MAXIMUM_DAEUN_COUNT: usize = 20;
pub const MINIMUM_SEASONAL_MULTIPLIER: f64 = 1.0;
pub const MAXIMUM_SEASONAL_MULTIPLIER: f64 = 5.0;
pub const MINIMUM_DAEUN_START_AGE: u32 = 1;
pub const MAXIMUM_DAEUN_START_AGE: u32 = 10;

/// Years covered by one daeun entry.
pub const DAEUN_SPAN_YEARS: u32 = 10;

// # Exit codes

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
