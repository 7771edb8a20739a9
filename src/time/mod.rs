//! Temporal normalization: parsing, timezones, Julian Day and true solar time.

pub mod julian;
pub mod normalize;
pub mod zone;

pub use julian::{julian_day_from_naive, julian_day_from_utc, utc_from_julian_day};
pub use normalize::{
    Coordinates, EotSource, NormalizedTime, SolarTimeCorrection, TimeAccuracy, normalize,
    parse_wall_clock, true_solar_correction,
};
pub use zone::{Zone, resolve_zone, zone_from_coordinates};
