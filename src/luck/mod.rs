//! Luck cycles: decade (대운), annual (연운) and monthly (월운) pillars.

pub mod annual;
pub mod daeun;

pub use annual::{
    AnnualLuck, LuckReading, MonthlyLuck, annual_luck, annual_pillar, monthly_luck,
    monthly_pillar,
};
pub use daeun::{Daeun, DaeunCycle, Direction, Gender, StartAge, interval_to_boundary};

use crate::pillar::FourPillars;
use crate::pillar::resolver::SolarContext;

/// Direction, start age and sequence of the decade luck for a birth.
pub fn project_daeun(
    pillars: &FourPillars,
    context: &SolarContext,
    birth_jd: f64,
    gender: Gender,
    days_per_year: f64,
    count: usize,
) -> DaeunCycle {
    let direction = Direction::for_birth(pillars.year.stem(), gender);
    let interval = interval_to_boundary(birth_jd, context, direction);
    let start_age = StartAge::from_interval(interval, days_per_year);
    log_debug!(
        "daeun {direction:?}: {interval:.2} days to the jie boundary, start age {:.2}",
        start_age.precise
    );
    DaeunCycle::project(
        pillars.month,
        pillars.day_master(),
        direction,
        start_age,
        count,
    )
}
