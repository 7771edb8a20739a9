//! Misbehaving solar providers for exercising the fallback path.
//!
//! Only compiled with the `testing-support` feature.

use std::time::Duration;

use crate::error::EphemerisError;
use crate::solar::SolarPositionProvider;

/// Fails every longitude request with an engine error.
#[derive(Debug, Clone)]
pub struct FailingProvider {
    pub message: String,
}

impl FailingProvider {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl SolarPositionProvider for FailingProvider {
    fn longitude_at(&self, _jd_utc: f64) -> Result<f64, EphemerisError> {
        Err(EphemerisError::Engine(self.message.clone()))
    }
}

/// Sleeps before answering, long enough to blow any reasonable budget.
#[derive(Debug, Clone)]
pub struct StalledProvider {
    pub delay: Duration,
}

impl StalledProvider {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl SolarPositionProvider for StalledProvider {
    fn longitude_at(&self, _jd_utc: f64) -> Result<f64, EphemerisError> {
        std::thread::sleep(self.delay);
        Ok(0.0)
    }

    fn equation_of_time_at(&self, _jd_utc: f64) -> Result<Option<f64>, EphemerisError> {
        std::thread::sleep(self.delay);
        Ok(None)
    }
}
