//! The solar position capability consumed by the chart engine.
//!
//! Any backend that can answer "where is the sun on the ecliptic at this
//! Julian Day" plugs in through [`SolarPositionProvider`]: the built-in Meeus
//! engine, the closed-form approximation, or an external ephemeris bridge.
//! [`TimeBoundedProvider`] puts a deadline on every call so that a stalled
//! backend turns into an ordinary [`EphemerisError::Timeout`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::error::EphemerisError;

/// Sun position backend.
#[cfg_attr(test, mockall::automock)]
pub trait SolarPositionProvider: Send + Sync {
    /// Apparent geocentric ecliptic longitude of the sun, degrees in `[0, 360)`.
    fn longitude_at(&self, jd_utc: f64) -> Result<f64, EphemerisError>;

    /// Equation of time in minutes (apparent minus mean solar time).
    ///
    /// `Ok(None)` means the backend has no native model and the caller should
    /// use the closed-form approximation.
    fn equation_of_time_at(&self, _jd_utc: f64) -> Result<Option<f64>, EphemerisError> {
        Ok(None)
    }
}

impl<P: SolarPositionProvider + ?Sized> SolarPositionProvider for Arc<P> {
    fn longitude_at(&self, jd_utc: f64) -> Result<f64, EphemerisError> {
        (**self).longitude_at(jd_utc)
    }

    fn equation_of_time_at(&self, jd_utc: f64) -> Result<Option<f64>, EphemerisError> {
        (**self).equation_of_time_at(jd_utc)
    }
}

/// Normalize an angle into `[0, 360)`.
pub fn normalize_360(degrees: f64) -> f64 {
    let r = degrees.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if r >= 360.0 { 0.0 } else { r }
}

/// Normalize an angle difference into `(-180, 180]`.
pub fn normalize_180(degrees: f64) -> f64 {
    let r = normalize_360(degrees);
    if r > 180.0 { r - 360.0 } else { r }
}

enum Request {
    Longitude(f64),
    EquationOfTime(f64),
    Shutdown,
}

enum Response {
    Longitude(Result<f64, EphemerisError>),
    EquationOfTime(Result<Option<f64>, EphemerisError>),
}

struct Channel {
    tx: Sender<Request>,
    rx: Receiver<Response>,
}

/// Wraps a provider so that every call answers within `timeout`.
///
/// Calls run on a dedicated worker thread. Once a call times out the
/// wrapper trips and every later call fails immediately, since the worker
/// may still be stuck on the stalled request.
pub struct TimeBoundedProvider {
    channel: Mutex<Channel>,
    timeout: Duration,
    tripped: AtomicBool,
    handle: Option<JoinHandle<()>>,
}

impl TimeBoundedProvider {
    pub fn new(inner: Arc<dyn SolarPositionProvider>, timeout: Duration) -> Self {
        let (req_tx, req_rx) = channel::<Request>();
        let (resp_tx, resp_rx) = channel::<Response>();

        let handle = std::thread::spawn(move || {
            while let Ok(request) = req_rx.recv() {
                let response = match request {
                    Request::Longitude(jd) => Response::Longitude(inner.longitude_at(jd)),
                    Request::EquationOfTime(jd) => {
                        Response::EquationOfTime(inner.equation_of_time_at(jd))
                    }
                    Request::Shutdown => break,
                };
                if resp_tx.send(response).is_err() {
                    break;
                }
            }
        });

        Self {
            channel: Mutex::new(Channel {
                tx: req_tx,
                rx: resp_rx,
            }),
            timeout,
            tripped: AtomicBool::new(false),
            handle: Some(handle),
        }
    }

    /// Whether a call has already exceeded the deadline.
    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::SeqCst)
    }

    fn round_trip(&self, request: Request) -> Result<Response, EphemerisError> {
        if self.is_tripped() {
            return Err(EphemerisError::Timeout(self.timeout));
        }

        let channel = self
            .channel
            .lock()
            .map_err(|_| EphemerisError::Engine("ephemeris worker lock poisoned".into()))?;

        channel
            .tx
            .send(request)
            .map_err(|_| EphemerisError::Engine("ephemeris worker has stopped".into()))?;

        match channel.rx.recv_timeout(self.timeout) {
            Ok(response) => Ok(response),
            Err(RecvTimeoutError::Timeout) => {
                self.tripped.store(true, Ordering::SeqCst);
                Err(EphemerisError::Timeout(self.timeout))
            }
            Err(RecvTimeoutError::Disconnected) => Err(EphemerisError::Engine(
                "ephemeris worker exited without answering".into(),
            )),
        }
    }
}

impl SolarPositionProvider for TimeBoundedProvider {
    fn longitude_at(&self, jd_utc: f64) -> Result<f64, EphemerisError> {
        match self.round_trip(Request::Longitude(jd_utc))? {
            Response::Longitude(result) => result,
            Response::EquationOfTime(_) => Err(EphemerisError::Engine(
                "ephemeris worker answered out of order".into(),
            )),
        }
    }

    fn equation_of_time_at(&self, jd_utc: f64) -> Result<Option<f64>, EphemerisError> {
        match self.round_trip(Request::EquationOfTime(jd_utc))? {
            Response::EquationOfTime(result) => result,
            Response::Longitude(_) => Err(EphemerisError::Engine(
                "ephemeris worker answered out of order".into(),
            )),
        }
    }
}

impl Drop for TimeBoundedProvider {
    fn drop(&mut self) {
        if let Ok(channel) = self.channel.lock() {
            let _ = channel.tx.send(Request::Shutdown);
        }
        // A tripped worker may never return; leave it detached.
        if !self.is_tripped()
            && let Some(handle) = self.handle.take()
        {
            let _ = handle.join();
        }
    }
}
