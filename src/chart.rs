//! Chart computation entry points.
//!
//! [`compute_chart`] runs the whole pipeline (normalize, solve terms, resolve
//! pillars, analyze, project luck, evaluate sinsal) against the configured
//! engine. When the primary engine fails or times out, the pipeline is run a
//! second time on the approximate engine and the result says so in its
//! [`ChartMetadata`].

use std::sync::Arc;
use std::time::Duration;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisOptions, ChartAnalysis, analyze};
use crate::constants::{
    DEFAULT_DAEUN_COUNT, DEFAULT_DAEUN_DAYS_PER_YEAR, DEFAULT_EPHEMERIS_TIMEOUT_MS,
    DEFAULT_TRUE_SOLAR_TIME,
};
use crate::error::{ChartError, Result};
use crate::luck::{AnnualLuck, DaeunCycle, Gender, MonthlyLuck, annual_luck, monthly_luck, project_daeun};
use crate::pillar::resolver::{SolarContext, resolve_pillars};
use crate::pillar::{FourPillars, HourBoundary};
use crate::sinsal::{Sinsal, evaluate};
use crate::solar::{
    ApproximateSolarModel, MeeusEphemeris, SolarPositionProvider, SolarTermInfo,
    SolarTermLocator, TimeBoundedProvider, equation_of_time_minutes,
};
use crate::time::normalize::{
    Coordinates, EotSource, NormalizedTime, TimeAccuracy, normalize, true_solar_correction,
};

/// Which solar engine runs the primary pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineChoice {
    #[default]
    Meeus,
    Approximate,
}

impl std::str::FromStr for EngineChoice {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "meeus" => Ok(EngineChoice::Meeus),
            "approximate" | "approx" => Ok(EngineChoice::Approximate),
            other => Err(format!(
                "unknown engine '{other}' (expected meeus or approximate)"
            )),
        }
    }
}

/// A birth event as entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthInput {
    /// Wall clock, `YYYY-MM-DDTHH:MM[:SS]` (a bare date for unknown time).
    pub local: String,
    /// IANA id, fixed offset, or `auto` to infer it from the coordinates.
    pub timezone: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub time_accuracy: TimeAccuracy,
    #[serde(default)]
    pub gender: Gender,
}

impl BirthInput {
    pub fn new(local: impl Into<String>, timezone: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            timezone: timezone.into(),
            latitude: None,
            longitude: None,
            time_accuracy: TimeAccuracy::Exact,
            gender: Gender::Male,
        }
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn with_accuracy(mut self, accuracy: TimeAccuracy) -> Self {
        self.time_accuracy = accuracy;
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    fn coordinates(&self) -> Result<Option<Coordinates>> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Coordinates::new(lat, lon).map(Some),
            (None, None) => Ok(None),
            _ => Err(ChartError::invalid_input(
                "latitude and longitude must be given together",
            )),
        }
    }
}

/// Resolved settings for one computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOptions {
    pub hour_boundary: HourBoundary,
    pub true_solar_time: bool,
    pub engine: EngineChoice,
    /// Per-call budget for the primary engine.
    pub ephemeris_timeout: Duration,
    pub analysis: AnalysisOptions,
    pub daeun_days_per_year: f64,
    pub daeun_count: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            hour_boundary: HourBoundary::default(),
            true_solar_time: DEFAULT_TRUE_SOLAR_TIME,
            engine: EngineChoice::default(),
            ephemeris_timeout: Duration::from_millis(DEFAULT_EPHEMERIS_TIMEOUT_MS),
            analysis: AnalysisOptions::default(),
            daeun_days_per_year: DEFAULT_DAEUN_DAYS_PER_YEAR,
            daeun_count: DEFAULT_DAEUN_COUNT,
        }
    }
}

/// How the result was obtained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartMetadata {
    pub engine_name: String,
    pub used_fallback_engine: bool,
    pub fallback_reason: Option<String>,
    /// Set when the engine's equation of time failed and the closed form
    /// stood in for it.
    pub eot_fallback_reason: Option<String>,
    pub true_solar_applied: bool,
    pub solar_correction_minutes: Option<f64>,
    pub hour_boundary: HourBoundary,
    pub time_accuracy: TimeAccuracy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartResult {
    pub input: BirthInput,
    pub time: NormalizedTime,
    pub pillars: FourPillars,
    pub solar: SolarContext,
    pub analysis: ChartAnalysis,
    pub daeun: DaeunCycle,
    pub sinsal: Vec<Sinsal>,
    pub metadata: ChartMetadata,
}

impl ChartResult {
    /// Civil year of birth, used for counted age.
    pub fn birth_year(&self) -> i32 {
        self.time.local.year()
    }

    pub fn annual_luck(&self, from_year: i32, count: usize) -> Vec<AnnualLuck> {
        annual_luck(self.pillars.day_master(), self.birth_year(), from_year, count)
    }

    pub fn monthly_luck(&self, solar_year: i32) -> Result<Vec<MonthlyLuck>> {
        monthly_luck(self.pillars.day_master(), solar_year)
    }
}

/// Terms of one year plus which engine produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolarTermsReport {
    pub year: i32,
    pub engine_name: String,
    pub used_fallback_engine: bool,
    pub terms: Vec<SolarTermInfo>,
}

/// One full pass of the pipeline against a single provider.
fn compute_pass(
    input: &BirthInput,
    options: &ChartOptions,
    provider: &dyn SolarPositionProvider,
    engine_name: &str,
) -> Result<ChartResult> {
    let accuracy = input.time_accuracy;
    let coordinates = input.coordinates()?;
    let mut time = normalize(&input.local, &input.timezone, coordinates, accuracy)?;
    let mut eot_fallback_reason = None;

    if options.true_solar_time
        && accuracy.has_hour()
        && let Some(c) = coordinates
    {
        let (eot, source) = match provider.equation_of_time_at(time.julian_day) {
            Ok(Some(minutes)) => (minutes, EotSource::Engine),
            Ok(None) => (equation_of_time_minutes(time.julian_day), EotSource::Approximation),
            Err(e) => {
                log_warning!("Engine equation of time failed ({e}), using the closed form");
                eot_fallback_reason = Some(format!("equation of time: {e}"));
                (equation_of_time_minutes(time.julian_day), EotSource::Approximation)
            }
        };
        let correction = true_solar_correction(&time, c.longitude, eot, source);
        log_debug!(
            "true solar time: {:+.2} min longitude, {:+.2} min equation of time → {}",
            correction.longitude_minutes,
            correction.equation_of_time_minutes,
            correction.wall
        );
        time.solar = Some(correction);
    }

    let mut locator = SolarTermLocator::new(provider);
    let resolved = resolve_pillars(&time, accuracy, options.hour_boundary, &mut locator)?;
    let pillars = resolved.pillars;

    let analysis = analyze(&pillars, &options.analysis);
    let daeun = project_daeun(
        &pillars,
        &resolved.context,
        time.julian_day,
        input.gender,
        options.daeun_days_per_year,
        options.daeun_count,
    );
    let sinsal = evaluate(&pillars);

    let metadata = ChartMetadata {
        engine_name: engine_name.to_string(),
        used_fallback_engine: false,
        fallback_reason: None,
        eot_fallback_reason,
        true_solar_applied: time.solar.is_some(),
        solar_correction_minutes: time.solar.as_ref().map(|s| s.total_minutes),
        hour_boundary: options.hour_boundary,
        time_accuracy: accuracy,
    };

    Ok(ChartResult {
        input: input.clone(),
        time,
        pillars,
        solar: resolved.context,
        analysis,
        daeun,
        sinsal,
        metadata,
    })
}

/// Run `pass` on the time-bounded primary, then on the approximate engine
/// if the primary was unavailable.
fn with_fallback<T>(
    primary: Arc<dyn SolarPositionProvider>,
    timeout: Duration,
    mut pass: impl FnMut(&dyn SolarPositionProvider, bool) -> Result<T>,
) -> Result<T> {
    let bounded = TimeBoundedProvider::new(primary, timeout);
    match pass(&bounded, false) {
        Err(err) if err.is_recoverable_by_fallback() => {
            log_pipe!();
            log_warning!("Primary ephemeris unavailable: {err}");
            log_indented!("Recomputing with the approximate engine");
            pass(&ApproximateSolarModel::new(), true)
        }
        other => other,
    }
}

fn compute_named(
    input: &BirthInput,
    options: &ChartOptions,
    primary: Arc<dyn SolarPositionProvider>,
    engine_name: &str,
) -> Result<ChartResult> {
    let mut reason = None;
    let result = with_fallback(primary, options.ephemeris_timeout, |provider, fallback| {
        if fallback {
            compute_pass(input, options, provider, ApproximateSolarModel::NAME)
        } else {
            compute_pass(input, options, provider, engine_name).inspect_err(|e| {
                if e.is_recoverable_by_fallback() {
                    reason.get_or_insert_with(|| e.to_string());
                }
            })
        }
    });
    result.map(|mut chart| {
        if let Some(reason) = reason {
            chart.metadata.used_fallback_engine = true;
            chart.metadata.fallback_reason = Some(reason);
        }
        chart
    })
}

/// Compute a full chart with the engine chosen in `options`.
pub fn compute_chart(input: &BirthInput, options: &ChartOptions) -> Result<ChartResult> {
    match options.engine {
        EngineChoice::Meeus => compute_named(
            input,
            options,
            Arc::new(MeeusEphemeris::new()),
            MeeusEphemeris::NAME,
        ),
        EngineChoice::Approximate => compute_pass(
            input,
            options,
            &ApproximateSolarModel::new(),
            ApproximateSolarModel::NAME,
        ),
    }
}

/// Compute a full chart against a caller-supplied primary engine.
pub fn compute_chart_with(
    input: &BirthInput,
    options: &ChartOptions,
    primary: Arc<dyn SolarPositionProvider>,
) -> Result<ChartResult> {
    compute_named(input, options, primary, "external")
}

/// The 24 terms of `year` with the engine chosen in `options`.
pub fn compute_solar_terms(year: i32, options: &ChartOptions) -> Result<SolarTermsReport> {
    let report = |provider: &dyn SolarPositionProvider, name: &str, fallback: bool| {
        crate::solar::locate_solar_terms(year, provider).map(|terms| SolarTermsReport {
            year,
            engine_name: name.to_string(),
            used_fallback_engine: fallback,
            terms: terms.to_vec(),
        })
    };

    match options.engine {
        EngineChoice::Meeus => with_fallback(
            Arc::new(MeeusEphemeris::new()),
            options.ephemeris_timeout,
            |provider, fallback| {
                let name = if fallback {
                    ApproximateSolarModel::NAME
                } else {
                    MeeusEphemeris::NAME
                };
                report(provider, name, fallback)
            },
        ),
        EngineChoice::Approximate => {
            report(&ApproximateSolarModel::new(), ApproximateSolarModel::NAME, false)
        }
    }
}
