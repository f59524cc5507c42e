//! The single computation entry point.
//!
//! [`run`] is a pure function of its [`SimulationInput`]: it validates
//! eagerly, synthesizes the field, runs the spectral round trip and the
//! optional crystal step, assembles the trace, and returns every artifact by
//! value. There is no I/O, no shared mutable state, and no partial result —
//! callers treat an invocation as all-or-nothing.

use ndarray::Array1;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::PhysicalConstants;
use crate::crystal::{self, CrystalSpec};
use crate::fourier::Fourier;
use crate::gate::FrogMethod;
use crate::grid::{DelaySet, DelaySpec, TimeGrid};
use crate::pulse::{self, PulseSpec};
use crate::spectral::{self, DispersionSpec, FilterSpec};
use crate::trace::{self, FrogTrace};

/// Configuration defects rejected before any transform work begins.
///
/// Numerically *poor* inputs (out-of-range cutoffs, extreme chirps) are not
/// errors; they produce degenerate but valid output.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("time grid needs at least two samples, got {0}")]
    GridTooSmall(usize),

    #[error("time window must have positive span, got {0} fs")]
    InvalidWindow(f64),

    #[error("pulse duration must be positive, got {0} fs")]
    InvalidDuration(f64),

    #[error("crystal length must be positive, got {0} mm")]
    InvalidCrystalLength(f64),

    #[error("delay range needs at least one sample")]
    EmptyDelaySet,

    #[error("delay range must have positive span, got [{start}, {stop}] fs")]
    InvalidDelayRange { start: f64, stop: f64 },

    #[error("XFROG reference duration must be positive, got {0} fs")]
    InvalidReferenceDuration(f64),
}

/// Time-grid parameters: sample count and total window span (fs), centered
/// on zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GridSpec {
    pub samples: usize,
    pub window_fs: f64,
}

/// Complete description of one trace computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationInput {
    pub grid: GridSpec,
    pub pulse: PulseSpec,
    pub constants: PhysicalConstants,
    pub filter: Option<FilterSpec>,
    pub dispersion: Option<DispersionSpec>,
    pub crystal: Option<CrystalSpec>,
    pub method: FrogMethod,
    pub delays: DelaySpec,
    /// XFROG reference duration σ (fs); defaults to half the pulse duration.
    pub reference_duration_fs: Option<f64>,
}

/// Everything a presentation layer needs, returned by value.
#[derive(Debug, Clone)]
pub struct SimulationOutput {
    /// The delay-gated spectrogram, shape (frequencies, delays).
    pub trace: FrogTrace,
    /// Centered angular frequency axis (rad/fs), aligned with trace rows.
    pub angular_frequencies: Array1<f64>,
    /// Delay axis (fs), aligned with trace columns.
    pub delays: Array1<f64>,
    /// The post-processing time-domain field (after filter, dispersion, and
    /// crystal), for independent intensity/phase plotting.
    pub field: Array1<Complex64>,
    /// Sample times (fs) aligned with `field`.
    pub time: Array1<f64>,
}

/// Check every input-level invariant without doing any transform work.
pub fn validate(input: &SimulationInput) -> Result<(), ConfigurationError> {
    if input.grid.samples < 2 {
        return Err(ConfigurationError::GridTooSmall(input.grid.samples));
    }
    if !(input.grid.window_fs > 0.0) {
        return Err(ConfigurationError::InvalidWindow(input.grid.window_fs));
    }
    if !(input.pulse.duration_fs > 0.0) {
        return Err(ConfigurationError::InvalidDuration(input.pulse.duration_fs));
    }
    if let Some(crystal) = &input.crystal {
        if !(crystal.length_mm > 0.0) {
            return Err(ConfigurationError::InvalidCrystalLength(crystal.length_mm));
        }
    }
    if let DelaySpec::Linear {
        start_fs,
        stop_fs,
        count,
    } = input.delays
    {
        if count == 0 {
            return Err(ConfigurationError::EmptyDelaySet);
        }
        if count > 1 && !(stop_fs > start_fs) {
            return Err(ConfigurationError::InvalidDelayRange {
                start: start_fs,
                stop: stop_fs,
            });
        }
    }
    if let Some(duration) = input.reference_duration_fs {
        if !(duration > 0.0) {
            return Err(ConfigurationError::InvalidReferenceDuration(duration));
        }
    }
    Ok(())
}

/// Run one full trace computation.
pub fn run(input: &SimulationInput) -> Result<SimulationOutput, ConfigurationError> {
    validate(input)?;

    let grid = TimeGrid::centered(input.grid.samples, input.grid.window_fs)?;
    let delays = DelaySet::build(&input.delays, &grid)?;
    let fourier = Fourier::new(grid.len());

    let synthesized = pulse::synthesize(&grid, &input.pulse, &input.constants)?;

    let omega0 = if input.pulse.carrier {
        input.constants.carrier_omega()
    } else {
        0.0
    };
    let processed = spectral::process(
        &fourier,
        &grid,
        &synthesized,
        input.filter.as_ref(),
        input.dispersion.as_ref(),
        omega0,
    );
    let field = match &input.crystal {
        Some(spec) => crystal::apply(&processed, spec),
        None => processed,
    };

    let source = match input.method {
        FrogMethod::Xfrog => {
            let duration = input
                .reference_duration_fs
                .unwrap_or(input.pulse.duration_fs / 2.0);
            pulse::reference(&grid, duration)?
        }
        FrogMethod::Shg | FrogMethod::Pg => field.clone(),
    };

    let trace = trace::assemble(&fourier, &grid, &field, &source, input.method, &delays);

    Ok(SimulationOutput {
        trace,
        angular_frequencies: grid.angular_frequencies(),
        delays: delays.values().clone(),
        field,
        time: grid.samples().clone(),
    })
}
