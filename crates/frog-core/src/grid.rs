//! Time, frequency, and delay axes.
//!
//! A [`TimeGrid`] is immutable once built and owned by the simulation run.
//! The frequency axes are derived from its sample spacing via the discrete-
//! Fourier sampling relation and centered with the same shift convention as
//! every spectrum computed by the trace assembler (see [`crate::fourier`]).

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::engine::ConfigurationError;
use crate::fourier;

/// Uniform time grid spanning a configured window.
///
/// Samples are endpoint-inclusive, so the spacing is span/(N−1).
#[derive(Debug, Clone)]
pub struct TimeGrid {
    samples: Array1<f64>,
    dt: f64,
}

impl TimeGrid {
    /// Build an `n`-sample grid over `[t_min, t_max]` (fs), endpoints
    /// included. Fails for grids with fewer than two samples or a
    /// non-positive span.
    pub fn new(n: usize, t_min: f64, t_max: f64) -> Result<Self, ConfigurationError> {
        if n < 2 {
            return Err(ConfigurationError::GridTooSmall(n));
        }
        let span = t_max - t_min;
        if !(span > 0.0) {
            return Err(ConfigurationError::InvalidWindow(span));
        }
        let dt = span / (n - 1) as f64;
        let samples = Array1::from_iter((0..n).map(|i| t_min + i as f64 * dt));
        Ok(Self { samples, dt })
    }

    /// Grid of `n` samples centered on zero with total span `window_fs`.
    pub fn centered(n: usize, window_fs: f64) -> Result<Self, ConfigurationError> {
        Self::new(n, -window_fs / 2.0, window_fs / 2.0)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample spacing Δt (fs).
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Total window span (fs).
    pub fn span(&self) -> f64 {
        self.samples[self.samples.len() - 1] - self.samples[0]
    }

    /// Sample times (fs).
    pub fn samples(&self) -> &Array1<f64> {
        &self.samples
    }

    /// Centered cyclic DFT frequencies (1/fs), aligned with every centered
    /// spectrum computed on this grid.
    pub fn cyclic_frequencies(&self) -> Array1<f64> {
        fourier::fftshift(&fourier::fftfreq(self.len(), self.dt))
    }

    /// Centered angular DFT frequencies (rad/fs).
    pub fn angular_frequencies(&self) -> Array1<f64> {
        self.cyclic_frequencies()
            .mapv(|f| 2.0 * std::f64::consts::PI * f)
    }
}

/// How the delay axis is produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DelaySpec {
    /// Reuse the time grid itself: delays are realized as integer index
    /// rotations of the sampled field (periodic wrap-around).
    FromGrid,
    /// An independently configured linear range, realized by sub-sample
    /// linear interpolation of the field.
    Linear {
        start_fs: f64,
        stop_fs: f64,
        count: usize,
    },
}

/// Gating strategy implied by the delay specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayStrategy {
    /// Integer index rotation of the discretized field, wrapping at the ends.
    Rotation,
    /// Piecewise-linear interpolation against arbitrary real delays.
    Interpolation,
}

/// Realized delay axis plus the gating strategy it implies.
#[derive(Debug, Clone)]
pub struct DelaySet {
    values: Array1<f64>,
    strategy: DelayStrategy,
}

impl DelaySet {
    /// Realize a delay specification against a time grid.
    pub fn build(spec: &DelaySpec, grid: &TimeGrid) -> Result<Self, ConfigurationError> {
        match *spec {
            DelaySpec::FromGrid => Ok(Self {
                values: grid.samples().clone(),
                strategy: DelayStrategy::Rotation,
            }),
            DelaySpec::Linear {
                start_fs,
                stop_fs,
                count,
            } => {
                if count == 0 {
                    return Err(ConfigurationError::EmptyDelaySet);
                }
                if count > 1 && !(stop_fs > start_fs) {
                    return Err(ConfigurationError::InvalidDelayRange {
                        start: start_fs,
                        stop: stop_fs,
                    });
                }
                let values = if count == 1 {
                    Array1::from_elem(1, start_fs)
                } else {
                    let step = (stop_fs - start_fs) / (count - 1) as f64;
                    Array1::from_iter((0..count).map(|i| start_fs + i as f64 * step))
                };
                Ok(Self {
                    values,
                    strategy: DelayStrategy::Interpolation,
                })
            }
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Delay values (fs), aligned with the trace columns.
    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn strategy(&self) -> DelayStrategy {
        self.strategy
    }
}
