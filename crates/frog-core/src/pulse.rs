//! Field synthesis: Gaussian and chirped complex envelopes.
//!
//! The synthesizer is deterministic given its inputs. Two independent chirp
//! mechanisms exist in the engine: the *temporal* chirp here (an instantaneous
//! quadratic phase written directly into the time-domain field) and the
//! *spectral* quadratic phase applied later by [`crate::spectral`]. They are
//! configured separately and must not be conflated.

use ndarray::Array1;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::constants::PhysicalConstants;
use crate::engine::ConfigurationError;
use crate::grid::TimeGrid;

/// Temporal envelope family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PulseShape {
    /// Transform-limited Gaussian envelope.
    Gaussian,
    /// Gaussian envelope with an instantaneous quadratic temporal phase
    /// $\exp(i c (t - t_0)^2)$ of rate `rate` (rad/fs²).
    Chirped { rate: f64 },
}

/// Pulse description handed to the synthesizer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PulseSpec {
    pub shape: PulseShape,
    /// Gaussian width σ (fs).
    pub duration_fs: f64,
    /// Temporal offset t₀ (fs).
    pub offset_fs: f64,
    /// Multiply by the carrier $\exp(i \omega_0 t)$ when set; otherwise the
    /// field is the bare (baseband) envelope.
    pub carrier: bool,
}

/// Convert an intensity FWHM (fs) to the Gaussian σ used by [`PulseSpec`]:
/// $\sigma = \mathrm{FWHM} / (2\sqrt{2\ln 2})$.
pub fn fwhm_to_sigma(fwhm_fs: f64) -> f64 {
    fwhm_fs / (2.0 * (2.0 * std::f64::consts::LN_2).sqrt())
}

/// Synthesize the complex field of `spec` on `grid`.
///
/// The envelope is $\exp(-(t - t_0)^2 / 2\tau^2)$; the carrier phase rides on
/// absolute time, not the offset. Fails only for a non-positive duration.
pub fn synthesize(
    grid: &TimeGrid,
    spec: &PulseSpec,
    constants: &PhysicalConstants,
) -> Result<Array1<Complex64>, ConfigurationError> {
    if !(spec.duration_fs > 0.0) {
        return Err(ConfigurationError::InvalidDuration(spec.duration_fs));
    }
    let tau = spec.duration_fs;
    let omega0 = if spec.carrier {
        constants.carrier_omega()
    } else {
        0.0
    };
    let field = grid.samples().mapv(|t| {
        let shifted = t - spec.offset_fs;
        let envelope = (-shifted * shifted / (2.0 * tau * tau)).exp();
        let mut phase = omega0 * t;
        if let PulseShape::Chirped { rate } = spec.shape {
            phase += rate * shifted * shifted;
        }
        Complex64::from_polar(envelope, phase)
    });
    Ok(field)
}

/// Reference pulse for XFROG gating: an envelope-only Gaussian of the given
/// duration centered on the grid, independent of the signal field's carrier
/// mode.
pub fn reference(grid: &TimeGrid, duration_fs: f64) -> Result<Array1<Complex64>, ConfigurationError> {
    if !(duration_fs > 0.0) {
        return Err(ConfigurationError::InvalidReferenceDuration(duration_fs));
    }
    let spec = PulseSpec {
        shape: PulseShape::Gaussian,
        duration_fs,
        offset_fs: 0.0,
        carrier: false,
    };
    synthesize(grid, &spec, &PhysicalConstants::default())
}
