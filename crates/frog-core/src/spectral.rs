//! Spectral processing: passband filtering and quadratic spectral phase.
//!
//! The processor runs one full round trip over the synthesized field:
//! forward transform → optional hard passband mask → optional multiplication
//! by $\exp(-i \frac{1}{2} \phi'' \Delta\omega^2)$ → inverse transform. Each
//! stage takes its input by reference and returns a new array, so the
//! unprocessed field stays available to callers that want to display both.

use ndarray::Array1;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::fourier::{self, Fourier};
use crate::grid::TimeGrid;

/// Passband mask orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    /// Zero every bin whose |frequency| exceeds the cutoff.
    LowPass,
    /// Zero every bin whose |frequency| falls below the cutoff.
    HighPass,
}

/// Hard spectral passband filter.
///
/// The cutoff is expressed in the cyclic frequency units (1/fs) of the
/// centered DFT axis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FilterSpec {
    pub kind: FilterKind,
    pub cutoff: f64,
}

/// Quadratic spectral phase (group-delay dispersion), φ″ in fs².
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DispersionSpec {
    pub gdd_fs2: f64,
}

/// Apply the hard passband mask to a centered spectrum.
///
/// The mask is an abrupt in-place zeroing, not a smooth roll-off; the
/// resulting spectral truncation (Gibbs artifacts included) is part of the
/// modeled behavior. Cutoffs outside the representable frequency range are
/// accepted silently and simply make the mask all-pass or all-block.
pub fn apply_filter(
    spectrum: &Array1<Complex64>,
    frequencies: &Array1<f64>,
    filter: &FilterSpec,
) -> Array1<Complex64> {
    Array1::from_iter(spectrum.iter().zip(frequencies.iter()).map(|(&v, &f)| {
        let blocked = match filter.kind {
            FilterKind::LowPass => f.abs() > filter.cutoff,
            FilterKind::HighPass => f.abs() < filter.cutoff,
        };
        if blocked {
            Complex64::new(0.0, 0.0)
        } else {
            v
        }
    }))
}

/// Multiply a centered spectrum by the quadratic spectral phase
/// $\exp(-i \frac{1}{2} \phi'' (\omega - \omega_0)^2)$.
///
/// `omega0` is the reference angular frequency the offset is measured from:
/// the carrier frequency for carrier-bearing fields, zero for baseband
/// envelopes.
pub fn apply_dispersion(
    spectrum: &Array1<Complex64>,
    angular_frequencies: &Array1<f64>,
    dispersion: &DispersionSpec,
    omega0: f64,
) -> Array1<Complex64> {
    Array1::from_iter(
        spectrum
            .iter()
            .zip(angular_frequencies.iter())
            .map(|(&v, &w)| {
                let delta = w - omega0;
                v * Complex64::from_polar(1.0, -0.5 * dispersion.gdd_fs2 * delta * delta)
            }),
    )
}

/// Run the full spectral round trip on `field`.
///
/// With neither stage configured the field passes through bit-exact (no
/// transform round trip is performed).
pub fn process(
    fourier: &Fourier,
    grid: &TimeGrid,
    field: &Array1<Complex64>,
    filter: Option<&FilterSpec>,
    dispersion: Option<&DispersionSpec>,
    omega0: f64,
) -> Array1<Complex64> {
    if filter.is_none() && dispersion.is_none() {
        return field.clone();
    }
    let mut spectrum = fourier::fftshift(&fourier.forward(field));
    if let Some(f) = filter {
        spectrum = apply_filter(&spectrum, &grid.cyclic_frequencies(), f);
    }
    if let Some(d) = dispersion {
        spectrum = apply_dispersion(&spectrum, &grid.angular_frequencies(), d, omega0);
    }
    fourier.inverse(&fourier::ifftshift(&spectrum))
}

/// Centered power spectrum $|\mathcal{F}\{E\}|^2$ of a time-domain field,
/// aligned with [`TimeGrid::angular_frequencies`]. Intended for presentation
/// layers plotting the spectrum alongside the trace.
pub fn power_spectrum(fourier: &Fourier, field: &Array1<Complex64>) -> Array1<f64> {
    fourier::fftshift(&fourier.forward(field)).mapv(|v| v.norm_sqr())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PhysicalConstants;
    use crate::pulse::{self, PulseShape, PulseSpec};
    use approx::assert_relative_eq;

    fn flat_spectrum(n: usize) -> Array1<Complex64> {
        Array1::from_elem(n, Complex64::new(1.0, 0.0))
    }

    #[test]
    fn test_low_pass_zeroes_bins_above_cutoff() {
        let grid = TimeGrid::centered(16, 15.0).unwrap();
        let freqs = grid.cyclic_frequencies();
        let filter = FilterSpec {
            kind: FilterKind::LowPass,
            cutoff: 0.2,
        };
        let filtered = apply_filter(&flat_spectrum(16), &freqs, &filter);
        for (&f, v) in freqs.iter().zip(filtered.iter()) {
            if f.abs() > 0.2 {
                assert_eq!(v.norm(), 0.0);
            } else {
                assert_eq!(*v, Complex64::new(1.0, 0.0));
            }
        }
    }

    #[test]
    fn test_high_pass_zeroes_bins_below_cutoff() {
        let grid = TimeGrid::centered(16, 15.0).unwrap();
        let freqs = grid.cyclic_frequencies();
        let filter = FilterSpec {
            kind: FilterKind::HighPass,
            cutoff: 0.2,
        };
        let filtered = apply_filter(&flat_spectrum(16), &freqs, &filter);
        for (&f, v) in freqs.iter().zip(filtered.iter()) {
            if f.abs() < 0.2 {
                assert_eq!(v.norm(), 0.0);
            } else {
                assert_eq!(*v, Complex64::new(1.0, 0.0));
            }
        }
    }

    #[test]
    fn test_filter_is_idempotent() {
        let grid = TimeGrid::centered(64, 90.0).unwrap();
        let freqs = grid.cyclic_frequencies();
        let spectrum = Array1::from_iter(
            (0..64).map(|k| Complex64::new((k as f64 * 0.4).sin(), (k as f64 * 0.9).cos())),
        );
        for kind in [FilterKind::LowPass, FilterKind::HighPass] {
            let filter = FilterSpec { kind, cutoff: 0.1 };
            let once = apply_filter(&spectrum, &freqs, &filter);
            let twice = apply_filter(&once, &freqs, &filter);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_out_of_range_cutoff_is_accepted_silently() {
        let grid = TimeGrid::centered(16, 15.0).unwrap();
        let freqs = grid.cyclic_frequencies();
        let spectrum = flat_spectrum(16);
        let beyond_nyquist = freqs.iter().cloned().fold(0.0_f64, |a, f| a.max(f.abs())) + 1.0;
        let all_pass = apply_filter(
            &spectrum,
            &freqs,
            &FilterSpec {
                kind: FilterKind::LowPass,
                cutoff: beyond_nyquist,
            },
        );
        assert_eq!(all_pass, spectrum);
        let all_block = apply_filter(
            &spectrum,
            &freqs,
            &FilterSpec {
                kind: FilterKind::HighPass,
                cutoff: beyond_nyquist,
            },
        );
        assert!(all_block.iter().all(|v| v.norm() == 0.0));
    }

    #[test]
    fn test_dispersion_preserves_spectral_power() {
        let grid = TimeGrid::centered(32, 40.0).unwrap();
        let angular = grid.angular_frequencies();
        let spectrum = Array1::from_iter(
            (0..32).map(|k| Complex64::new((k as f64 * 0.3).cos(), (k as f64 * 0.5).sin())),
        );
        let dispersed = apply_dispersion(
            &spectrum,
            &angular,
            &DispersionSpec { gdd_fs2: 200.0 },
            0.0,
        );
        for (a, b) in spectrum.iter().zip(dispersed.iter()) {
            assert_relative_eq!(a.norm(), b.norm(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_process_without_stages_passes_field_through() {
        let grid = TimeGrid::centered(64, 90.0).unwrap();
        let fourier = Fourier::new(64);
        let spec = PulseSpec {
            shape: PulseShape::Gaussian,
            duration_fs: 10.0,
            offset_fs: 0.0,
            carrier: false,
        };
        let field = pulse::synthesize(&grid, &spec, &PhysicalConstants::default()).unwrap();
        let out = process(&fourier, &grid, &field, None, None, 0.0);
        assert_eq!(out, field);
    }

    /// Second moment of the intensity |E(t)|² about its centroid.
    fn rms_duration(grid: &TimeGrid, field: &Array1<Complex64>) -> f64 {
        let intensity = field.mapv(|v| v.norm_sqr());
        let total: f64 = intensity.sum();
        let mean: f64 = grid
            .samples()
            .iter()
            .zip(intensity.iter())
            .map(|(&t, &p)| t * p)
            .sum::<f64>()
            / total;
        let var: f64 = grid
            .samples()
            .iter()
            .zip(intensity.iter())
            .map(|(&t, &p)| (t - mean) * (t - mean) * p)
            .sum::<f64>()
            / total;
        var.sqrt()
    }

    #[test]
    fn test_positive_gdd_stretches_a_transform_limited_pulse() {
        let n = 1024;
        let grid = TimeGrid::centered(n, 400.0).unwrap();
        let fourier = Fourier::new(n);
        let constants = PhysicalConstants::default();
        let spec = PulseSpec {
            shape: PulseShape::Gaussian,
            duration_fs: crate::pulse::fwhm_to_sigma(20.0),
            offset_fs: 0.0,
            carrier: true,
        };
        let field = pulse::synthesize(&grid, &spec, &constants).unwrap();
        let before = rms_duration(&grid, &field);
        let chirped = process(
            &fourier,
            &grid,
            &field,
            None,
            Some(&DispersionSpec { gdd_fs2: 200.0 }),
            constants.carrier_omega(),
        );
        let after = rms_duration(&grid, &chirped);
        assert!(
            after > 1.5 * before,
            "φ″ = 200 fs² should stretch the pulse: {:.3} fs → {:.3} fs",
            before,
            after
        );
    }
}
