//! DFT plumbing shared by every spectrum in the engine.
//!
//! All spectra (and the frequency axes derived in [`crate::grid`]) use one
//! centering convention: the raw transform is rotated with [`fftshift`] so the
//! zero-frequency bin sits at the grid midpoint. The trace assembler and the
//! axis utility must agree on this rotation or row/frequency alignment silently
//! breaks, so both go through the helpers here.
//!
//! Normalization follows the convention of the reference behavior: the forward
//! transform is unnormalized and the inverse carries the $1/N$ factor.

use std::sync::Arc;

use ndarray::Array1;
use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

/// Planned forward/inverse DFT pair for a fixed length.
///
/// Plans are built once per simulation run and shared across the parallel
/// per-delay workers; `rustfft` transforms are `Send + Sync`.
pub struct Fourier {
    fwd: Arc<dyn Fft<f64>>,
    inv: Arc<dyn Fft<f64>>,
    n: usize,
}

impl Fourier {
    /// Plan transforms of length `n`.
    pub fn new(n: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            fwd: planner.plan_fft_forward(n),
            inv: planner.plan_fft_inverse(n),
            n,
        }
    }

    /// Transform length.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Forward DFT of `field`, returned as a new uncentered array.
    pub fn forward(&self, field: &Array1<Complex64>) -> Array1<Complex64> {
        let mut buffer = field.to_vec();
        self.fwd.process(&mut buffer);
        Array1::from_vec(buffer)
    }

    /// Inverse DFT of an uncentered `spectrum`, scaled by $1/N$.
    pub fn inverse(&self, spectrum: &Array1<Complex64>) -> Array1<Complex64> {
        let mut buffer = spectrum.to_vec();
        self.inv.process(&mut buffer);
        let scale = 1.0 / self.n as f64;
        Array1::from_iter(buffer.into_iter().map(|v| v * scale))
    }
}

/// Sample frequencies of an `n`-point DFT with sample spacing `dt` (cycles
/// per time unit), in the uncentered DFT bin order.
pub fn fftfreq(n: usize, dt: f64) -> Array1<f64> {
    let step = 1.0 / (n as f64 * dt);
    let half = ((n as i64) + 1) / 2;
    Array1::from_iter((0..n as i64).map(|k| {
        if k < half {
            k as f64 * step
        } else {
            (k - n as i64) as f64 * step
        }
    }))
}

/// Rotate so the zero-frequency bin sits at the grid midpoint.
pub fn fftshift<T: Clone>(x: &Array1<T>) -> Array1<T> {
    let mid = (x.len() + 1) / 2;
    Array1::from_iter(x.iter().skip(mid).chain(x.iter().take(mid)).cloned())
}

/// Undo [`fftshift`], restoring the uncentered DFT bin order.
pub fn ifftshift<T: Clone>(x: &Array1<T>) -> Array1<T> {
    let mid = x.len() / 2;
    Array1::from_iter(x.iter().skip(mid).chain(x.iter().take(mid)).cloned())
}
