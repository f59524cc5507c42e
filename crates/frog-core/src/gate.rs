//! Delay-gate construction for the three FROG variants.
//!
//! Two mutually exclusive delay strategies exist, selected by how the delay
//! axis was configured (see [`crate::grid::DelaySpec`]):
//!
//! - **Rotation**: the discretized source is treated as a circular buffer and
//!   rotated by (i − N/2) positions for delay index i, wrapping at the ends.
//!   The periodic boundary aliases energy from one edge to the other at large
//!   delays; that approximation is part of the modeled behavior and is kept
//!   as-is.
//! - **Interpolation**: the source is reconstructed at t − delay by piecewise-
//!   linear interpolation of the real and imaginary parts independently, with
//!   out-of-domain queries returning exactly zero.
//!
//! The gate content depends on the method: SHG gates against the delayed
//! field itself, PG against the delayed intensity |E|², and XFROG against a
//! delayed independent reference pulse.

use ndarray::Array1;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::grid::{DelayStrategy, TimeGrid};

/// FROG measurement variant, selecting the gate-construction rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrogMethod {
    /// Second-harmonic-generation FROG: gate = delayed field.
    Shg,
    /// Polarization-gating FROG: gate = delayed intensity.
    Pg,
    /// Cross-correlation FROG: gate = delayed reference pulse.
    Xfrog,
}

impl FrogMethod {
    pub fn label(&self) -> &'static str {
        match self {
            FrogMethod::Shg => "SHG-FROG",
            FrogMethod::Pg => "PG-FROG",
            FrogMethod::Xfrog => "XFROG",
        }
    }
}

/// Rotate `source` by `shift` positions with wrap-around. Positive shifts
/// move samples toward higher indices.
pub fn rotate(source: &Array1<Complex64>, shift: i64) -> Array1<Complex64> {
    let n = source.len() as i64;
    Array1::from_iter((0..n).map(|j| source[(((j - shift) % n + n) % n) as usize]))
}

/// Sample `source` at t − `delay_fs` by piecewise-linear interpolation of the
/// real and imaginary parts, with zero fill outside the grid (no
/// extrapolation).
pub fn sample_delayed(
    grid: &TimeGrid,
    source: &Array1<Complex64>,
    delay_fs: f64,
) -> Array1<Complex64> {
    let n = source.len();
    let t0 = grid.samples()[0];
    let t_end = grid.samples()[n - 1];
    let dt = grid.dt();
    Array1::from_iter(grid.samples().iter().map(|&t| {
        let query = t - delay_fs;
        // The domain check runs on time values, so an on-grid query is never
        // lost to rounding in the index arithmetic below.
        if query < t0 || query > t_end {
            return Complex64::new(0.0, 0.0);
        }
        let pos = ((query - t0) / dt).max(0.0);
        let i0 = pos.floor() as usize;
        if i0 >= n - 1 {
            return source[n - 1];
        }
        let frac = pos - i0 as f64;
        Complex64::new(
            source[i0].re + frac * (source[i0 + 1].re - source[i0].re),
            source[i0].im + frac * (source[i0 + 1].im - source[i0].im),
        )
    }))
}

/// Build the gate for one delay according to method and strategy.
///
/// `index` is the delay's position on the delay axis (used by the rotation
/// strategy, where the shift is index − N/2); `delay_fs` is its value in fs
/// (used by the interpolation strategy).
///
/// Rotation commutes with the pointwise magnitude, so PG squares after
/// delaying under either strategy.
pub fn gate_for_delay(
    grid: &TimeGrid,
    source: &Array1<Complex64>,
    method: FrogMethod,
    strategy: DelayStrategy,
    index: usize,
    delay_fs: f64,
) -> Array1<Complex64> {
    let delayed = match strategy {
        DelayStrategy::Rotation => {
            let shift = index as i64 - (grid.len() / 2) as i64;
            rotate(source, shift)
        }
        DelayStrategy::Interpolation => sample_delayed(grid, source, delay_fs),
    };
    match method {
        FrogMethod::Pg => delayed.mapv(|g| Complex64::from(g.norm_sqr())),
        FrogMethod::Shg | FrogMethod::Xfrog => delayed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn complex_ramp(n: usize) -> Array1<Complex64> {
        Array1::from_iter((0..n).map(|k| Complex64::new(k as f64, -(k as f64) * 0.5)))
    }

    #[test]
    fn test_rotate_by_zero_is_identity() {
        let source = complex_ramp(8);
        assert_eq!(rotate(&source, 0), source);
    }

    #[test]
    fn test_rotate_moves_samples_toward_higher_indices() {
        let source = complex_ramp(4);
        let rotated = rotate(&source, 1);
        let expected = [3.0, 0.0, 1.0, 2.0];
        for (got, want) in rotated.iter().zip(expected) {
            assert_relative_eq!(got.re, want);
        }
    }

    #[test]
    fn rotation_gate_wraps_at_grid_edges() {
        // Periodic boundary: energy pushed past one edge reappears at the
        // other. This aliasing is intentional behavior of the rotation
        // strategy, not a defect.
        let mut source = Array1::from_elem(8, Complex64::new(0.0, 0.0));
        source[0] = Complex64::new(1.0, 0.0);
        let rotated = rotate(&source, -1);
        assert_relative_eq!(rotated[7].re, 1.0);
        assert_relative_eq!(rotated[0].re, 0.0);

        let full_turn = rotate(&source, 8);
        assert_eq!(full_turn, source);
    }

    #[test]
    fn test_sample_delayed_at_grid_multiples_matches_shifted_samples() {
        let grid = TimeGrid::centered(9, 8.0).unwrap();
        // dt = 1 fs; a delay of exactly 2 samples
        let source = complex_ramp(9);
        let delayed = sample_delayed(&grid, &source, 2.0);
        for (j, v) in delayed.iter().enumerate() {
            if j < 2 {
                assert_eq!(*v, Complex64::new(0.0, 0.0));
            } else {
                assert_relative_eq!(v.re, source[j - 2].re, epsilon = 1e-12);
                assert_relative_eq!(v.im, source[j - 2].im, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_sample_delayed_interpolates_between_samples() {
        let grid = TimeGrid::centered(9, 8.0).unwrap();
        let source = complex_ramp(9);
        let delayed = sample_delayed(&grid, &source, 0.5);
        // A linear ramp sampled half a step back is the midpoint value
        assert_relative_eq!(delayed[4].re, 3.5, epsilon = 1e-12);
        assert_relative_eq!(delayed[4].im, -1.75, epsilon = 1e-12);
    }

    #[test]
    fn test_sample_delayed_beyond_window_is_exactly_zero() {
        let grid = TimeGrid::centered(64, 90.0).unwrap();
        let source = Array1::from_elem(64, Complex64::new(1.0, 1.0));
        for delay in [500.0, -500.0] {
            let delayed = sample_delayed(&grid, &source, delay);
            assert!(delayed.iter().all(|v| v.re == 0.0 && v.im == 0.0));
        }
    }

    #[test]
    fn test_pg_gate_is_real_and_non_negative() {
        let grid = TimeGrid::centered(16, 15.0).unwrap();
        let source = complex_ramp(16);
        let gate = gate_for_delay(&grid, &source, FrogMethod::Pg, DelayStrategy::Rotation, 5, 0.0);
        for v in gate.iter() {
            assert_abs_diff_eq!(v.im, 0.0);
            assert!(v.re >= 0.0);
        }
    }

    #[test]
    fn test_shg_gate_passes_the_delayed_field_through() {
        let grid = TimeGrid::centered(16, 15.0).unwrap();
        let source = complex_ramp(16);
        let gate = gate_for_delay(&grid, &source, FrogMethod::Shg, DelayStrategy::Rotation, 9, 0.0);
        assert_eq!(gate, rotate(&source, 1));
    }
}
