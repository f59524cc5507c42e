//! Delay-gated spectrogram assembly and frequency-band cropping.

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::fourier::{self, Fourier};
use crate::gate::{self, FrogMethod};
use crate::grid::{DelaySet, TimeGrid};

/// A FROG trace: spectral power versus relative delay.
///
/// Rows are indexed by the centered frequency axis, columns by the delay set.
/// Every entry is a squared magnitude and therefore non-negative. Built once
/// per run and never mutated afterward; [`crop_frequency_band`] produces
/// read-only sub-selections for presentation.
#[derive(Debug, Clone)]
pub struct FrogTrace {
    /// Trace values, shape (n_frequencies, n_delays).
    pub values: Array2<f64>,
}

impl FrogTrace {
    pub fn n_frequencies(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_delays(&self) -> usize {
        self.values.ncols()
    }
}

/// Assemble the trace: one spectral-power column per delay.
///
/// Each column is the centered power spectrum of the product signal
/// field · gate at that delay. Columns have no cross-dependency, so the loop
/// fans out over worker threads, each producing a disjoint column; the final
/// collect is the join point before the trace is handed back.
pub fn assemble(
    fourier: &Fourier,
    grid: &TimeGrid,
    field: &Array1<Complex64>,
    source: &Array1<Complex64>,
    method: FrogMethod,
    delays: &DelaySet,
) -> FrogTrace {
    let n = grid.len();
    let entries: Vec<(usize, f64)> = delays.values().iter().copied().enumerate().collect();

    let columns: Vec<Vec<f64>> = entries
        .into_par_iter()
        .map(|(index, delay_fs)| {
            let gate =
                gate::gate_for_delay(grid, source, method, delays.strategy(), index, delay_fs);
            let signal = field * &gate;
            let spectrum = fourier::fftshift(&fourier.forward(&signal));
            spectrum.iter().map(|v| v.norm_sqr()).collect()
        })
        .collect();

    let mut values = Array2::zeros((n, columns.len()));
    for (j, column) in columns.iter().enumerate() {
        for (k, &v) in column.iter().enumerate() {
            values[[k, j]] = v;
        }
    }
    FrogTrace { values }
}

/// Angular-frequency band for presentation-side cropping (rad/fs).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FrequencyBand {
    pub omega_min: f64,
    pub omega_max: f64,
}

/// Restrict a trace to the rows whose axis value falls inside `band`.
///
/// Returns the cropped axis and a copied sub-trace; the input trace is left
/// untouched. The mask uses the same centered axis the assembler used for the
/// rows, so row/axis pairing is preserved.
pub fn crop_frequency_band(
    trace: &FrogTrace,
    angular_frequencies: &Array1<f64>,
    band: &FrequencyBand,
) -> (Array1<f64>, Array2<f64>) {
    let keep: Vec<usize> = angular_frequencies
        .iter()
        .enumerate()
        .filter(|&(_, &w)| w >= band.omega_min && w <= band.omega_max)
        .map(|(k, _)| k)
        .collect();

    let axis = Array1::from_iter(keep.iter().map(|&k| angular_frequencies[k]));
    let mut values = Array2::zeros((keep.len(), trace.n_delays()));
    for (row, &k) in keep.iter().enumerate() {
        values.row_mut(row).assign(&trace.values.row(k));
    }
    (axis, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PhysicalConstants;
    use crate::grid::DelaySpec;
    use crate::pulse::{self, PulseShape, PulseSpec};
    use approx::assert_relative_eq;

    fn small_setup() -> (TimeGrid, Fourier, Array1<Complex64>) {
        let grid = TimeGrid::centered(32, 60.0).unwrap();
        let fourier = Fourier::new(32);
        let spec = PulseSpec {
            shape: PulseShape::Gaussian,
            duration_fs: 8.0,
            offset_fs: 0.0,
            carrier: false,
        };
        let field = pulse::synthesize(&grid, &spec, &PhysicalConstants::default()).unwrap();
        (grid, fourier, field)
    }

    #[test]
    fn test_trace_shape_and_non_negativity() {
        let (grid, fourier, field) = small_setup();
        let delays = DelaySet::build(&DelaySpec::FromGrid, &grid).unwrap();
        let trace = assemble(&fourier, &grid, &field, &field, FrogMethod::Shg, &delays);
        assert_eq!(trace.n_frequencies(), 32);
        assert_eq!(trace.n_delays(), 32);
        assert!(trace.values.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_assembly_is_deterministic_across_runs() {
        // Exercises the parallel column fill: two runs must agree bit-exactly.
        let (grid, fourier, field) = small_setup();
        let delays = DelaySet::build(
            &DelaySpec::Linear {
                start_fs: -20.0,
                stop_fs: 20.0,
                count: 17,
            },
            &grid,
        )
        .unwrap();
        let a = assemble(&fourier, &grid, &field, &field, FrogMethod::Pg, &delays);
        let b = assemble(&fourier, &grid, &field, &field, FrogMethod::Pg, &delays);
        assert_eq!(a.values, b.values);
    }

    #[test]
    fn test_crop_keeps_rows_aligned_with_axis() {
        let (grid, fourier, field) = small_setup();
        let delays = DelaySet::build(&DelaySpec::FromGrid, &grid).unwrap();
        let trace = assemble(&fourier, &grid, &field, &field, FrogMethod::Shg, &delays);
        let angular = grid.angular_frequencies();
        let band = FrequencyBand {
            omega_min: -0.5,
            omega_max: 0.5,
        };
        let (axis, cropped) = crop_frequency_band(&trace, &angular, &band);
        assert_eq!(axis.len(), cropped.nrows());
        assert!(axis.iter().all(|&w| (-0.5..=0.5).contains(&w)));
        for (row, &w) in axis.iter().enumerate() {
            let full_row = angular.iter().position(|&a| a == w).unwrap();
            for j in 0..trace.n_delays() {
                assert_relative_eq!(cropped[[row, j]], trace.values[[full_row, j]]);
            }
        }
    }
}
