//! Simulation runner and exporters for the presentation layer.
//!
//! The runner consumes the artifacts returned by `frog_core::engine::run`
//! read-only: every export is written straight from the returned arrays, and
//! the trace values are final squared-magnitude samples by the time they
//! arrive here.

use std::path::Path;

use anyhow::{Context, Result};
use ndarray::{Array1, Array2};
use serde::Serialize;

use frog_core::engine::{self, SimulationInput, SimulationOutput};
use frog_core::fourier::{self, Fourier};
use frog_core::grid::DelaySpec;
use frog_core::trace::{crop_frequency_band, FrequencyBand};

use crate::config::JobConfig;

/// Run a full simulation from a translated input, with progress reporting.
pub fn run_simulation(input: &SimulationInput) -> Result<SimulationOutput> {
    log::debug!("simulation input: {:?}", input);
    println!("  Method: {}", input.method.label());
    println!(
        "  Grid: {} samples over {} fs (Δt = {:.4} fs)",
        input.grid.samples,
        input.grid.window_fs,
        input.grid.window_fs / input.grid.samples.saturating_sub(1).max(1) as f64
    );
    match input.delays {
        DelaySpec::FromGrid => {
            println!("  Delays: {} (grid rotation)", input.grid.samples)
        }
        DelaySpec::Linear {
            start_fs,
            stop_fs,
            count,
        } => println!(
            "  Delays: {} over [{}, {}] fs (interpolation)",
            count, start_fs, stop_fs
        ),
    }

    let output = engine::run(input).context("Trace computation failed")?;

    println!(
        "  Trace: {} frequencies x {} delays",
        output.trace.n_frequencies(),
        output.trace.n_delays()
    );
    Ok(output)
}

/// The trace rows/axis actually exported: the crop band from the job
/// configuration when present, the full trace otherwise.
fn export_view(output: &SimulationOutput, job: &JobConfig) -> (Array1<f64>, Array2<f64>) {
    match job.output.crop_rad_fs {
        Some([omega_min, omega_max]) => {
            let band = FrequencyBand {
                omega_min,
                omega_max,
            };
            crop_frequency_band(&output.trace, &output.angular_frequencies, &band)
        }
        None => (
            output.angular_frequencies.clone(),
            output.trace.values.clone(),
        ),
    }
}

/// Write the trace to a CSV file with a metadata header.
///
/// Layout: one header row carrying the delay axis, then one row per
/// frequency bin with the axis value in the first column.
pub fn write_trace_csv(output: &SimulationOutput, path: &Path, job: &JobConfig) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::File::create(path)?;

    let (axis, values) = export_view(output, job);

    writeln!(file, "# Frogsim — FROG trace")?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(file, "# method: {}", job.trace.method)?;
    writeln!(
        file,
        "# grid: {} samples over {} fs",
        job.grid.samples, job.grid.window_fs
    )?;
    if let Some([omega_min, omega_max]) = job.output.crop_rad_fs {
        writeln!(file, "# crop: [{}, {}] rad/fs", omega_min, omega_max)?;
    }
    writeln!(file, "# rows: angular frequency (rad/fs), columns: delay (fs)")?;
    writeln!(file, "#")?;

    write!(file, "omega_rad_fs")?;
    for delay in output.delays.iter() {
        write!(file, ",{:.4}", delay)?;
    }
    writeln!(file)?;

    for (row, &omega) in axis.iter().enumerate() {
        write!(file, "{:.6}", omega)?;
        for value in values.row(row).iter() {
            write!(file, ",{:.6e}", value)?;
        }
        writeln!(file)?;
    }

    println!("Trace written to: {}", path.display());
    Ok(())
}

#[derive(Serialize)]
struct TraceExport<'a> {
    method: &'a str,
    delays_fs: Vec<f64>,
    omega_rad_fs: Vec<f64>,
    /// Row-major trace values, rows aligned with `omega_rad_fs`.
    values: Vec<Vec<f64>>,
}

/// Write the trace to a JSON file.
pub fn write_trace_json(output: &SimulationOutput, path: &Path, job: &JobConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let (axis, values) = export_view(output, job);
    let export = TraceExport {
        method: &job.trace.method,
        delays_fs: output.delays.to_vec(),
        omega_rad_fs: axis.to_vec(),
        values: values.rows().into_iter().map(|r| r.to_vec()).collect(),
    };
    let json = serde_json::to_string_pretty(&export)
        .map_err(|e| anyhow::anyhow!("JSON serialisation error: {}", e))?;
    std::fs::write(path, json)?;

    println!("Trace (JSON) written to: {}", path.display());
    Ok(())
}

/// Write the processed time-domain field to a CSV file.
pub fn write_field_csv(output: &SimulationOutput, path: &Path) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::File::create(path)?;

    writeln!(file, "# Frogsim — processed time-domain field")?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(file, "#")?;
    writeln!(file, "t_fs,intensity,phase_rad")?;

    for (&t, e) in output.time.iter().zip(output.field.iter()) {
        writeln!(file, "{:.4},{:.6e},{:.6}", t, e.norm_sqr(), e.arg())?;
    }

    println!("Field written to: {}", path.display());
    Ok(())
}

/// Write the processed field's power spectrum to a CSV file.
pub fn write_spectrum_csv(output: &SimulationOutput, path: &Path) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::File::create(path)?;

    let fourier = Fourier::new(output.field.len());
    let spectrum = fourier::fftshift(&fourier.forward(&output.field));

    writeln!(file, "# Frogsim — field power spectrum")?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(file, "#")?;
    writeln!(file, "omega_rad_fs,power,phase_rad")?;

    for (&omega, v) in output.angular_frequencies.iter().zip(spectrum.iter()) {
        writeln!(file, "{:.6},{:.6e},{:.6}", omega, v.norm_sqr(), v.arg())?;
    }

    println!("Spectrum written to: {}", path.display());
    Ok(())
}
