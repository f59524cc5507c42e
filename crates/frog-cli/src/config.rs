//! TOML configuration deserialisation for simulation jobs.

use anyhow::Context;
use serde::Deserialize;

use frog_core::constants::PhysicalConstants;
use frog_core::crystal::{CrystalKind, CrystalSpec};
use frog_core::engine::{GridSpec, SimulationInput};
use frog_core::gate::FrogMethod;
use frog_core::grid::DelaySpec;
use frog_core::pulse::{fwhm_to_sigma, PulseShape, PulseSpec};
use frog_core::spectral::{DispersionSpec, FilterKind, FilterSpec};

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub grid: GridConfig,
    pub pulse: PulseConfig,
    #[serde(default)]
    pub filter: Option<FilterConfig>,
    #[serde(default)]
    pub dispersion: Option<DispersionConfig>,
    #[serde(default)]
    pub crystal: Option<CrystalConfig>,
    /// Absent: delays reuse the time grid (rotation strategy). Present: an
    /// independent linear range (interpolation strategy).
    #[serde(default)]
    pub delays: Option<DelaysConfig>,
    pub trace: TraceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Time-grid parameters from TOML.
#[derive(Debug, Deserialize)]
pub struct GridConfig {
    pub samples: usize,
    pub window_fs: f64,
}

/// Pulse parameters from TOML.
#[derive(Debug, Deserialize)]
pub struct PulseConfig {
    /// "gaussian" or "chirped". Default: "gaussian".
    #[serde(default = "default_shape")]
    pub shape: String,
    /// Gaussian σ in fs. Exactly one of `duration_fs` / `fwhm_fs`.
    pub duration_fs: Option<f64>,
    /// Intensity FWHM in fs, converted to σ.
    pub fwhm_fs: Option<f64>,
    /// Temporal chirp rate (rad/fs²), used by shape = "chirped".
    #[serde(default)]
    pub chirp: f64,
    /// Temporal offset (fs).
    #[serde(default)]
    pub offset_fs: f64,
    /// Ride the field on the carrier exp(i·ω₀·t).
    #[serde(default)]
    pub carrier: bool,
    /// Carrier wavelength (nm). Default: 800.
    #[serde(default = "default_wavelength")]
    pub wavelength_nm: f64,
}

fn default_shape() -> String {
    "gaussian".into()
}
fn default_wavelength() -> f64 {
    800.0
}

/// Spectral filter parameters from TOML.
#[derive(Debug, Deserialize)]
pub struct FilterConfig {
    /// "low-pass" or "high-pass".
    pub kind: String,
    /// Cutoff in cyclic frequency units (1/fs).
    pub cutoff: f64,
}

/// Group-delay dispersion from TOML.
#[derive(Debug, Deserialize)]
pub struct DispersionConfig {
    pub gdd_fs2: f64,
}

/// Nonlinear crystal parameters from TOML.
#[derive(Debug, Deserialize)]
pub struct CrystalConfig {
    /// Preset identifier (BBO, KDP, LiNbO3, KTP); takes precedence over
    /// `deff_pm_v`.
    pub preset: Option<String>,
    /// Custom effective nonlinear coefficient (pm/V).
    pub deff_pm_v: Option<f64>,
    #[serde(default = "default_crystal_length")]
    pub length_mm: f64,
}

fn default_crystal_length() -> f64 {
    1.0
}

/// Independent delay range from TOML.
#[derive(Debug, Deserialize)]
pub struct DelaysConfig {
    /// [start, stop] in fs.
    pub range_fs: [f64; 2],
    pub count: usize,
}

/// Trace parameters from TOML.
#[derive(Debug, Deserialize)]
pub struct TraceConfig {
    /// "shg", "pg", or "xfrog".
    pub method: String,
    /// XFROG reference duration σ (fs); default: half the pulse duration.
    pub reference_duration_fs: Option<f64>,
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Whether to save the trace as CSV (default: true).
    #[serde(default = "default_true")]
    pub save_trace: bool,
    /// Whether to also save the trace as JSON (default: false).
    #[serde(default)]
    pub save_json: bool,
    /// Whether to save the processed field as CSV (default: true).
    #[serde(default = "default_true")]
    pub save_field: bool,
    /// Whether to save the field's power spectrum as CSV (default: false).
    #[serde(default)]
    pub save_spectrum: bool,
    /// Optional [ω_min, ω_max] crop (rad/fs) applied to the exports only.
    #[serde(default)]
    pub crop_rad_fs: Option<[f64; 2]>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_trace: true,
            save_json: false,
            save_field: true,
            save_spectrum: false,
            crop_rad_fs: None,
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}
fn default_true() -> bool {
    true
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
    let config: JobConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}

/// Translate a parsed job configuration into a core `SimulationInput`.
pub fn build_input(job: &JobConfig) -> anyhow::Result<SimulationInput> {
    let duration_fs = match (job.pulse.duration_fs, job.pulse.fwhm_fs) {
        (Some(sigma), None) => sigma,
        (None, Some(fwhm)) => fwhm_to_sigma(fwhm),
        (Some(_), Some(_)) => {
            anyhow::bail!("Pulse accepts either duration_fs or fwhm_fs, not both")
        }
        (None, None) => anyhow::bail!("Pulse needs duration_fs or fwhm_fs"),
    };

    let shape = match job.pulse.shape.as_str() {
        "gaussian" => PulseShape::Gaussian,
        "chirped" => PulseShape::Chirped {
            rate: job.pulse.chirp,
        },
        other => anyhow::bail!(
            "Unknown pulse shape '{}'. Valid shapes: gaussian, chirped",
            other
        ),
    };

    let method = match job.trace.method.as_str() {
        "shg" => FrogMethod::Shg,
        "pg" => FrogMethod::Pg,
        "xfrog" => FrogMethod::Xfrog,
        other => anyhow::bail!(
            "Unknown FROG method '{}'. Valid methods: shg, pg, xfrog",
            other
        ),
    };

    let filter = job
        .filter
        .as_ref()
        .map(|f| -> anyhow::Result<FilterSpec> {
            let kind = match f.kind.as_str() {
                "low-pass" => FilterKind::LowPass,
                "high-pass" => FilterKind::HighPass,
                other => anyhow::bail!(
                    "Unknown filter kind '{}'. Valid kinds: low-pass, high-pass",
                    other
                ),
            };
            Ok(FilterSpec {
                kind,
                cutoff: f.cutoff,
            })
        })
        .transpose()?;

    let crystal = job
        .crystal
        .as_ref()
        .map(|c| -> anyhow::Result<CrystalSpec> {
            let deff_pm_per_v = match (&c.preset, c.deff_pm_v) {
                (Some(name), _) => CrystalKind::from_name(name)
                    .with_context(|| {
                        format!(
                            "Unknown crystal preset '{}'. Valid presets: BBO, KDP, LiNbO3, KTP",
                            name
                        )
                    })?
                    .deff_pm_per_v(),
                (None, Some(deff)) => deff,
                (None, None) => anyhow::bail!("Crystal needs a preset or deff_pm_v"),
            };
            Ok(CrystalSpec {
                deff_pm_per_v,
                length_mm: c.length_mm,
            })
        })
        .transpose()?;

    let delays = match &job.delays {
        Some(d) => DelaySpec::Linear {
            start_fs: d.range_fs[0],
            stop_fs: d.range_fs[1],
            count: d.count,
        },
        None => DelaySpec::FromGrid,
    };

    Ok(SimulationInput {
        grid: GridSpec {
            samples: job.grid.samples,
            window_fs: job.grid.window_fs,
        },
        pulse: PulseSpec {
            shape,
            duration_fs,
            offset_fs: job.pulse.offset_fs,
            carrier: job.pulse.carrier,
        },
        constants: PhysicalConstants::with_wavelength(job.pulse.wavelength_nm),
        filter,
        dispersion: job
            .dispersion
            .as_ref()
            .map(|d| DispersionSpec { gdd_fs2: d.gdd_fs2 }),
        crystal,
        method,
        delays,
        reference_duration_fs: job.trace.reference_duration_fs,
    })
}
