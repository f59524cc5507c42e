//! Toy nonlinear-crystal response and SHG crystal presets.
//!
//! The interaction model is the lowest-order instantaneous response of the
//! reference behavior: a quadratic term added to the fundamental in the time
//! domain. It makes no attempt at slowly-varying-envelope propagation or
//! phase matching; its only contract is determinism given the same field and
//! parameters.

use ndarray::Array1;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Built-in SHG crystals with effective nonlinear coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrystalKind {
    Bbo,
    Kdp,
    LiNbO3,
    Ktp,
}

impl CrystalKind {
    /// All presets, for listings.
    pub const ALL: &'static [CrystalKind] = &[
        CrystalKind::Bbo,
        CrystalKind::Kdp,
        CrystalKind::LiNbO3,
        CrystalKind::Ktp,
    ];

    /// Effective nonlinear coefficient d_eff (pm/V).
    pub fn deff_pm_per_v(&self) -> f64 {
        match self {
            CrystalKind::Bbo => 2.0,
            CrystalKind::Kdp => 0.4,
            CrystalKind::LiNbO3 => 27.0,
            CrystalKind::Ktp => 3.4,
        }
    }

    /// Type-I phase-matching angle (degrees). Listed for reference only; the
    /// toy interaction model does not use it.
    pub fn phase_matching_angle_deg(&self) -> f64 {
        match self {
            CrystalKind::Bbo => 22.9,
            CrystalKind::Kdp => 47.7,
            CrystalKind::LiNbO3 => 36.0,
            CrystalKind::Ktp => 0.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CrystalKind::Bbo => "BBO",
            CrystalKind::Kdp => "KDP",
            CrystalKind::LiNbO3 => "LiNbO3",
            CrystalKind::Ktp => "KTP",
        }
    }

    /// Resolve a preset by its identifier.
    pub fn from_name(name: &str) -> Option<CrystalKind> {
        Self::ALL.iter().copied().find(|k| k.label() == name)
    }
}

/// Crystal interaction parameters for the nonlinear step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CrystalSpec {
    /// Effective nonlinear coefficient (pm/V).
    pub deff_pm_per_v: f64,
    /// Crystal length (mm); converted to meters inside the interaction step.
    pub length_mm: f64,
}

impl CrystalSpec {
    /// Parameters from a preset crystal and a length in mm.
    pub fn preset(kind: CrystalKind, length_mm: f64) -> Self {
        Self {
            deff_pm_per_v: kind.deff_pm_per_v(),
            length_mm,
        }
    }
}

/// Add the instantaneous nonlinear response to the field:
/// $E \mapsto E + d_\text{eff} E^2 L$ with $L$ in meters.
pub fn apply(field: &Array1<Complex64>, crystal: &CrystalSpec) -> Array1<Complex64> {
    let length_m = crystal.length_mm * 1e-3;
    field.mapv(|e| e + crystal.deff_pm_per_v * e * e * length_m)
}
