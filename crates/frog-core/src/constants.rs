//! Physical constants for carrier-frequency bookkeeping.
//!
//! These are an explicit immutable value passed into the field synthesizer and
//! spectral processor, so independent simulation runs (including parallel
//! workers) cannot observe cross-run mutation of shared globals.

use serde::{Deserialize, Serialize};

/// Immutable physical constants for one simulation run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PhysicalConstants {
    /// Speed of light (nm/fs).
    pub c_nm_per_fs: f64,
    /// Reference (carrier) wavelength (nm).
    pub lambda0_nm: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            c_nm_per_fs: 299.792458,
            lambda0_nm: 800.0,
        }
    }
}

impl PhysicalConstants {
    /// Constants for a given carrier wavelength (nm).
    pub fn with_wavelength(lambda0_nm: f64) -> Self {
        Self {
            lambda0_nm,
            ..Self::default()
        }
    }

    /// Carrier angular frequency $\omega_0 = 2\pi c / \lambda_0$ (rad/fs).
    pub fn carrier_omega(&self) -> f64 {
        2.0 * std::f64::consts::PI * self.c_nm_per_fs / self.lambda0_nm
    }
}
