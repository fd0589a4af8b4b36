use serde::{Deserialize, Serialize};
use std::fmt;

/// Move-generation regime of the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnsembleKind {
    /// Single-spin-flip dynamics, magnetization not conserved.
    Free,
    /// Pair-exchange dynamics, magnetization conserved. Requires B = 0.
    Constrained,
}

impl EnsembleKind {
    pub fn name(&self) -> &'static str {
        match self {
            EnsembleKind::Free => "free",
            EnsembleKind::Constrained => "constrained",
        }
    }
}

impl fmt::Display for EnsembleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Finalized parameter set a lattice is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeParams {
    pub width: usize,
    pub height: usize,
    /// Coupling constant J
    pub coupling: f64,
    /// External magnetic field B
    pub field: f64,
    pub ensemble: EnsembleKind,
    /// Fraction of down spins for constrained seeding, in (0, 1)
    pub ratio: f64,
    /// Cosine-pattern wavenumber k for constrained seeding
    pub wavelength: Option<f64>,
}

impl LatticeParams {
    /// Free-ensemble parameters with J = 1 and no field.
    pub fn free(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            coupling: 1.0,
            field: 0.0,
            ensemble: EnsembleKind::Free,
            ratio: 0.5,
            wavelength: None,
        }
    }

    /// Constrained-ensemble parameters with J = 1 and ratio 0.5.
    pub fn constrained(width: usize, height: usize) -> Self {
        Self {
            ensemble: EnsembleKind::Constrained,
            ..Self::free(width, height)
        }
    }

    pub fn with_coupling(mut self, coupling: f64) -> Self {
        self.coupling = coupling;
        self
    }

    pub fn with_field(mut self, field: f64) -> Self {
        self.field = field;
        self
    }

    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = ratio;
        self
    }

    pub fn with_wavelength(mut self, wavelength: f64) -> Self {
        self.wavelength = Some(wavelength);
        self
    }

    pub fn n_spins(&self) -> usize {
        self.width * self.height
    }
}
