//! Move-generation strategies for the two ensembles.
//!
//! The lattice never branches on its ensemble itself; it asks the active
//! [`Ensemble`] for moves, local energies and seeding.

use std::f64::consts::PI;
use std::fmt;
use std::iter;

use super::lattice::{Lattice, DOWN, UP};
use super::params::{EnsembleKind, LatticeParams};
use crate::error::{IsingError, Result};
use crate::random::RandomSource;

/// The last perturbation applied by `Lattice::flip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    SingleFlip(usize),
    ExchangePair(usize, usize),
}

impl Move {
    /// Indices of the spins touched by this move.
    pub fn sites(&self) -> impl Iterator<Item = usize> {
        let (first, second) = match *self {
            Move::SingleFlip(i) => (i, None),
            Move::ExchangePair(a, b) => (a, Some(b)),
        };
        iter::once(first).chain(second)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::SingleFlip(i) => write!(f, "flip({i})"),
            Move::ExchangePair(a, b) => write!(f, "exchange({a}, {b})"),
        }
    }
}

pub trait Ensemble: fmt::Debug + Sync {
    fn kind(&self) -> EnsembleKind;

    /// Whether the ensemble can run with external field `field`.
    fn validate_field(&self, field: f64) -> bool;

    /// Reject parameter sets this ensemble cannot simulate.
    fn validate(&self, params: &LatticeParams) -> Result<()>;

    /// Draw the next trial move. May loop until a valid move is found.
    fn generate_move(&self, lattice: &Lattice, rng: &mut dyn RandomSource) -> Move;

    /// Energy of spin `index` that enters the move's ΔH.
    fn local_energy(&self, lattice: &Lattice, index: usize) -> f64;

    /// Assign fresh random spin types.
    fn seed_spins(&self, lattice: &mut Lattice, rng: &mut dyn RandomSource) -> Result<()>;

    /// Seed a sinusoidal down-spin profile with wavenumber `k`.
    fn seed_cosine(
        &self,
        _lattice: &mut Lattice,
        _k: f64,
        _rng: &mut dyn RandomSource,
    ) -> Result<()> {
        Err(IsingError::UnsupportedMode {
            ensemble: self.kind().name(),
            operation: "cosine-pattern seeding",
        })
    }
}

impl EnsembleKind {
    pub fn strategy(self) -> &'static dyn Ensemble {
        match self {
            EnsembleKind::Free => &FreeEnsemble,
            EnsembleKind::Constrained => &ConstrainedEnsemble,
        }
    }
}

/// Single-spin-flip dynamics.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeEnsemble;

impl Ensemble for FreeEnsemble {
    fn kind(&self) -> EnsembleKind {
        EnsembleKind::Free
    }

    fn validate_field(&self, field: f64) -> bool {
        field.is_finite()
    }

    fn validate(&self, params: &LatticeParams) -> Result<()> {
        if !self.validate_field(params.field) {
            return Err(IsingError::Configuration(format!(
                "external field must be finite, got {}",
                params.field
            )));
        }
        Ok(())
    }

    fn generate_move(&self, lattice: &Lattice, rng: &mut dyn RandomSource) -> Move {
        Move::SingleFlip(rng.next_int(0, lattice.n_spins() - 1))
    }

    fn local_energy(&self, lattice: &Lattice, index: usize) -> f64 {
        lattice.local_energy_interaction(index) + lattice.local_energy_magnetic(index)
    }

    fn seed_spins(&self, lattice: &mut Lattice, rng: &mut dyn RandomSource) -> Result<()> {
        for i in 0..lattice.n_spins() {
            let spin = if rng.next_int(0, 1) == 1 { UP } else { DOWN };
            lattice.set_spin_type(i, spin);
        }
        Ok(())
    }
}

/// Magnetization-conserving pair-exchange dynamics.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstrainedEnsemble;

impl ConstrainedEnsemble {
    /// Number of down spins produced by ratio seeding.
    pub fn target_down_spins(ratio: f64, n_spins: usize) -> usize {
        (ratio * n_spins as f64).round() as usize
    }

    /// Down-spin count for each row of the cosine pattern.
    ///
    /// n_i = round(W * (cos(k * 2π / rows * (i + 0.5)) + 1) / 2)
    pub fn cosine_profile(k: f64, width: usize, rows: usize) -> Vec<usize> {
        (0..rows)
            .map(|i| {
                let phase = k * (2.0 * PI / rows as f64) * (i as f64 + 0.5);
                let n = (width as f64 * (phase.cos() + 1.0) / 2.0).round() as usize;
                n.min(width)
            })
            .collect()
    }

    fn require_exchangeable(down: usize, n_spins: usize) -> Result<()> {
        if down == 0 || down >= n_spins {
            return Err(IsingError::Configuration(format!(
                "seeding yields {down} down spins out of {n_spins}; \
                 a uniform lattice has no exchange move"
            )));
        }
        Ok(())
    }
}

impl Ensemble for ConstrainedEnsemble {
    fn kind(&self) -> EnsembleKind {
        EnsembleKind::Constrained
    }

    fn validate_field(&self, field: f64) -> bool {
        field == 0.0
    }

    fn validate(&self, params: &LatticeParams) -> Result<()> {
        let n = params.n_spins();
        if params.width % 2 != 0 || params.height % 2 != 0 {
            return Err(IsingError::Configuration(format!(
                "constrained ensemble needs even width and height, got {}x{}",
                params.width, params.height
            )));
        }
        if !self.validate_field(params.field) {
            return Err(IsingError::Configuration(format!(
                "constrained ensemble needs zero external field, got {}",
                params.field
            )));
        }
        if !(params.ratio > 0.0 && params.ratio < 1.0) {
            return Err(IsingError::Configuration(format!(
                "down-spin ratio must lie in (0, 1), got {}",
                params.ratio
            )));
        }
        if params.wavelength.is_none() {
            Self::require_exchangeable(Self::target_down_spins(params.ratio, n), n)?;
        }
        Ok(())
    }

    fn generate_move(&self, lattice: &Lattice, rng: &mut dyn RandomSource) -> Move {
        let last = lattice.n_spins() - 1;
        let a = loop {
            let candidate = rng.next_int(0, last);
            if lattice.has_opposite_neighbor(candidate) {
                break candidate;
            }
        };
        let neighbors = lattice.neighbors(a);
        let b = loop {
            let candidate = neighbors[rng.next_int(0, neighbors.len() - 1)];
            if lattice.spin_type(candidate) != lattice.spin_type(a) {
                break candidate;
            }
        };
        Move::ExchangePair(a, b)
    }

    // B = 0 is enforced at setup, so the magnetic term is identically zero.
    fn local_energy(&self, lattice: &Lattice, index: usize) -> f64 {
        lattice.local_energy_interaction(index)
    }

    fn seed_spins(&self, lattice: &mut Lattice, rng: &mut dyn RandomSource) -> Result<()> {
        let n = lattice.n_spins();
        let target = Self::target_down_spins(lattice.ratio(), n);
        Self::require_exchangeable(target, n)?;

        lattice.fill(UP);
        let mut placed = 0;
        while placed < target {
            let i = rng.next_int(0, n - 1);
            if lattice.spin_type(i) == UP {
                lattice.set_spin_type(i, DOWN);
                placed += 1;
            }
        }
        Ok(())
    }

    fn seed_cosine(&self, lattice: &mut Lattice, k: f64, rng: &mut dyn RandomSource) -> Result<()> {
        let width = lattice.width();
        let profile = Self::cosine_profile(k, width, lattice.height());
        Self::require_exchangeable(profile.iter().sum(), lattice.n_spins())?;

        lattice.fill(UP);
        for (row, &down) in profile.iter().enumerate() {
            let start = row * width;
            let mut placed = 0;
            while placed < down {
                let i = rng.next_int(start, start + width - 1);
                if lattice.spin_type(i) == UP {
                    lattice.set_spin_type(i, DOWN);
                    placed += 1;
                }
            }
        }
        Ok(())
    }
}
