use tracing::{debug, trace, warn};

use super::analysis::{self, Averages};
use super::lattice::Lattice;
use super::params::LatticeParams;
use crate::error::{IsingError, Result};
use crate::random::RandomSource;

/// Relative tolerance for the incremental-vs-recomputed Hamiltonian check.
pub const HAMILTONIAN_TOLERANCE: f64 = 1e-9;

/// Metropolis criterion: accept iff u < exp(-(E_new - E_old) / T).
///
/// Always consumes exactly one uniform draw, so a seeded source replays
/// the same trajectory.
#[inline]
pub fn acceptance<R: RandomSource + ?Sized>(
    energy_old: f64,
    energy_new: f64,
    temperature: f64,
    rng: &mut R,
) -> bool {
    rng.next_real() < (-(energy_new - energy_old) / temperature).exp()
}

/// (energy, magnetization) pairs, one per production phase.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSeries {
    energies: Vec<f64>,
    magnetizations: Vec<f64>,
}

impl SampleSeries {
    pub fn push(&mut self, energy: f64, magnetization: f64) {
        self.energies.push(energy);
        self.magnetizations.push(magnetization);
    }

    pub fn len(&self) -> usize {
        self.energies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }

    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    pub fn magnetizations(&self) -> &[f64] {
        &self.magnetizations
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.energies
            .iter()
            .copied()
            .zip(self.magnetizations.iter().copied())
    }

    fn clear(&mut self) {
        self.energies.clear();
        self.magnetizations.clear();
    }
}

/// Statistics for tracking Metropolis acceptance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveStatistics {
    pub attempted: u64,
    pub accepted: u64,
}

impl MoveStatistics {
    pub fn acceptance_rate(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            self.accepted as f64 / self.attempted as f64
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Metropolis loop over a lattice.
///
/// Owns the lattice and the single random source the whole simulation
/// draws from.
#[derive(Debug, Clone)]
pub struct MonteCarloDriver<R: RandomSource> {
    lattice: Lattice,
    rng: R,
    temperature: f64,
    series: SampleSeries,
    stats: MoveStatistics,
}

impl<R: RandomSource> MonteCarloDriver<R> {
    /// Set up a lattice from `params` using `rng`, then keep `rng` for the run.
    pub fn new(params: &LatticeParams, temperature: f64, mut rng: R) -> Result<Self> {
        let lattice = Lattice::setup(params, &mut rng)?;
        Self::with_lattice(lattice, temperature, rng)
    }

    pub fn with_lattice(lattice: Lattice, temperature: f64, rng: R) -> Result<Self> {
        validate_temperature(temperature)?;
        Ok(Self {
            lattice,
            rng,
            temperature,
            series: SampleSeries::default(),
            stats: MoveStatistics::default(),
        })
    }

    /// Perform exactly `steps` trial moves. Unless `equilibrating`, append one
    /// (H, M) sample after the last step.
    pub fn run(&mut self, steps: u64, equilibrating: bool) -> Result<()> {
        for _ in 0..steps {
            let energy_old = self.lattice.hamiltonian();
            self.lattice.flip(&mut self.rng);
            let energy_new = self.lattice.hamiltonian();

            self.stats.attempted += 1;
            if acceptance(energy_old, energy_new, self.temperature, &mut self.rng) {
                self.stats.accepted += 1;
            } else {
                self.lattice.flip_back()?;
                trace!("move rejected, H would have been {energy_new}");
            }
        }

        if !equilibrating {
            self.series
                .push(self.lattice.hamiltonian(), self.lattice.magnetization());
        }
        Ok(())
    }

    /// Drop all samples and recompute the Hamiltonian from scratch. Returns
    /// the drift the incremental value had accumulated.
    pub fn clear_records(&mut self) -> f64 {
        self.series.clear();
        self.stats.reset();

        let reference = self.lattice.hamiltonian();
        let drift = self.lattice.resync_hamiltonian();
        if drift.abs() > HAMILTONIAN_TOLERANCE * reference.abs().max(1.0) {
            warn!("Hamiltonian drifted by {drift:e} from its recomputed value");
        } else {
            debug!("records cleared, H = {}", self.lattice.hamiltonian());
        }
        drift
    }

    /// Reseed the spins with the lattice's configured pattern.
    pub fn reset_spins(&mut self) -> Result<()> {
        self.lattice.reset(&mut self.rng)
    }

    pub fn set_temperature(&mut self, temperature: f64) -> Result<()> {
        validate_temperature(temperature)?;
        self.temperature = temperature;
        Ok(())
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn series(&self) -> &SampleSeries {
        &self.series
    }

    pub fn stats(&self) -> MoveStatistics {
        self.stats
    }

    pub fn averages(&self) -> Option<Averages> {
        analysis::averages(&self.series, self.temperature, self.lattice.n_spins())
    }
}

fn validate_temperature(temperature: f64) -> Result<()> {
    if temperature > 0.0 && temperature.is_finite() {
        Ok(())
    } else {
        Err(IsingError::Configuration(format!(
            "temperature must be positive, got {temperature}"
        )))
    }
}
