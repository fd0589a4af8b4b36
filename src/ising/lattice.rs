use nalgebra::Vector2;
use std::fmt;
use tracing::{debug, trace};

use super::correlation::CorrelationAnalyzer;
use super::ensemble::Move;
use super::params::{EnsembleKind, LatticeParams};
use crate::error::{IsingError, Result};
use crate::histogram::Histogram;
use crate::random::RandomSource;

pub const UP: i8 = 1;
pub const DOWN: i8 = -1;

/// One lattice site.
///
/// Neighbors are indices into the owning lattice's spin array, ordered
/// up, right, down, left, and never change after setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spin {
    id: usize,
    spin_type: i8,
    neighbors: [usize; 4],
}

impl Spin {
    pub fn id(&self) -> usize {
        self.id
    }

    /// +1 or -1
    pub fn spin_type(&self) -> i8 {
        self.spin_type
    }

    pub fn neighbors(&self) -> &[usize; 4] {
        &self.neighbors
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingMove {
    mv: Move,
    hamiltonian_before: f64,
    delta: f64,
}

/// 2D nearest-neighbor Ising lattice on a W×H torus.
///
/// Spins are stored in row-major order. The total Hamiltonian is maintained
/// incrementally by `flip`/`flip_back` and must always agree with
/// `compute_hamiltonian` up to floating-point rounding.
#[derive(Debug, Clone)]
pub struct Lattice {
    width: usize,
    height: usize,
    coupling: f64,
    field: f64,
    ensemble: EnsembleKind,
    ratio: f64,
    wavelength: Option<f64>,
    spins: Vec<Spin>,
    hamiltonian: f64,
    last_move: Option<PendingMove>,
}

impl Lattice {
    /// Validate `params`, wire the torus, seed the spins and compute the
    /// initial Hamiltonian.
    pub fn setup<R: RandomSource>(params: &LatticeParams, rng: &mut R) -> Result<Self> {
        if params.width == 0 || params.height == 0 {
            return Err(IsingError::Configuration(format!(
                "lattice dimensions must be positive, got {}x{}",
                params.width, params.height
            )));
        }
        if !params.coupling.is_finite() {
            return Err(IsingError::Configuration(format!(
                "coupling must be finite, got {}",
                params.coupling
            )));
        }
        params.ensemble.strategy().validate(params)?;

        let mut lattice = Self {
            width: params.width,
            height: params.height,
            coupling: params.coupling,
            field: params.field,
            ensemble: params.ensemble,
            ratio: params.ratio,
            wavelength: params.wavelength,
            spins: build_torus(params.width, params.height),
            hamiltonian: 0.0,
            last_move: None,
        };
        lattice.reset(rng)?;

        debug!(
            "lattice setup: {}x{} {} ensemble, J = {}, B = {}, H = {}",
            lattice.width, lattice.height, lattice.ensemble, lattice.coupling, lattice.field,
            lattice.hamiltonian
        );
        Ok(lattice)
    }

    /// Reseed with the configured pattern: cosine if a wavelength was given,
    /// random otherwise.
    pub fn reset<R: RandomSource>(&mut self, rng: &mut R) -> Result<()> {
        match self.wavelength {
            Some(k) => self.reset_spins_cosine(k, rng),
            None => self.reset_spins(rng),
        }
    }

    /// Random seeding: fair coin per spin (free) or exactly
    /// `round(ratio * N)` down spins (constrained).
    pub fn reset_spins<R: RandomSource>(&mut self, rng: &mut R) -> Result<()> {
        self.ensemble.strategy().seed_spins(self, rng)?;
        self.after_reseed();
        debug!("spins reset randomly, H = {}", self.hamiltonian);
        Ok(())
    }

    /// Sinusoidal down-spin profile along the rows. Constrained only.
    pub fn reset_spins_cosine<R: RandomSource>(&mut self, k: f64, rng: &mut R) -> Result<()> {
        self.ensemble.strategy().seed_cosine(self, k, rng)?;
        self.after_reseed();
        debug!(
            "spins reset with cos({k} y) pattern, {} down spins, H = {}",
            self.down_spin_count(),
            self.hamiltonian
        );
        Ok(())
    }

    fn after_reseed(&mut self) {
        self.last_move = None;
        self.hamiltonian = self.compute_hamiltonian();
    }

    /// -J * s_i * (sum of neighbor spins)
    ///
    /// On a lattice one site wide (or high) the wrap links a spin to itself;
    /// such self-links are not bonds and are skipped.
    #[inline]
    pub fn local_energy_interaction(&self, index: usize) -> f64 {
        let spin = &self.spins[index];
        let sum: i32 = spin
            .neighbors
            .iter()
            .filter(|&&n| n != index)
            .map(|&n| self.spins[n].spin_type as i32)
            .sum();
        -self.coupling * (spin.spin_type as i32 * sum) as f64
    }

    /// -B * s_i
    #[inline]
    pub fn local_energy_magnetic(&self, index: usize) -> f64 {
        -self.field * self.spins[index].spin_type as f64
    }

    /// Full O(N) recomputation. Each bond is seen from both ends, hence /2.
    pub fn compute_hamiltonian(&self) -> f64 {
        (0..self.spins.len())
            .map(|i| self.local_energy_interaction(i) / 2.0 + self.local_energy_magnetic(i))
            .sum()
    }

    /// Replace the running Hamiltonian with a fresh recomputation and return
    /// the drift that had accumulated.
    pub fn resync_hamiltonian(&mut self) -> f64 {
        let exact = self.compute_hamiltonian();
        let drift = self.hamiltonian - exact;
        self.hamiltonian = exact;
        drift
    }

    /// Propose and apply one move, updating the Hamiltonian. Returns ΔH.
    pub fn flip<R: RandomSource>(&mut self, rng: &mut R) -> f64 {
        self.last_move = None;
        let ensemble = self.ensemble.strategy();

        let mv = ensemble.generate_move(self, rng);
        let before = self.move_energy(&mv);
        self.apply(&mv);
        let after = self.move_energy(&mv);

        let delta = after - before;
        let hamiltonian_before = self.hamiltonian;
        self.hamiltonian += delta;
        self.last_move = Some(PendingMove {
            mv,
            hamiltonian_before,
            delta,
        });

        trace!("{mv}: dH = {delta}");
        delta
    }

    /// Undo the pending move. Fails if there is none; the lattice is then
    /// left untouched.
    pub fn flip_back(&mut self) -> Result<()> {
        let pending = self
            .last_move
            .take()
            .ok_or_else(|| IsingError::InvalidMove("no pending move to undo".to_string()))?;

        let before = self.move_energy(&pending.mv);
        self.apply(&pending.mv);
        let after = self.move_energy(&pending.mv);
        let delta = after - before;
        debug_assert!(
            (delta + pending.delta).abs() <= 1e-9 * (1.0 + pending.delta.abs()),
            "undo of {} gave dH = {delta}, expected {}",
            pending.mv,
            -pending.delta
        );

        // restore the saved value so the undo is bit-exact
        self.hamiltonian = pending.hamiltonian_before;
        trace!("undo {}: dH = {delta}", pending.mv);
        Ok(())
    }

    fn move_energy(&self, mv: &Move) -> f64 {
        let ensemble = self.ensemble.strategy();
        mv.sites().map(|i| ensemble.local_energy(self, i)).sum()
    }

    fn apply(&mut self, mv: &Move) {
        for i in mv.sites() {
            self.spins[i].spin_type = -self.spins[i].spin_type;
        }
    }

    /// Minimum-image Euclidean distance between two sites.
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        let (w, h) = (self.width as i64, self.height as i64);
        let (row_a, col_a) = (a as i64 / w, a as i64 % w);
        let (row_b, col_b) = (b as i64 / w, b as i64 % w);

        let mut dx = (col_b - col_a).abs();
        if dx > w / 2 {
            dx -= w;
        }
        let mut dy = (row_b - row_a).abs();
        if dy > h / 2 {
            dy -= h;
        }
        Vector2::new(dx as f64, dy as f64).norm()
    }

    /// Mean spin, in [-1, 1].
    pub fn magnetization(&self) -> f64 {
        let sum: i64 = self.spins.iter().map(|s| s.spin_type as i64).sum();
        sum as f64 / self.spins.len() as f64
    }

    pub fn down_spin_count(&self) -> usize {
        self.spins.iter().filter(|s| s.spin_type == DOWN).count()
    }

    /// G(r) of the current configuration with the default binning.
    pub fn correlation(&self) -> Histogram {
        CorrelationAnalyzer::default().correlation(self)
    }

    /// S(k) from a correlation histogram. Constrained ensemble only.
    pub fn structure_function(&self, correlation: &Histogram) -> Result<Histogram> {
        CorrelationAnalyzer::default().structure_function(self, correlation)
    }

    pub fn has_opposite_neighbor(&self, index: usize) -> bool {
        let own = self.spins[index].spin_type;
        self.spins[index]
            .neighbors
            .iter()
            .any(|&n| self.spins[n].spin_type != own)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn n_spins(&self) -> usize {
        self.spins.len()
    }

    pub fn coupling(&self) -> f64 {
        self.coupling
    }

    pub fn field(&self) -> f64 {
        self.field
    }

    pub fn ensemble(&self) -> EnsembleKind {
        self.ensemble
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn wavelength(&self) -> Option<f64> {
        self.wavelength
    }

    pub fn hamiltonian(&self) -> f64 {
        self.hamiltonian
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move.map(|p| p.mv)
    }

    pub fn spins(&self) -> &[Spin] {
        &self.spins
    }

    pub fn spin_type(&self, index: usize) -> i8 {
        self.spins[index].spin_type
    }

    pub fn neighbors(&self, index: usize) -> &[usize; 4] {
        &self.spins[index].neighbors
    }

    pub(crate) fn set_spin_type(&mut self, index: usize, spin_type: i8) {
        self.spins[index].spin_type = spin_type;
    }

    pub(crate) fn fill(&mut self, spin_type: i8) {
        for spin in &mut self.spins {
            spin.spin_type = spin_type;
        }
    }
}

/// Allocate W×H up spins and wire the von Neumann stencil with wrap-around.
fn build_torus(width: usize, height: usize) -> Vec<Spin> {
    let n = width * height;
    (0..n)
        .map(|id| {
            let up = if id < width { id + n - width } else { id - width };
            let right = if (id + 1) % width == 0 { id + 1 - width } else { id + 1 };
            let down = if id + width >= n { id + width - n } else { id + width };
            let left = if id % width == 0 { id + width - 1 } else { id - 1 };
            Spin {
                id,
                spin_type: UP,
                neighbors: [up, right, down, left],
            }
        })
        .collect()
}

/// One row per line, `+` for up and `-` for down.
impl fmt::Display for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.spins.chunks(self.width) {
            let line: Vec<&str> = row
                .iter()
                .map(|s| if s.spin_type == DOWN { "-" } else { "+" })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
