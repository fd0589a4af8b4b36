//! Pair correlation G(r) and structure factor S(k) of a lattice snapshot.

use itertools::Itertools;
use std::f64::consts::PI;
use tracing::debug;

use super::lattice::Lattice;
use super::params::EnsembleKind;
use crate::error::{IsingError, Result};
use crate::histogram::Histogram;

/// Distance bin width for G(r).
pub const CORRELATION_BIN_WIDTH: f64 = 0.1;
/// Wavenumber spacing of the S(k) grid.
pub const STRUCTURE_K_STEP: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationAnalyzer {
    bin_width: f64,
    k_step: f64,
}

impl Default for CorrelationAnalyzer {
    fn default() -> Self {
        Self {
            bin_width: CORRELATION_BIN_WIDTH,
            k_step: STRUCTURE_K_STEP,
        }
    }
}

impl CorrelationAnalyzer {
    /// G(r) = <s_a s_b>_r - <s>, over every unordered pair of distinct sites,
    /// binned by toroidal distance and sorted by r.
    pub fn correlation(&self, lattice: &Lattice) -> Histogram {
        let mut correlation = Histogram::new(self.bin_width);
        let mut pairs = Histogram::new(self.bin_width);

        for (a, b) in (0..lattice.n_spins()).tuple_combinations() {
            let r = lattice.distance(a, b);
            let product = if lattice.spin_type(a) == lattice.spin_type(b) {
                1.0
            } else {
                -1.0
            };
            correlation.add_data(r, product);
            pairs.add_count(r);
        }

        for bin in correlation.iter_mut() {
            bin.value /= pairs.get_by_key(bin.key());
        }
        correlation.shift(lattice.magnetization());
        correlation.sort_bins();

        debug!("correlation computed over {} distance bins", correlation.len());
        correlation
    }

    /// S(k) = Σ_r cos(2π k r / W) G(r) for k = 0, k_step, ..., W/2.
    pub fn structure_function(&self, lattice: &Lattice, correlation: &Histogram) -> Result<Histogram> {
        if lattice.ensemble() != EnsembleKind::Constrained {
            return Err(IsingError::UnsupportedMode {
                ensemble: lattice.ensemble().name(),
                operation: "structure function",
            });
        }

        let width = lattice.width() as f64;
        // the grid closes at k = W/2 itself, one point past a half-open [0, W/2)
        let n_k = ((width / 2.0) / self.k_step).floor() as usize;
        let mut structure = Histogram::new(self.k_step);
        for j in 0..=n_k {
            let k = j as f64 * self.k_step;
            let s_k: f64 = correlation
                .iter()
                .map(|bin| (2.0 * PI * k * bin.position() / width).cos() * bin.value)
                .sum();
            structure.add_data(k, s_k);
        }
        Ok(structure)
    }
}
