//! Metropolis Monte Carlo simulation of the 2D nearest-neighbor Ising model
//! on a torus, with single-spin-flip and magnetization-conserving
//! pair-exchange dynamics, plus pair-correlation and structure-factor
//! post-processing.

pub mod error;
pub mod histogram;
pub mod ising;
pub mod random;

pub use error::{IsingError, Result};
pub use histogram::{Bin, Histogram};
pub use ising::{
    CorrelationAnalyzer, EnsembleKind, Lattice, LatticeParams, MonteCarloDriver, Move,
    SampleSeries,
};
pub use random::RandomSource;
