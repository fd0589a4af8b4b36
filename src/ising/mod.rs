pub mod analysis;
pub mod correlation;
pub mod driver;
pub mod ensemble;
pub mod lattice;
pub mod params;

pub use correlation::CorrelationAnalyzer;
pub use driver::{acceptance, MonteCarloDriver, MoveStatistics, SampleSeries};
pub use ensemble::{ConstrainedEnsemble, Ensemble, FreeEnsemble, Move};
pub use lattice::{Lattice, Spin, DOWN, UP};
pub use params::{EnsembleKind, LatticeParams};
