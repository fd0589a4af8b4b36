//! Error types for the lattice simulation core.

use thiserror::Error;

/// Errors raised synchronously by the simulation core.
///
/// The core never retries and never corrects an invalid request on its own;
/// every failure is handed back to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IsingError {
    /// Parameter combination rejected at setup (odd N or nonzero field in the
    /// constrained ensemble, ratio outside (0,1), non-positive temperature).
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// `flip_back` was called without a pending move.
    #[error("invalid move: {0}")]
    InvalidMove(String),

    /// Operation only defined for the constrained ensemble.
    #[error("unsupported in {ensemble} ensemble: {operation}")]
    UnsupportedMode {
        ensemble: &'static str,
        operation: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, IsingError>;
