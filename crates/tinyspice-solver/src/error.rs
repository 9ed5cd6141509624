//! Error types for tinyspice-solver.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("singular or ill-conditioned matrix")]
    Singular,

    #[error("invalid matrix dimensions: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("circuit must be finalized before analysis")]
    NotFinalized,

    #[error(transparent)]
    Core(#[from] tinyspice_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
