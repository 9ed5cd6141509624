//! Error types for tinyspice-core.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("MNA system has no variables")]
    EmptySystem,

    #[error("circuit has no non-ground nodes")]
    EmptyCircuit,

    #[error("circuit is already finalized")]
    CircuitFinalized,
}

pub type Result<T> = std::result::Result<T, Error>;
