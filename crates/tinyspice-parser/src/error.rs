//! Error types for tinyspice-parser.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("line {line}: invalid element: {reason}")]
    InvalidElement { line: usize, reason: String },

    #[error("line {line}: unknown element type: {name}")]
    UnknownElement { line: usize, name: String },

    #[error("line {line}: invalid value: {text}")]
    InvalidValue { line: usize, text: String },

    #[error(transparent)]
    Circuit(#[from] tinyspice_core::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
