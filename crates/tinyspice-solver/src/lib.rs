//! Analysis drivers for tinyspice.
//!
//! [`solve_dense`] is the dense linear kernel (Gaussian elimination with
//! partial pivoting); [`solve_dc`] wraps it in the Newton-Raphson outer
//! loop that drives device stamps to a self-consistent DC operating
//! point.

pub mod dc;
pub mod error;
pub mod linear;

pub use dc::{solve_dc, DcParams, DcSolution};
pub use error::{Error, Result};
pub use linear::solve_dense;
