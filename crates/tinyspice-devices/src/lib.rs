//! Device models for tinyspice.
//!
//! Each model owns its parameters and state and implements the
//! [`Device`](tinyspice_core::Device) contract; the solver drives all of
//! them uniformly. Stamping formulas follow the MNA sign convention:
//! current out of a node adds a positive Jacobian entry on that node's
//! row and subtracts from its RHS.

pub mod diode;
pub mod passive;
pub mod sources;

mod stamp;

pub use diode::{Diode, DiodeParams};
pub use passive::{Capacitor, Inductor, Resistor};
pub use sources::{CurrentSource, VoltageSource};
