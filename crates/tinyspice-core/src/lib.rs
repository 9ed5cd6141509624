//! Core circuit representation and MNA assembly structures for tinyspice.
//!
//! This crate provides the data structures shared by every other part of
//! the simulator: the circuit graph, the device contract, and the stamp
//! arena that devices write their matrix contributions into.
//!
//! # Overview
//!
//! The core abstractions are:
//!
//! - [`Circuit`] - Nodes and devices, plus the finalization protocol that
//!   assigns the MNA variable space
//! - [`StampContext`](stamp::StampContext) - Per-assembly arena collecting
//!   matrix triplets and RHS contributions
//! - [`Device`] - The five-operation contract every element implements
//! - [`Terminal`] - A device terminal reference (ground carries no variable)
//!
//! # Modified Nodal Analysis (MNA)
//!
//! MNA formulates the circuit equations as `A·x = z` where `x` holds the
//! non-ground node voltages followed by branch currents for elements that
//! impose voltage constraints (voltage sources, inductors). Ground is not
//! part of the variable space; stamps touching it are dropped.
//!
//! # Example: Assembling a stamped system
//!
//! ```rust
//! use tinyspice_core::stamp::StampContext;
//!
//! // Two nodes joined by a 1 kOhm resistor: g = 1e-3 S.
//! let mut ctx = StampContext::new(2).unwrap();
//! let g = 1.0 / 1000.0;
//! ctx.add_a(0, 0, g);
//! ctx.add_a(1, 1, g);
//! ctx.add_a(0, 1, -g);
//! ctx.add_a(1, 0, -g);
//!
//! let a = ctx.assemble_dense();
//! assert_eq!(a[(0, 0)], g);
//! assert_eq!(a[(0, 1)], -g);
//! ```

pub mod circuit;
pub mod device;
pub mod error;
pub mod node;
pub mod stamp;
pub mod units;

pub use circuit::Circuit;
pub use device::{Device, ExtraVar};
pub use error::{Error, Result};
pub use node::{Node, Terminal};
pub use stamp::{
    IntegrationKind, IntegrationMethod, IterationState, StampContext, TimeStepState, Triplet,
    BACKWARD_EULER, GEAR2, TRAPEZOIDAL,
};
