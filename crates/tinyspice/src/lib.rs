//! # tinyspice
//!
//! An educational SPICE-class circuit simulator built on Modified Nodal
//! Analysis. tinyspice computes the DC operating point of networks of
//! resistors, independent sources, capacitors, inductors, and Shockley
//! diodes via Newton-Raphson iteration over a dense linear solve.
//!
//! ## Quick start
//!
//! ```rust
//! use tinyspice::prelude::*;
//!
//! let circuit = tinyspice::parse(
//!     "* voltage divider\n\
//!      V1 vpos 0 5\n\
//!      R1 vpos out 1k\n\
//!      R2 out 0 1k\n",
//! )
//! .unwrap();
//!
//! let solution = solve_dc(&circuit, &DcParams::default()).unwrap();
//! let out = circuit.get_node("out").unwrap();
//! assert!((solution.voltage(circuit.var_index(out)) - 2.5).abs() < 1e-6);
//! ```

// Re-export the component crates.
pub use tinyspice_core as core;
pub use tinyspice_devices as devices;
pub use tinyspice_parser as parser;
pub use tinyspice_solver as solver;

// Convenient re-exports from tinyspice_core.
pub use tinyspice_core::{
    Circuit, Device, Error as CoreError, ExtraVar, IntegrationKind, IntegrationMethod,
    IterationState, Node, StampContext, Terminal, TimeStepState, Triplet, BACKWARD_EULER, GEAR2,
    TRAPEZOIDAL,
};

// Convenient re-exports from tinyspice_parser.
pub use tinyspice_parser::{parse, parse_file, Error as ParseError};

// Convenient re-exports from tinyspice_solver.
pub use tinyspice_solver::{solve_dc, solve_dense, DcParams, DcSolution, Error as SolverError};

// Convenient re-exports from tinyspice_devices.
pub use tinyspice_devices::{
    Capacitor, CurrentSource, Diode, DiodeParams, Inductor, Resistor, VoltageSource,
};

/// Re-export of nalgebra's dynamic vector type.
pub use nalgebra::DVector;

/// Re-export of nalgebra's dynamic matrix type.
pub use nalgebra::DMatrix;

/// Commonly used types and functions.
pub mod prelude {
    pub use crate::{Circuit, Device, ExtraVar, StampContext, Terminal};

    pub use crate::{parse, parse_file};

    pub use crate::{solve_dc, DcParams, DcSolution};

    pub use crate::{
        Capacitor, CurrentSource, Diode, DiodeParams, Inductor, Resistor, VoltageSource,
    };

    pub use crate::{DMatrix, DVector};
}
