//! Stamp accumulation arena and the state records handed to devices.

use nalgebra::{DMatrix, DVector};

use crate::error::{Error, Result};
use crate::node::Terminal;

/// A single coordinate-format matrix contribution.
///
/// Contributions at the same `(row, col)` sum when assembled; zero values
/// are never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triplet {
    pub row: usize,
    pub col: usize,
    pub val: f64,
}

/// Per-assembly arena collecting device contributions.
///
/// Devices append matrix triplets and RHS additions here without knowing
/// the dense solver's memory layout; [`assemble_dense`] folds the
/// triplets into a matrix afterwards. Out-of-range indices and
/// exact-zero matrix values are dropped silently, which lets devices
/// stamp unconditionally, ground terminals included.
///
/// [`assemble_dense`]: StampContext::assemble_dense
#[derive(Debug, Clone)]
pub struct StampContext {
    num_vars: usize,
    num_extra_allocated: usize,
    triplets: Vec<Triplet>,
    z: DVector<f64>,
}

impl StampContext {
    /// Create a context for `num_vars` MNA variables.
    ///
    /// Fails with [`Error::EmptySystem`] when `num_vars` is zero.
    pub fn new(num_vars: usize) -> Result<Self> {
        if num_vars == 0 {
            return Err(Error::EmptySystem);
        }
        Ok(Self {
            num_vars,
            num_extra_allocated: 0,
            triplets: Vec::with_capacity(64),
            z: DVector::zeros(num_vars),
        })
    }

    /// Clear accumulated triplets and zero the RHS for a new assembly
    /// pass. The variable count is unchanged.
    pub fn reset(&mut self) {
        self.triplets.clear();
        self.z.fill(0.0);
    }

    /// Add `val` to the matrix at `(row, col)`.
    ///
    /// Repeated calls at the same position accumulate. Out-of-range
    /// indices and exact zeros are dropped.
    pub fn add_a(&mut self, row: usize, col: usize, val: f64) {
        if row >= self.num_vars || col >= self.num_vars {
            return;
        }
        if val == 0.0 {
            return;
        }
        self.triplets.push(Triplet { row, col, val });
    }

    /// Add `val` to the RHS at `idx`. Out-of-range indices are dropped.
    pub fn add_z(&mut self, idx: usize, val: f64) {
        if idx >= self.num_vars {
            return;
        }
        self.z[idx] += val;
    }

    /// Allocate a variable for a branch current, returning its index.
    ///
    /// The index space only grows at the top, so triplets recorded
    /// earlier remain valid; the RHS gains a zero cell at the new index.
    pub fn alloc_extra_var(&mut self) -> usize {
        let index = self.num_vars;
        self.num_vars += 1;
        self.num_extra_allocated += 1;
        let z = std::mem::replace(&mut self.z, DVector::zeros(0));
        self.z = z.resize_vertically(self.num_vars, 0.0);
        index
    }

    /// Current number of MNA variables.
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Number of extra variables allocated through this context.
    pub fn num_extra_allocated(&self) -> usize {
        self.num_extra_allocated
    }

    /// The triplets accumulated since the last reset.
    pub fn triplets(&self) -> &[Triplet] {
        &self.triplets
    }

    /// The RHS vector.
    pub fn rhs(&self) -> &DVector<f64> {
        &self.z
    }

    /// Mutable RHS access, for the analysis driver after assembly.
    pub fn rhs_mut(&mut self) -> &mut DVector<f64> {
        &mut self.z
    }

    /// Fold the accumulated triplets into a dense matrix.
    pub fn assemble_dense(&self) -> DMatrix<f64> {
        let n = self.num_vars;
        let mut matrix = DMatrix::zeros(n, n);
        for t in &self.triplets {
            matrix[(t.row, t.col)] += t.val;
        }
        matrix
    }
}

/// State handed to devices while stamping one Newton-Raphson iteration.
#[derive(Debug)]
pub struct IterationState<'a> {
    /// Iteration number, 0-based.
    pub iter: usize,
    /// Current solution guess, length `num_vars`.
    pub x: &'a DVector<f64>,
    /// Absolute convergence tolerance in effect.
    pub tol_abs: f64,
    /// Relative convergence tolerance in effect.
    pub tol_rel: f64,
}

impl IterationState<'_> {
    /// Voltage of the current guess at a terminal. Ground reads 0 V.
    pub fn voltage(&self, terminal: Terminal) -> f64 {
        match terminal.var() {
            Some(i) => self.x.get(i).copied().unwrap_or(0.0),
            None => 0.0,
        }
    }
}

/// Identifies one of the predefined integration rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationKind {
    BackwardEuler,
    Trapezoidal,
    Gear2,
}

/// Coefficients turning a reactive element into its companion model at
/// each time step.
///
/// Capacitors discretize as `i_n = (alpha0*C/h)*v_n - I_history`;
/// inductors as `v_n = (beta0*L/h)*i_n - V_history`. The trapezoidal
/// rule additionally folds the previous flow value (`i_prev` for
/// capacitors, `v_prev` for inductors) into the history term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationMethod {
    pub kind: IntegrationKind,
    pub name: &'static str,
    /// Integration order (1 for Backward Euler, 2 for Trapezoidal/Gear).
    pub order: u32,
    /// Coefficient for the current voltage.
    pub alpha0: f64,
    /// Coefficient for `v_{n-1}`.
    pub alpha1: f64,
    /// Coefficient for `v_{n-2}` (multi-step only).
    pub alpha2: f64,
    /// Coefficient for the current current.
    pub beta0: f64,
    /// Coefficient for `i_{n-1}`.
    pub beta1: f64,
    /// Coefficient for `i_{n-2}` (multi-step only).
    pub beta2: f64,
    /// Number of history steps the rule consumes.
    pub required_history: usize,
}

pub const BACKWARD_EULER: IntegrationMethod = IntegrationMethod {
    kind: IntegrationKind::BackwardEuler,
    name: "backward_euler",
    order: 1,
    alpha0: 1.0,
    alpha1: 1.0,
    alpha2: 0.0,
    beta0: 1.0,
    beta1: 1.0,
    beta2: 0.0,
    required_history: 1,
};

pub const TRAPEZOIDAL: IntegrationMethod = IntegrationMethod {
    kind: IntegrationKind::Trapezoidal,
    name: "trapezoidal",
    order: 2,
    alpha0: 2.0,
    alpha1: 2.0,
    alpha2: 0.0,
    beta0: 2.0,
    beta1: 2.0,
    beta2: 0.0,
    required_history: 1,
};

pub const GEAR2: IntegrationMethod = IntegrationMethod {
    kind: IntegrationKind::Gear2,
    name: "gear2",
    order: 2,
    alpha0: 1.5,
    alpha1: 2.0,
    alpha2: -0.5,
    beta0: 1.5,
    beta1: 2.0,
    beta2: -0.5,
    required_history: 2,
};

/// State handed to devices while stamping one transient time step.
#[derive(Debug)]
pub struct TimeStepState<'a> {
    /// Current simulation time.
    pub t: f64,
    /// Step size.
    pub h: f64,
    /// Solution from the previous step.
    pub x_prev: &'a DVector<f64>,
    /// Solution from two steps ago (multi-step rules only).
    pub x_prev2: Option<&'a DVector<f64>>,
    /// Integration rule in effect.
    pub method: &'a IntegrationMethod,
}

impl<'a> TimeStepState<'a> {
    /// View the previous-step solution as a Newton linearization point.
    ///
    /// Memoryless devices stamp identically in DC and transient, so
    /// their transient hook delegates to the nonlinear stamp through
    /// this view.
    pub fn as_iteration(&self) -> IterationState<'a> {
        IterationState {
            iter: 0,
            x: self.x_prev,
            tol_abs: 0.0,
            tol_rel: 0.0,
        }
    }
}
