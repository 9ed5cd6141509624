//! DC operating point analysis via Newton-Raphson iteration.

use nalgebra::DVector;

use tinyspice_core::stamp::{IterationState, StampContext};
use tinyspice_core::Circuit;

use crate::error::{Error, Result};
use crate::linear::solve_dense;

/// Newton-Raphson iteration controls.
#[derive(Debug, Clone)]
pub struct DcParams {
    /// Maximum iterations before giving up.
    pub max_iter: usize,
    /// Absolute convergence tolerance.
    pub tol_abs: f64,
    /// Relative convergence tolerance.
    pub tol_rel: f64,
}

impl Default for DcParams {
    fn default() -> Self {
        Self {
            max_iter: 100,
            tol_abs: 1e-9,
            tol_rel: 1e-6,
        }
    }
}

/// Result of a DC operating point analysis.
///
/// The solution vector holds non-ground node voltages first (in node
/// insertion order), then branch currents (in device insertion order) -
/// the MNA variable layout.
#[derive(Debug, Clone)]
pub struct DcSolution {
    /// Solution vector, length `num_vars`.
    pub x: DVector<f64>,
    /// Newton-Raphson iterations performed (at least 1).
    pub iterations: usize,
    /// Whether the tolerance test passed within the iteration budget.
    pub converged: bool,
}

impl DcSolution {
    /// Value at a variable index. Out-of-range indices read 0.
    pub fn value(&self, index: usize) -> f64 {
        self.x.get(index).copied().unwrap_or(0.0)
    }

    /// Voltage at a node's variable index; `None` (ground) reads 0 V.
    pub fn voltage(&self, var_index: Option<usize>) -> f64 {
        match var_index {
            Some(i) => self.value(i),
            None => 0.0,
        }
    }
}

/// Compute the DC operating point of a finalized circuit.
///
/// Each iteration resets the stamp arena, stamps every device
/// linearized at the current guess, assembles the dense MNA system, and
/// solves it by Gaussian elimination with partial pivoting. The
/// iteration converges once `|delta[i]| <= tol_abs + tol_rel*|x[i]|`
/// holds for every variable; linear circuits pass on the second
/// iteration, when the solve reproduces itself exactly, while nonlinear
/// circuits iterate up to `max_iter`.
pub fn solve_dc(circuit: &Circuit, params: &DcParams) -> Result<DcSolution> {
    if !circuit.is_finalized() {
        return Err(Error::NotFinalized);
    }

    let n = circuit.num_vars();
    let mut ctx = StampContext::new(n)?;
    let mut x = DVector::zeros(n);

    for iter in 0..params.max_iter {
        ctx.reset();
        let it = IterationState {
            iter,
            x: &x,
            tol_abs: params.tol_abs,
            tol_rel: params.tol_rel,
        };
        for device in circuit.devices() {
            device.stamp_nonlinear(&mut ctx, &it);
        }

        let a = ctx.assemble_dense();
        let z = ctx.rhs().clone();
        let x_new = solve_dense(&a, &z)?;

        let delta = &x_new - &x;
        x = x_new;

        if converged(&delta, &x, params) {
            return Ok(DcSolution {
                x,
                iterations: iter + 1,
                converged: true,
            });
        }
    }

    Ok(DcSolution {
        x,
        iterations: params.max_iter,
        converged: false,
    })
}

fn converged(delta: &DVector<f64>, x: &DVector<f64>, params: &DcParams) -> bool {
    delta
        .iter()
        .zip(x.iter())
        .all(|(d, xi)| d.abs() <= params.tol_abs + params.tol_rel * xi.abs())
}
