//! Shared stamp patterns.

use nalgebra::DVector;
use tinyspice_core::stamp::StampContext;
use tinyspice_core::Terminal;

/// Conductance pattern between two terminals: `+g` on the diagonal,
/// `-g` on the off-diagonal, ground entries skipped.
pub(crate) fn stamp_conductance(ctx: &mut StampContext, n1: Terminal, n2: Terminal, g: f64) {
    if let Some(i) = n1.var() {
        ctx.add_a(i, i, g);
    }
    if let Some(j) = n2.var() {
        ctx.add_a(j, j, g);
    }
    if let (Some(i), Some(j)) = (n1.var(), n2.var()) {
        ctx.add_a(i, j, -g);
        ctx.add_a(j, i, -g);
    }
}

/// RHS contribution of a current `i` flowing from `n1` to `n2`.
pub(crate) fn stamp_current(ctx: &mut StampContext, n1: Terminal, n2: Terminal, i: f64) {
    if let Some(row) = n1.var() {
        ctx.add_z(row, -i);
    }
    if let Some(row) = n2.var() {
        ctx.add_z(row, i);
    }
}

/// The unit coupling rows tying branch variable `k` to the node
/// equations of `n1` and `n2` (voltage sources and inductors).
pub(crate) fn stamp_branch_coupling(ctx: &mut StampContext, n1: Terminal, n2: Terminal, k: usize) {
    if let Some(i) = n1.var() {
        ctx.add_a(i, k, 1.0);
        ctx.add_a(k, i, 1.0);
    }
    if let Some(j) = n2.var() {
        ctx.add_a(j, k, -1.0);
        ctx.add_a(k, j, -1.0);
    }
}

/// Voltage of a solution vector at a terminal. Ground reads 0 V.
pub(crate) fn terminal_voltage(x: &DVector<f64>, t: Terminal) -> f64 {
    match t.var() {
        Some(i) => x.get(i).copied().unwrap_or(0.0),
        None => 0.0,
    }
}
