//! Shockley diode model.

use tinyspice_core::stamp::{IterationState, StampContext, TimeStepState};
use tinyspice_core::{Device, Terminal};

use crate::stamp::{stamp_conductance, stamp_current};

/// Thermal voltage used for diode evaluation, in volts.
pub const THERMAL_VOLTAGE: f64 = 0.025852;

/// Forward-voltage clamp applied before evaluating the exponential.
const VD_MAX: f64 = 0.7;

/// Conductance floor keeping the Jacobian nonsingular in deep reverse
/// bias.
const G_MIN: f64 = 1e-12;

/// Diode model parameters.
#[derive(Debug, Clone, Copy)]
pub struct DiodeParams {
    /// Saturation current in amperes.
    pub i_s: f64,
    /// Ideality (emission) coefficient.
    pub n: f64,
}

impl Default for DiodeParams {
    fn default() -> Self {
        Self { i_s: 1e-14, n: 1.0 }
    }
}

/// A Shockley diode.
///
/// Each Newton iteration linearizes the exponential at the current
/// guess into a Norton pair: conductance `g_eq = dI/dV` between the
/// terminals and the equivalent current `i_eq = i_d - g_eq*v_d` on the
/// RHS.
#[derive(Debug, Clone)]
pub struct Diode {
    /// Device name (e.g. "D1").
    pub name: String,
    pub anode: Terminal,
    pub cathode: Terminal,
    pub params: DiodeParams,
}

impl Diode {
    /// Create a diode with default parameters (Is = 1e-14 A, n = 1).
    pub fn new(name: impl Into<String>, anode: Terminal, cathode: Terminal) -> Self {
        Self::with_params(name, anode, cathode, DiodeParams::default())
    }

    pub fn with_params(
        name: impl Into<String>,
        anode: Terminal,
        cathode: Terminal,
        params: DiodeParams,
    ) -> Self {
        Self {
            name: name.into(),
            anode,
            cathode,
            params,
        }
    }

    /// Clamp the junction voltage into the numerically safe window
    /// `[-15*n*Vt, 0.7]` before the exponential is evaluated.
    pub fn clamp_voltage(&self, vd: f64) -> f64 {
        let lower = -15.0 * self.params.n * THERMAL_VOLTAGE;
        vd.clamp(lower, VD_MAX)
    }

    /// Diode current and linearized conductance at junction voltage
    /// `vd` (clamped internally).
    ///
    /// Returns `(i_d, g_eq)` with `i_d = Is*(exp(vd/(n*Vt)) - 1)` and
    /// `g_eq = Is/(n*Vt)*exp(vd/(n*Vt))`, floored at a minimum
    /// conductance.
    pub fn evaluate(&self, vd: f64) -> (f64, f64) {
        let n_vt = self.params.n * THERMAL_VOLTAGE;
        let vd = self.clamp_voltage(vd);
        let e = (vd / n_vt).exp();
        let i_d = self.params.i_s * (e - 1.0);
        let g_eq = (self.params.i_s / n_vt * e).max(G_MIN);
        (i_d, g_eq)
    }
}

impl Device for Diode {
    fn name(&self) -> &str {
        &self.name
    }

    fn remap_terminals(&mut self, map: &dyn Fn(Terminal) -> Terminal) {
        self.anode = map(self.anode);
        self.cathode = map(self.cathode);
    }

    fn stamp_nonlinear(&self, ctx: &mut StampContext, it: &IterationState<'_>) {
        let vd = self.clamp_voltage(it.voltage(self.anode) - it.voltage(self.cathode));
        let (i_d, g_eq) = self.evaluate(vd);
        let i_eq = i_d - g_eq * vd;

        stamp_conductance(ctx, self.anode, self.cathode, g_eq);
        stamp_current(ctx, self.anode, self.cathode, i_eq);
    }

    fn stamp_transient(&self, ctx: &mut StampContext, step: &TimeStepState<'_>) {
        // Linearize at the previous-step solution.
        self.stamp_nonlinear(ctx, &step.as_iteration());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;

    #[test]
    fn test_forward_bias() {
        let d = Diode::new("D1", Terminal::Var(0), Terminal::Ground);
        let (i_d, g_eq) = d.evaluate(0.7);
        assert!(i_d > 0.0, "forward current should be positive: {i_d}");
        assert!(g_eq > 0.0, "forward conductance should be positive: {g_eq}");
        assert!(g_eq.is_finite());
    }

    #[test]
    fn test_reverse_bias() {
        let d = Diode::new("D1", Terminal::Var(0), Terminal::Ground);
        let (i_d, g_eq) = d.evaluate(-1.0);
        assert!(i_d < 0.0, "reverse current should be negative: {i_d}");
        assert!(i_d.abs() < 1e-12, "reverse current should be ~ -Is: {i_d}");
        assert_eq!(g_eq, 1e-12, "reverse conductance sits at the floor");
    }

    #[test]
    fn test_zero_bias_conductance() {
        let d = Diode::new("D1", Terminal::Var(0), Terminal::Ground);
        let (i_d, g_eq) = d.evaluate(0.0);
        assert_eq!(i_d, 0.0);
        // Is/(n*Vt) ~ 3.9e-13, raised to the conductance floor.
        assert!(g_eq > 0.0 && g_eq < 1e-9);
    }

    #[test]
    fn test_forward_clamp() {
        let d = Diode::new("D1", Terminal::Var(0), Terminal::Ground);
        // Anything past the 0.7 V clamp evaluates identically.
        assert_eq!(d.evaluate(100.0), d.evaluate(0.7));
        let (_, g_eq) = d.evaluate(100.0);
        assert!(g_eq.is_finite() && g_eq > 0.0);
    }

    #[test]
    fn test_reverse_clamp() {
        let d = Diode::new("D1", Terminal::Var(0), Terminal::Ground);
        assert_eq!(d.evaluate(-100.0), d.evaluate(-15.0 * THERMAL_VOLTAGE));
    }

    #[test]
    fn test_stamp_symmetry() {
        let mut ctx = StampContext::new(2).unwrap();
        let x = DVector::from_vec(vec![0.6, 0.0]);
        let it = IterationState {
            iter: 0,
            x: &x,
            tol_abs: 1e-9,
            tol_rel: 1e-6,
        };
        let d = Diode::new("D1", Terminal::Var(0), Terminal::Var(1));
        d.stamp_nonlinear(&mut ctx, &it);

        let a = ctx.assemble_dense();
        let (_, g_eq) = d.evaluate(0.6);
        assert!((a[(0, 0)] - g_eq).abs() < 1e-15);
        assert!((a[(1, 1)] - g_eq).abs() < 1e-15);
        assert_eq!(a[(0, 1)], a[(1, 0)]);

        // The equivalent current is equal and opposite at the terminals.
        assert!((ctx.rhs()[0] + ctx.rhs()[1]).abs() < 1e-18);
        assert!(ctx.rhs()[0] != 0.0);
    }

    #[test]
    fn test_grounded_cathode_stamp() {
        let mut ctx = StampContext::new(1).unwrap();
        let x = DVector::from_vec(vec![0.5]);
        let it = IterationState {
            iter: 0,
            x: &x,
            tol_abs: 1e-9,
            tol_rel: 1e-6,
        };
        let d = Diode::new("D1", Terminal::Var(0), Terminal::Ground);
        d.stamp_nonlinear(&mut ctx, &it);

        let (i_d, g_eq) = d.evaluate(0.5);
        let i_eq = i_d - g_eq * 0.5;
        let a = ctx.assemble_dense();
        assert!((a[(0, 0)] - g_eq).abs() < 1e-15);
        assert!((ctx.rhs()[0] + i_eq).abs() < 1e-18);
        assert_eq!(ctx.triplets().len(), 1);
    }

    #[test]
    fn test_custom_params() {
        let params = DiodeParams { i_s: 1e-12, n: 2.0 };
        let d = Diode::with_params("D1", Terminal::Var(0), Terminal::Ground, params);
        let (i_d, _) = d.evaluate(0.5);
        // Higher ideality factor conducts less at the same bias.
        let (i_d_default, _) = Diode::new("D2", Terminal::Var(0), Terminal::Ground).evaluate(0.5);
        assert!(i_d < i_d_default);
    }
}
