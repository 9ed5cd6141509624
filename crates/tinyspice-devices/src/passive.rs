//! Passive device models: Resistor, Capacitor, Inductor.

use nalgebra::DVector;

use tinyspice_core::stamp::{IterationState, StampContext, TimeStepState};
use tinyspice_core::{Device, ExtraVar, IntegrationKind, Terminal};

use crate::stamp::{stamp_branch_coupling, stamp_conductance, stamp_current, terminal_voltage};

/// A resistor element.
#[derive(Debug, Clone)]
pub struct Resistor {
    /// Device name (e.g. "R1").
    pub name: String,
    pub n1: Terminal,
    pub n2: Terminal,
    /// Resistance in ohms.
    pub resistance: f64,
}

impl Resistor {
    pub fn new(name: impl Into<String>, n1: Terminal, n2: Terminal, resistance: f64) -> Self {
        Self {
            name: name.into(),
            n1,
            n2,
            resistance,
        }
    }

    /// Conductance (1/R).
    pub fn conductance(&self) -> f64 {
        1.0 / self.resistance
    }
}

impl Device for Resistor {
    fn name(&self) -> &str {
        &self.name
    }

    fn remap_terminals(&mut self, map: &dyn Fn(Terminal) -> Terminal) {
        self.n1 = map(self.n1);
        self.n2 = map(self.n2);
    }

    fn stamp_nonlinear(&self, ctx: &mut StampContext, _it: &IterationState<'_>) {
        if self.resistance == 0.0 {
            return;
        }
        stamp_conductance(ctx, self.n1, self.n2, self.conductance());
    }
}

/// History carried by a capacitor across transient steps.
#[derive(Debug, Clone, Copy, Default)]
struct CapacitorState {
    v_prev: f64,
    v_prev2: f64,
    i_prev: f64,
}

/// A capacitor element.
///
/// Open circuit at DC; a conductance/current companion model in
/// transient analysis, with coefficients from the active integration
/// rule.
#[derive(Debug, Clone)]
pub struct Capacitor {
    /// Device name (e.g. "C1").
    pub name: String,
    pub n1: Terminal,
    pub n2: Terminal,
    /// Capacitance in farads.
    pub capacitance: f64,
    state: CapacitorState,
}

impl Capacitor {
    pub fn new(name: impl Into<String>, n1: Terminal, n2: Terminal, capacitance: f64) -> Self {
        Self {
            name: name.into(),
            n1,
            n2,
            capacitance,
            state: CapacitorState::default(),
        }
    }
}

impl Device for Capacitor {
    fn name(&self) -> &str {
        &self.name
    }

    fn remap_terminals(&mut self, map: &dyn Fn(Terminal) -> Terminal) {
        self.n1 = map(self.n1);
        self.n2 = map(self.n2);
    }

    fn stamp_nonlinear(&self, _ctx: &mut StampContext, _it: &IterationState<'_>) {
        // Open circuit at DC.
    }

    fn stamp_transient(&self, ctx: &mut StampContext, step: &TimeStepState<'_>) {
        let im = step.method;
        let c_h = self.capacitance / step.h;

        let g_eq = im.alpha0 * c_h;
        let mut i_eq = im.alpha1 * c_h * self.state.v_prev;
        if im.required_history >= 2 {
            i_eq += im.alpha2 * c_h * self.state.v_prev2;
        }
        if im.kind == IntegrationKind::Trapezoidal {
            i_eq += self.state.i_prev;
        }

        stamp_conductance(ctx, self.n1, self.n2, g_eq);
        stamp_current(ctx, self.n1, self.n2, i_eq);
    }

    fn update_state(&mut self, x: &DVector<f64>, step: &TimeStepState<'_>) {
        let v = terminal_voltage(x, self.n1) - terminal_voltage(x, self.n2);

        if step.method.kind == IntegrationKind::Trapezoidal {
            let two_c_h = 2.0 * self.capacitance / step.h;
            self.state.i_prev = two_c_h * (v - self.state.v_prev) - self.state.i_prev;
        }

        self.state.v_prev2 = self.state.v_prev;
        self.state.v_prev = v;
    }
}

/// History carried by an inductor across transient steps.
#[derive(Debug, Clone, Copy, Default)]
struct InductorState {
    i_prev: f64,
    i_prev2: f64,
    v_prev: f64,
}

/// An inductor element.
///
/// At DC the inductor is a short circuit, stamped as a zero-volt source
/// on its branch variable. In transient analysis the branch equation
/// carries the companion resistance and voltage history.
#[derive(Debug, Clone)]
pub struct Inductor {
    /// Device name (e.g. "L1").
    pub name: String,
    pub n1: Terminal,
    pub n2: Terminal,
    /// Inductance in henries.
    pub inductance: f64,
    branch: ExtraVar,
    state: InductorState,
}

impl Inductor {
    pub fn new(name: impl Into<String>, n1: Terminal, n2: Terminal, inductance: f64) -> Self {
        Self {
            name: name.into(),
            n1,
            n2,
            inductance,
            branch: ExtraVar::None,
            state: InductorState::default(),
        }
    }

    /// The branch-current variable index, once allocated.
    pub fn branch_index(&self) -> Option<usize> {
        self.branch.index()
    }
}

impl Device for Inductor {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self) {
        self.branch = ExtraVar::Requested;
    }

    fn extra_var(&self) -> ExtraVar {
        self.branch
    }

    fn assign_extra_var(&mut self, index: usize) {
        self.branch = ExtraVar::Allocated(index);
    }

    fn remap_terminals(&mut self, map: &dyn Fn(Terminal) -> Terminal) {
        self.n1 = map(self.n1);
        self.n2 = map(self.n2);
    }

    fn stamp_nonlinear(&self, ctx: &mut StampContext, _it: &IterationState<'_>) {
        let Some(k) = self.branch.index() else {
            return;
        };
        stamp_branch_coupling(ctx, self.n1, self.n2, k);
    }

    fn stamp_transient(&self, ctx: &mut StampContext, step: &TimeStepState<'_>) {
        let Some(k) = self.branch.index() else {
            return;
        };
        let im = step.method;
        let l_h = self.inductance / step.h;

        let r_eq = im.beta0 * l_h;
        let mut v_eq = im.beta1 * l_h * self.state.i_prev;
        if im.required_history >= 2 {
            v_eq += im.beta2 * l_h * self.state.i_prev2;
        }
        if im.kind == IntegrationKind::Trapezoidal {
            v_eq += self.state.v_prev;
        }

        stamp_branch_coupling(ctx, self.n1, self.n2, k);
        ctx.add_a(k, k, -r_eq);
        ctx.add_z(k, -v_eq);
    }

    fn update_state(&mut self, x: &DVector<f64>, step: &TimeStepState<'_>) {
        let Some(k) = self.branch.index() else {
            return;
        };
        let i = x.get(k).copied().unwrap_or(0.0);

        if step.method.kind == IntegrationKind::Trapezoidal {
            self.state.v_prev = terminal_voltage(x, self.n1) - terminal_voltage(x, self.n2);
        }

        self.state.i_prev2 = self.state.i_prev;
        self.state.i_prev = i;
    }
}
