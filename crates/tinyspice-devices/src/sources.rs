//! Independent source models: voltage and current sources.

use tinyspice_core::stamp::{IterationState, StampContext};
use tinyspice_core::{Device, ExtraVar, Terminal};

use crate::stamp::{stamp_branch_coupling, stamp_current};

/// An independent DC voltage source.
///
/// Imposes `V(n1) - V(n2) = voltage` through a branch-current variable
/// requested at init time.
#[derive(Debug, Clone)]
pub struct VoltageSource {
    /// Device name (e.g. "V1").
    pub name: String,
    /// Positive terminal.
    pub n1: Terminal,
    /// Negative terminal.
    pub n2: Terminal,
    /// Source voltage in volts.
    pub voltage: f64,
    branch: ExtraVar,
}

impl VoltageSource {
    pub fn new(name: impl Into<String>, n1: Terminal, n2: Terminal, voltage: f64) -> Self {
        Self {
            name: name.into(),
            n1,
            n2,
            voltage,
            branch: ExtraVar::None,
        }
    }

    /// The branch-current variable index, once allocated.
    pub fn branch_index(&self) -> Option<usize> {
        self.branch.index()
    }
}

impl Device for VoltageSource {
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
        ctx.add_z(k, self.voltage);
    }
}

/// An independent DC current source.
///
/// Drives `current` amperes from `n1` through the source into `n2`.
#[derive(Debug, Clone)]
pub struct CurrentSource {
    /// Device name (e.g. "I1").
    pub name: String,
    pub n1: Terminal,
    pub n2: Terminal,
    /// Source current in amperes.
    pub current: f64,
}

impl CurrentSource {
    pub fn new(name: impl Into<String>, n1: Terminal, n2: Terminal, current: f64) -> Self {
        Self {
            name: name.into(),
            n1,
            n2,
            current,
        }
    }
}

impl Device for CurrentSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn remap_terminals(&mut self, map: &dyn Fn(Terminal) -> Terminal) {
        self.n1 = map(self.n1);
        self.n2 = map(self.n2);
    }

    fn stamp_nonlinear(&self, ctx: &mut StampContext, _it: &IterationState<'_>) {
        stamp_current(ctx, self.n1, self.n2, self.current);
    }
}
