//! The polymorphic device contract.

use std::fmt;

use nalgebra::DVector;

use crate::node::Terminal;
use crate::stamp::{IterationState, StampContext, TimeStepState};

/// Branch-current variable slot of a device.
///
/// Devices that impose a voltage constraint (voltage sources, inductors)
/// request a branch current during [`Device::init`]; the circuit converts
/// the request into an allocated variable index while finalizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtraVar {
    /// No branch current needed.
    #[default]
    None,
    /// Allocation requested, not yet granted.
    Requested,
    /// Granted variable index.
    Allocated(usize),
}

impl ExtraVar {
    /// The allocated index, if one has been granted.
    pub fn index(self) -> Option<usize> {
        match self {
            ExtraVar::Allocated(i) => Some(i),
            _ => None,
        }
    }
}

/// A circuit element that contributes stamps to the MNA system.
///
/// The analysis drivers invoke these operations uniformly and never
/// inspect concrete device types. Linear devices ignore the iteration
/// state they are handed; memoryless devices inherit the default
/// `stamp_transient` (delegates to the DC stamp at the previous-step
/// solution) and `update_state` (no-op). Device-owned memory is released
/// by `Drop`.
pub trait Device: fmt::Debug {
    /// Device name, for display only (e.g. "R1").
    fn name(&self) -> &str;

    /// One-shot setup at finalization time.
    ///
    /// A device that needs a branch current sets its extra variable to
    /// [`ExtraVar::Requested`] here.
    fn init(&mut self) {}

    /// The device's branch-current slot.
    fn extra_var(&self) -> ExtraVar {
        ExtraVar::None
    }

    /// Grant the requested branch-current variable.
    fn assign_extra_var(&mut self, _index: usize) {}

    /// Rewrite every terminal reference through `map`.
    ///
    /// [`Circuit::finalize`](crate::Circuit::finalize) uses this to
    /// convert node indices into variable indices.
    fn remap_terminals(&mut self, map: &dyn Fn(Terminal) -> Terminal);

    /// Stamp the device linearized at the current Newton guess.
    fn stamp_nonlinear(&self, ctx: &mut StampContext, it: &IterationState<'_>);

    /// Stamp the device's companion model for a transient step.
    fn stamp_transient(&self, ctx: &mut StampContext, step: &TimeStepState<'_>) {
        self.stamp_nonlinear(ctx, &step.as_iteration());
    }

    /// Shift stored history after a converged transient step.
    fn update_state(&mut self, _x: &DVector<f64>, _step: &TimeStepState<'_>) {}
}
