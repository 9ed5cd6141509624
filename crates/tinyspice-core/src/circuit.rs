//! Circuit topology and the finalization protocol.

use indexmap::IndexMap;

use crate::device::{Device, ExtraVar};
use crate::error::{Error, Result};
use crate::node::{Node, Terminal};

/// Recognized spellings of the reference node.
fn is_ground_name(name: &str) -> bool {
    name == "0" || name.eq_ignore_ascii_case("gnd") || name.eq_ignore_ascii_case("ground")
}

/// A circuit: named nodes, devices, and (after finalization) the MNA
/// variable space.
///
/// Nodes and devices are kept in insertion order; node 0 is always
/// ground. [`finalize`](Circuit::finalize) assigns variable indices,
/// runs device `init` hooks, grants branch-current variables, and
/// rewrites device terminals into the variable space. After that the
/// topology is frozen.
#[derive(Debug)]
pub struct Circuit {
    /// Nodes keyed by name, in insertion order; slot 0 is ground.
    nodes: IndexMap<String, Node>,
    devices: Vec<Box<dyn Device>>,
    num_vars: usize,
    num_extra_vars: usize,
    finalized: bool,
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

impl Circuit {
    /// Create an empty circuit with the ground node pre-seeded.
    pub fn new() -> Self {
        let mut nodes = IndexMap::new();
        nodes.insert("0".to_string(), Node::new("0"));
        Self {
            nodes,
            devices: Vec::new(),
            num_vars: 0,
            num_extra_vars: 0,
            finalized: false,
        }
    }

    /// Add a node by name, returning its index.
    ///
    /// Ground aliases ("0", "gnd", "ground", case-insensitive) always
    /// map to index 0. Adding an existing name returns the existing
    /// index. Rejected once the circuit is finalized.
    pub fn add_node(&mut self, name: &str) -> Result<usize> {
        if self.finalized {
            return Err(Error::CircuitFinalized);
        }
        if is_ground_name(name) {
            return Ok(0);
        }
        if let Some(index) = self.nodes.get_index_of(name) {
            return Ok(index);
        }
        let index = self.nodes.len();
        self.nodes.insert(name.to_string(), Node::new(name));
        Ok(index)
    }

    /// Look up a node index by name.
    pub fn get_node(&self, name: &str) -> Option<usize> {
        if is_ground_name(name) {
            return Some(0);
        }
        self.nodes.get_index_of(name)
    }

    /// The node at `node_index`, if it exists.
    pub fn node(&self, node_index: usize) -> Option<&Node> {
        self.nodes.get_index(node_index).map(|(_, node)| node)
    }

    /// The MNA variable index assigned to a node.
    ///
    /// `None` for ground, unknown indices, and before finalization.
    pub fn var_index(&self, node_index: usize) -> Option<usize> {
        self.node(node_index).and_then(Node::var_index)
    }

    /// Iterate nodes in insertion order, ground first.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Number of nodes, including ground.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Add a device. Rejected once the circuit is finalized.
    pub fn add_device(&mut self, device: Box<dyn Device>) -> Result<()> {
        if self.finalized {
            return Err(Error::CircuitFinalized);
        }
        self.devices.push(device);
        Ok(())
    }

    /// The devices, in insertion order.
    pub fn devices(&self) -> &[Box<dyn Device>] {
        &self.devices
    }

    /// Mutable device access, for transient state updates.
    pub fn devices_mut(&mut self) -> &mut [Box<dyn Device>] {
        &mut self.devices
    }

    pub fn num_devices(&self) -> usize {
        self.devices.len()
    }

    /// Total MNA variables. Zero before finalization.
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Branch-current variables granted at finalization.
    pub fn num_extra_vars(&self) -> usize {
        self.num_extra_vars
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Assign the MNA variable space and prepare devices for analysis.
    ///
    /// Non-ground nodes receive variable indices `0..` in insertion
    /// order; each device runs its `init` hook; requested branch
    /// currents are granted indices above the node block; finally every
    /// device's terminals are rewritten from node indices to variable
    /// indices. Fails when there are no non-ground nodes, or when the
    /// circuit is already finalized.
    pub fn finalize(&mut self) -> Result<()> {
        if self.finalized {
            return Err(Error::CircuitFinalized);
        }

        let mut var_index = 0;
        for (i, node) in self.nodes.values_mut().enumerate() {
            if i == 0 {
                continue; // ground stays index-free
            }
            node.set_var_index(var_index);
            var_index += 1;
        }
        if var_index == 0 {
            return Err(Error::EmptyCircuit);
        }
        self.num_vars = var_index;

        self.num_extra_vars = 0;
        for device in &mut self.devices {
            device.init();
            if device.extra_var() == ExtraVar::Requested {
                device.assign_extra_var(self.num_vars + self.num_extra_vars);
                self.num_extra_vars += 1;
            }
        }
        self.num_vars += self.num_extra_vars;

        let var_of: Vec<Option<usize>> = self.nodes.values().map(Node::var_index).collect();
        for device in &mut self.devices {
            device.remap_terminals(&|terminal| match terminal {
                Terminal::Node(i) => match var_of.get(i).copied().flatten() {
                    Some(v) => Terminal::Var(v),
                    None => Terminal::Ground,
                },
                other => other,
            });
        }

        self.finalized = true;
        Ok(())
    }
}
