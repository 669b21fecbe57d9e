//! Core types for circuit representation.

use std::fmt;

/// A unique identifier for a node in the circuit.
///
/// Node ids are dense: if the highest id referenced is `N`, every id in
/// `0..=N` must be referenced by some component before the circuit is solved.
/// There is no implicit ground node; ground is a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Row/column of this node in the nodal matrix.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

impl From<usize> for NodeId {
    fn from(value: usize) -> Self {
        NodeId(value)
    }
}

/// Handle to a component stored in a [`Circuit`](super::Circuit).
///
/// Handles are issued by `add_component` and stay valid until the circuit
/// is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub usize);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// A condition a component imposes on the nodal equations.
///
/// Each capability has its own stamping pass; see [`crate::solver::conditions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    /// Admittance stamp `(V1 - V2) / R` into the KCL rows.
    Resistive,
    /// Fixed current injected from node1 to node2.
    Current,
    /// Supernode constraint `V1 - V2 = V`.
    VoltageDifference,
    /// Absolute pin `V1 = V`.
    FixedVoltage,
    /// Reserved for host-defined conditions; no built-in kind declares it.
    Custom,
}

impl Capability {
    /// Every capability, in bucket order.
    pub const ALL: [Capability; 5] = [
        Capability::Resistive,
        Capability::Current,
        Capability::VoltageDifference,
        Capability::FixedVoltage,
        Capability::Custom,
    ];

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Resistive => "resistive",
            Capability::Current => "current",
            Capability::VoltageDifference => "voltage-difference",
            Capability::FixedVoltage => "fixed-voltage",
            Capability::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// Set of [`Capability`] flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities(u8);

impl Capabilities {
    /// The empty set.
    pub const NONE: Capabilities = Capabilities(0);

    /// Build a set from a list of capabilities.
    pub fn of(capabilities: &[Capability]) -> Self {
        capabilities
            .iter()
            .fold(Self::NONE, |set, &cap| set.with(cap))
    }

    /// Return a copy with `capability` added.
    pub fn with(self, capability: Capability) -> Self {
        Capabilities(self.0 | capability.bit())
    }

    /// Check membership.
    pub fn contains(&self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    /// Iterate over the members in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL
            .into_iter()
            .filter(move |cap| self.contains(*cap))
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}
