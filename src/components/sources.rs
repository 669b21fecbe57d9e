//! Voltage and current sources, fixed nodes.

/// A voltage source component.
///
/// The source enforces V(node1) - V(node2) = voltage through a supernode
/// rather than an extra branch-current unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct VoltageSource {
    pub voltage: f64,
}

impl VoltageSource {
    /// Create a new voltage source.
    pub fn new(voltage: f64) -> Self {
        Self { voltage }
    }

    /// Voltage enforced across the terminals; a disabled source is a wire.
    pub fn effective_voltage(&self, disabled: bool) -> f64 {
        if disabled {
            0.0
        } else {
            self.voltage
        }
    }
}

/// A current source component.
///
/// Current sources add directly to the RHS vector of the nodal equations.
/// Current flows from node1 to node2 through the source.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentSource {
    pub current: f64,
}

impl CurrentSource {
    /// Create a new current source.
    pub fn new(current: f64) -> Self {
        Self { current }
    }

    /// Current driven through the source; a disabled source drives nothing.
    pub fn effective_current(&self, disabled: bool) -> f64 {
        if disabled {
            0.0
        } else {
            self.current
        }
    }
}

/// A node pinned to an absolute voltage. Only node1 is used.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedNode {
    pub voltage: f64,
}

impl FixedNode {
    /// Create a new fixed node.
    pub fn new(voltage: f64) -> Self {
        Self { voltage }
    }
}
