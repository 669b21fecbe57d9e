//! Per-component results read from the last solve.
//!
//! Sign conventions: currents are positive flowing node1 -> node2 through
//! the component. Voltages are reported as `V(node2) - V(node1)`, the
//! negative of the naive drop, except for sources and fixed points which
//! report their own value.

use super::{Circuit, ComponentId, NodeId};
use crate::components::{Component, ComponentKind};
use crate::solver::HI_Z_RESISTANCE;

impl Circuit {
    /// Voltage across a component.
    pub fn voltage(&self, id: ComponentId) -> f64 {
        let c = &self.components[id.0];
        match c.kind() {
            ComponentKind::VoltageSource(v) if !c.is_hi_z() => v.effective_voltage(c.is_disabled()),
            ComponentKind::Ground => 0.0,
            ComponentKind::FixedNode(n) if !c.is_disabled() => n.voltage,
            ComponentKind::FixedNode(_) => self.v(c.node1()),
            _ => self.v(c.node2()) - self.v(c.node1()),
        }
    }

    /// Current through a component, node1 -> node2 positive.
    ///
    /// Voltage sources and conducting diodes have no current unknown of
    /// their own; theirs is inferred with [`Circuit::get_current_through`]
    /// and is only as good as that heuristic.
    pub fn current(&self, id: ComponentId) -> f64 {
        let c = &self.components[id.0];
        let drop = self.v(c.node1()) - self.v(c.node2());

        if c.is_hi_z() && !c.kind().is_mono_node() {
            return drop / HI_Z_RESISTANCE;
        }
        match c.kind() {
            ComponentKind::Resistor(r) => drop / r.resistance,
            ComponentKind::CurrentSource(i) => i.effective_current(c.is_disabled()),
            ComponentKind::Capacitor(cap) => cap.branch_current(drop),
            ComponentKind::Inductor(l) => l.branch_current(drop),
            ComponentKind::VoltageSource(_) | ComponentKind::Diode(_) => {
                self.get_current_through(c.node1(), c.node2())
            }
            ComponentKind::Ground | ComponentKind::FixedNode(_) => self.injected_current(id),
        }
    }

    /// Power dissipated or delivered, always non-negative.
    pub fn power(&self, id: ComponentId) -> f64 {
        (self.voltage(id) * self.current(id)).abs()
    }

    /// Stored energy, or `None` where it cannot be determined.
    pub fn energy(&self, id: ComponentId) -> Option<f64> {
        let c = &self.components[id.0];
        match c.kind() {
            ComponentKind::Capacitor(cap) => Some(cap.energy(self.voltage(id))),
            ComponentKind::Inductor(l) => Some(l.energy(self.current(id))),
            ComponentKind::Ground => Some(0.0),
            ComponentKind::FixedNode(n) if n.voltage == 0.0 => Some(0.0),
            _ => None,
        }
    }

    /// Current a ground or fixed node pushes into its node, summed over the
    /// resistive and current-source neighbours there.
    fn injected_current(&self, id: ComponentId) -> f64 {
        let node = self.components[id.0].node1();
        self.components_at(node)
            .iter()
            .filter(|&&other| other != id)
            .map(|&other| (other, &self.components[other.0]))
            .filter(|(_, c)| carries_own_current(c))
            .map(|(other, c)| leaving(c, node, self.current(other)))
            .sum()
    }
}

/// Current has a direct formula, no inference needed.
pub(crate) fn carries_own_current(c: &Component) -> bool {
    c.acts_as_resistor() || c.has(crate::circuit::Capability::Current)
}

/// Current leaving `node` through `c`, given its node1 -> node2 current.
fn leaving(c: &Component, node: NodeId, current: f64) -> f64 {
    if c.node1() == node {
        current
    } else {
        -current
    }
}
