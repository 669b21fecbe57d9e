//! Branch-current inference between two nodes.
//!
//! Voltage sources and conducting diodes are solved as supernode
//! constraints, so no unknown holds their current. It is reconstructed from
//! the neighbours at one of their terminals by KCL.

use log::warn;

use crate::circuit::{carries_own_current, Capability, Circuit, NodeId};
use crate::components::Component;

impl Circuit {
    /// Best-effort current flowing from `node1` to `node2`.
    ///
    /// If a resistor or current-like component spans exactly these nodes its
    /// own current is returned. Otherwise the first of the two nodes whose
    /// neighbours are all resistors, except for one component and any fixed
    /// points or current sources, is used as a KCL junction.
    ///
    /// This is a heuristic. It is exact for series junctions and returns 0
    /// (with a warning) when neither node qualifies.
    ///
    /// A component whose terminals both touch other constraint-only
    /// components has no junction to sum over. The middle diode of a chain
    /// of three conducting diodes reads 0 even though current flows through
    /// it, and the diode loop may switch such a diode off on its next
    /// re-check.
    pub fn get_current_through(&self, node1: impl Into<NodeId>, node2: impl Into<NodeId>) -> f64 {
        let (node1, node2) = (node1.into(), node2.into());
        let many_nodes = self.node_count() > 2;

        if many_nodes {
            if let Some(current) = self.spanning_current(node1, node2) {
                return current;
            }
        }

        for junction in [node1, node2] {
            if let Some(current) = self.junction_current(junction, node1, node2, many_nodes) {
                return current;
            }
        }

        warn!(
            "Cannot infer current from {node1} to {node2}: neither node is a series junction of resistors"
        );
        0.0
    }

    /// Current of a resistor or current-like component across the pair.
    fn spanning_current(&self, node1: NodeId, node2: NodeId) -> Option<f64> {
        self.components_at(node1).iter().find_map(|&id| {
            let c = &self.components[id.0];
            if !carries_own_current(c) {
                return None;
            }
            if c.node1() == node1 && c.node2() == node2 {
                Some(self.current(id))
            } else if c.node1() == node2 && c.node2() == node1 {
                Some(-self.current(id))
            } else {
                None
            }
        })
    }

    /// KCL sum at `junction`, if it qualifies.
    fn junction_current(
        &self,
        junction: NodeId,
        node1: NodeId,
        node2: NodeId,
        many_nodes: bool,
    ) -> Option<f64> {
        let neighbours = self.components_at(junction);
        let mut resistors = 0;
        let mut exempt = 0;
        let mut total = 0.0;

        for &id in neighbours {
            let c = &self.components[id.0];
            let counted = !(many_nodes && spans(c, node1, node2));

            if c.has(Capability::FixedVoltage) {
                exempt += 1;
            } else if c.acts_as_resistor() {
                resistors += 1;
                if counted {
                    total += signed(c, node1, node2, self.current(id));
                }
            } else if c.has(Capability::Current) {
                exempt += 1;
                if counted {
                    total += signed(c, node1, node2, self.current(id));
                }
            }
        }

        let valid = resistors > 0 && neighbours.len().checked_sub(1 + exempt) == Some(resistors);
        valid.then_some(total)
    }
}

fn spans(c: &Component, node1: NodeId, node2: NodeId) -> bool {
    (c.node1() == node1 && c.node2() == node2) || (c.node1() == node2 && c.node2() == node1)
}

/// Contribution of a neighbour's own current to the measured current.
fn signed(c: &Component, node1: NodeId, node2: NodeId, current: f64) -> f64 {
    if c.node1() == node1 || c.node2() == node2 {
        -current
    } else {
        current
    }
}
