//! Condition assembly: one stamping pass per capability.
//!
//! The passes run in a fixed order and each may overwrite rows written by
//! the ones before it:
//!
//! 1. Resistive: admittance stamps, then diagonals negated so every row
//!    reads "sum of currents into the node = 0".
//! 2. Current: source currents moved to the right-hand side.
//! 3. Voltage difference: node1's KCL row folded into node2's (the
//!    supernode row), the freed row replaced by `V1 - V2 = V`.
//! 4. Fixed voltage: the supernode's KCL row replaced by `V1 = V`. A second
//!    pin on the same supernode is skipped.
//!
//! Fixed points must come last so no earlier pass clobbers a pinned row.
//!
//! Once nodes are merged into a supernode their shared KCL equation lives in
//! a single row. [`KclRows`] tracks which one, so a second source or a pin
//! on the same supernode lands on the KCL row instead of a constraint row.

use log::debug;

use crate::circuit::{Capability, Circuit};

use super::NodalMatrix;

/// Build the nodal system for the current component states.
pub fn assemble(circuit: &Circuit, steady_state: bool) -> NodalMatrix {
    let size = circuit.highest_node_id().map_or(0, |n| n.index() + 1);
    let mut matrix = NodalMatrix::new(size);
    let mut rows = KclRows::new(size);

    stamp_resistive(circuit, &mut matrix, steady_state);
    stamp_currents(circuit, &mut matrix, steady_state);
    stamp_voltage_differences(circuit, &mut matrix, &mut rows);
    stamp_fixed_voltages(circuit, &mut matrix, &mut rows);

    matrix
}

/// Row holding the KCL equation of each node's supernode, `None` once a
/// pin has replaced it.
#[derive(Debug)]
pub struct KclRows {
    row: Vec<Option<usize>>,
}

impl KclRows {
    /// Every node starts as its own supernode.
    pub fn new(size: usize) -> Self {
        Self {
            row: (0..size).map(Some).collect(),
        }
    }

    pub fn of(&self, node: usize) -> Option<usize> {
        self.row[node]
    }

    fn replace(&mut self, from: usize, to: Option<usize>) {
        for row in &mut self.row {
            if *row == Some(from) {
                *row = to;
            }
        }
    }
}

/// Stamp every resistive or Hi-Z component.
pub fn stamp_resistive(circuit: &Circuit, matrix: &mut NodalMatrix, steady_state: bool) {
    for component in circuit.components() {
        let Some(resistance) = component.stamp_resistance(steady_state) else {
            continue;
        };
        let n1 = component.node1().index();
        let n2 = component.node2().index();
        // A resistor across a single node carries nothing
        if n1 == n2 {
            continue;
        }

        let g = 1.0 / resistance;
        for node in [n1, n2] {
            matrix.add(node, n1, g);
            matrix.add(node, n2, g);
        }
    }

    for row in 0..matrix.size {
        let diagonal = matrix.get(row, row);
        matrix.set(row, row, -diagonal);
        matrix.b[row] = 0.0;
    }
}

/// Move source currents to the right-hand side.
pub fn stamp_currents(circuit: &Circuit, matrix: &mut NodalMatrix, steady_state: bool) {
    for &id in circuit.bucket(Capability::Current) {
        let component = &circuit.components()[id.0];
        let Some(current) = component.injected_current(steady_state) else {
            continue;
        };
        matrix.b[component.node1().index()] += current;
        matrix.b[component.node2().index()] -= current;
    }
}

/// Fold each voltage-difference pair into a supernode.
pub fn stamp_voltage_differences(circuit: &Circuit, matrix: &mut NodalMatrix, rows: &mut KclRows) {
    for &id in circuit.bucket(Capability::VoltageDifference) {
        let component = &circuit.components()[id.0];
        let Some(voltage) = component.enforced_voltage_difference() else {
            continue;
        };
        let n1 = component.node1().index();
        let n2 = component.node2().index();

        let target = match (rows.of(n1), rows.of(n2)) {
            (Some(r1), Some(r2)) if r1 != r2 => {
                matrix.add_row_into(r1, r2);
                rows.replace(r1, Some(r2));
                r1
            }
            // Closes a loop of sources: no KCL row is left to free
            _ => {
                debug!("{} closes a loop of voltage constraints", id);
                n1
            }
        };

        matrix.clear_row(target);
        matrix.set(target, n1, 1.0);
        matrix.add(target, n2, -1.0);
        matrix.b[target] = voltage;
    }
}

/// Pin every enabled ground and fixed node.
pub fn stamp_fixed_voltages(circuit: &Circuit, matrix: &mut NodalMatrix, rows: &mut KclRows) {
    for &id in circuit.bucket(Capability::FixedVoltage) {
        let component = &circuit.components()[id.0];
        let Some(voltage) = component.pinned_voltage() else {
            continue;
        };
        let n1 = component.node1().index();

        // A supernode already pinned elsewhere has no KCL row left, and its
        // other rows are constraints that must survive
        let Some(target) = rows.of(n1) else {
            debug!("{} pins a node whose voltage is already fixed, skipped", id);
            continue;
        };
        rows.replace(target, None);

        matrix.clear_row(target);
        matrix.set(target, n1, 1.0);
        matrix.b[target] = voltage;
    }
}
