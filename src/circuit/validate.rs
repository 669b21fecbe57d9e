//! Circuit validation.

use crate::error::{Result, SolverError};

use super::{Circuit, NodeId};

/// Check that node ids are dense before the nodal matrix is sized.
///
/// Every id from 0 to the highest referenced id must be used by some
/// component, otherwise the matrix would contain an all-zero row.
pub fn validate_circuit(circuit: &Circuit) -> Result<()> {
    let Some(highest) = circuit.highest_node_id() else {
        return Ok(());
    };

    if circuit.node_count() == highest.index() + 1 {
        return Ok(());
    }

    let missing = (0..highest.index())
        .map(NodeId)
        .find(|node| !circuit.unique_nodes.contains(node))
        .unwrap_or(highest);

    Err(SolverError::NodeGap { missing, highest })
}
