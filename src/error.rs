//! Error types for the nodal circuit solver.
//!
//! This module provides a unified error type [`SolverError`] that covers
//! every failure the engine reports: unsolvable topologies, node numbering
//! that violates the dense-id invariant, and unusable settings.

use std::fmt;

use thiserror::Error;

use crate::circuit::NodeId;

/// Result type alias using [`SolverError`].
pub type Result<T> = std::result::Result<T, SolverError>;

/// Unified error type for all solver operations.
#[derive(Error, Debug)]
pub enum SolverError {
    // ============ Topology Errors ============
    /// The assembled system `A x = b` has no unique solution.
    #[error("{0}")]
    SingularTopology(Box<SingularTopology>),

    /// Node ids are not dense: `missing` is below the highest id but no
    /// component references it.
    #[error("Node {missing} is not referenced by any component (highest node is {highest}); node ids must be dense")]
    NodeGap { missing: NodeId, highest: NodeId },

    // ============ Configuration Errors ============
    /// A setting or component parameter that cannot be used.
    #[error("Invalid setting: {message}")]
    InvalidSetting { message: String },
}

impl SolverError {
    /// Create an invalid setting error
    pub fn invalid_setting(message: impl Into<String>) -> Self {
        Self::InvalidSetting {
            message: message.into(),
        }
    }

    /// Check if this error reports an unsolvable topology.
    pub fn is_singular(&self) -> bool {
        matches!(self, SolverError::SingularTopology(_))
    }
}

/// Diagnostic dump for a singular nodal system.
#[derive(Debug, Clone)]
pub struct SingularTopology {
    /// The assembled conductance matrix, one `Vec` per row.
    pub matrix: Vec<Vec<f64>>,
    /// The assembled right-hand side.
    pub rhs: Vec<f64>,
    /// A ground was inserted automatically because none was present.
    pub ground_inserted: bool,
    /// The failing solve was the steady-state solve.
    pub steady_state: bool,
}

impl fmt::Display for SingularTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Circuit solving failure: matrix cannot be solved")?;
        writeln!(f, "Singular matrix attempting to solve Ax = b")?;
        writeln!(f)?;
        writeln!(f, "Value of A:")?;
        for row in &self.matrix {
            let cells: Vec<String> = row.iter().map(|v| format!("{v:>12.4e}")).collect();
            writeln!(f, "  [{}]", cells.join(" "))?;
        }
        writeln!(f)?;
        writeln!(f, "Value of b:")?;
        for value in &self.rhs {
            writeln!(f, "  [{value:>12.4e}]")?;
        }
        if self.ground_inserted {
            writeln!(f, "Note: circuit does not have a ground, one was auto-added")?;
        }
        write!(f, "Note: steady state: {}", self.steady_state)
    }
}
