//! Circuit graph representation and validation.
//!
//! This module provides the container a host populates with components.
//! The [`Circuit`] struct holds the component arena, the node adjacency and
//! the per-capability buckets, plus the results of the last solve.

mod graph;
mod readout;
mod types;
mod validate;

pub(crate) use readout::carries_own_current;

pub use graph::Circuit;
pub use types::*;
pub use validate::validate_circuit;
