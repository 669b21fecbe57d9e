//! # Nodal Core
//!
//! A small-signal electrical network solver.
//!
//! This library provides:
//! - Two-terminal components: resistors, voltage and current sources,
//!   capacitors, inductors, diodes, grounds and fixed nodes
//! - Nodal analysis with supernodes for voltage sources (no branch-current
//!   unknowns)
//! - Backward-Euler companion models for energy storage, advanced by `tick`
//! - A bounded fixed-point loop for two-state diodes
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`circuit`] - Circuit graph, node validation and result queries
//! - [`components`] - Component models and their capabilities
//! - [`solver`] - Condition assembly, dense solve, diode loop, current inference
//! - [`demo`] - Reference circuits for the demo binary (CLI only)
//!
//! ## Usage
//!
//! A host owns the topology. It adds components between node ids, solves,
//! reads results, and ticks time forward between solves:
//!
//! ```
//! use nodal_core::{Circuit, Component};
//!
//! let mut circuit = Circuit::new();
//! circuit.add_component(Component::voltage_source(10.0), 1, 0);
//! let r1 = circuit.add_component(Component::resistor(1000.0), 1, 2);
//! circuit.add_component(Component::resistor(1000.0), 2, 0);
//! circuit.add_component(Component::ground(), 0, 0);
//!
//! circuit.solve()?;
//! assert!((circuit.current(r1) - 0.005).abs() < 1e-12);
//! assert!((circuit.nodal_voltage(2).unwrap() - 5.0).abs() < 1e-9);
//! # Ok::<(), nodal_core::SolverError>(())
//! ```
//!
//! Node ids must be dense: every id from 0 to the highest one used must be
//! referenced before `solve`. A circuit with energy but no ground gets one
//! inserted automatically.
//!
//! ## Sign Conventions
//!
//! node1 is the positive terminal. Currents are positive flowing node1 to
//! node2 through the component. Resistor voltages are reported as
//! `V(node2) - V(node1)`.

pub mod circuit;
pub mod components;
pub mod error;
pub mod solver;

#[cfg(feature = "cli")]
pub mod demo;

// Re-export main types for convenience
pub use circuit::{Circuit, ComponentId, NodeId};
pub use components::{Component, ComponentKind};
pub use error::{Result, SolverError};
pub use solver::{CircuitSettings, DEFAULT_TIME_STEP};
