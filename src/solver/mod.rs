//! Nodal solver.
//!
//! This module provides the numerical engine for circuit simulation.
//!
//! ## Nodal analysis without branch currents
//!
//! Every node gets one row and one column; there are no extra unknowns for
//! voltage sources. The system Ax = b is built by stamping passes (see
//! [`conditions`]):
//!
//! ```text
//! resistive   row n:   sum over neighbours of (V_k - V_n) / R = 0
//! current     b[n1] += I, b[n2] -= I
//! difference  row n1 + row n2 -> supernode KCL, freed row: V1 - V2 = V
//! fixed       supernode KCL row -> V1 = V
//! ```
//!
//! Diodes flip between a Hi-Z resistor and an ideal voltage drop; after each
//! solve their states are re-checked and the system re-solved, a bounded
//! number of times (see [`DiodeLoop`]).
//!
//! Capacitors and inductors use backward-Euler companion models updated by
//! `Circuit::tick`.

pub mod conditions;
mod inference;
mod matrix;
mod nonlinear;
mod simulator;

pub use matrix::NodalMatrix;
pub use nonlinear::DiodeLoop;
pub use simulator::CircuitSettings;

/// Resistance substituted for a component in Hi-Z.
pub const HI_Z_RESISTANCE: f64 = 1e9;

/// Steady-state stand-in for a fully charged capacitor.
pub const OPEN_CIRCUIT_RESISTANCE: f64 = 1e9;

/// Steady-state stand-in for a fully fluxed inductor.
pub const SHORT_CIRCUIT_RESISTANCE: f64 = 1e-9;

/// Companion resistance of an uncharged capacitor before its first tick.
pub const CAPACITOR_INITIAL_RESISTANCE: f64 = 1e-3;

/// Companion resistance of a de-energized inductor before its first tick.
pub const INDUCTOR_INITIAL_RESISTANCE: f64 = 1e9;

/// Minimum resistance to prevent infinite conductance.
pub const MIN_RESISTANCE: f64 = 1e-12;

/// A pivot this small relative to its row's largest entry is singular.
pub const PIVOT_TOLERANCE: f64 = 1e-14;

/// Default solves per `Circuit::solve`.
pub const DEFAULT_MAX_ITERATIONS: usize = 2;

/// Default diode reset cadence, in ticks.
pub const DEFAULT_RESET_DIODES_EVERY_N_TICKS: u64 = 2;

/// Default companion-model time step (seconds).
pub const DEFAULT_TIME_STEP: f64 = 0.05;
