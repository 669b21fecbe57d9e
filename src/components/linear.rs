//! Linear passive components: Resistor, Capacitor, Inductor.

use crate::solver::{
    CAPACITOR_INITIAL_RESISTANCE, INDUCTOR_INITIAL_RESISTANCE, MIN_RESISTANCE,
};

/// Smallest capacitance or inductance accepted, keeps companion models finite.
const MIN_STORAGE: f64 = 1e-15;

/// A resistor component.
#[derive(Debug, Clone, PartialEq)]
pub struct Resistor {
    pub resistance: f64,
}

impl Resistor {
    /// Create a new resistor.
    pub fn new(resistance: f64) -> Self {
        Self {
            resistance: resistance.max(MIN_RESISTANCE), // Minimum resistance to avoid singularity
        }
    }

    /// Get the conductance (1/R).
    pub fn conductance(&self) -> f64 {
        1.0 / self.resistance
    }
}

/// A capacitor component.
///
/// Discretized with backward Euler into a Norton pair between its nodes:
///   i(n) = (C/dt) * v(n) - (C/dt) * v(n-1)
///
/// giving a companion resistance R_eq = dt/C in parallel with a current
/// source I_eq = -v(n-1) / R_eq flowing from node1 to node2, where
/// v = V(node1) - V(node2).
///
/// An uncharged capacitor starts as a near short with no source until the
/// first tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Capacitor {
    pub capacitance: f64,
    /// Companion resistance currently stamped
    pub resistance: f64,
    /// Companion current source, node1 -> node2
    pub source_current: f64,
}

impl Capacitor {
    /// Create a new, uncharged capacitor.
    pub fn new(capacitance: f64) -> Self {
        Self {
            capacitance: capacitance.max(MIN_STORAGE),
            resistance: CAPACITOR_INITIAL_RESISTANCE,
            source_current: 0.0,
        }
    }

    /// Companion resistance for a step of `dt` seconds.
    pub fn companion_resistance(&self, dt: f64) -> f64 {
        dt / self.capacitance
    }

    /// Current through the companion pair for `v = V1 - V2`.
    pub fn branch_current(&self, v: f64) -> f64 {
        v / self.resistance + self.source_current
    }

    /// Advance one step from the last solved voltage `v = V1 - V2`.
    pub fn update_state(&mut self, v: f64, dt: f64) {
        self.resistance = self.companion_resistance(dt);
        self.source_current = -v / self.resistance;
    }

    /// Stored energy, 1/2 C V^2.
    pub fn energy(&self, v: f64) -> f64 {
        0.5 * self.capacitance * v * v
    }
}

/// An inductor component.
///
/// Discretized with backward Euler into a Norton pair:
///   i(n) = (dt/L) * v(n) + i(n-1)
///
/// giving a companion resistance R_eq = L/dt in parallel with a current
/// source I_eq = i(n-1) from node1 to node2.
///
/// A de-energized inductor starts open with no source until the first tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Inductor {
    pub inductance: f64,
    /// Companion resistance currently stamped
    pub resistance: f64,
    /// Companion current source, node1 -> node2
    pub source_current: f64,
}

impl Inductor {
    /// Create a new inductor carrying no current.
    pub fn new(inductance: f64) -> Self {
        Self {
            inductance: inductance.max(MIN_STORAGE),
            resistance: INDUCTOR_INITIAL_RESISTANCE,
            source_current: 0.0,
        }
    }

    /// Companion resistance for a step of `dt` seconds.
    pub fn companion_resistance(&self, dt: f64) -> f64 {
        self.inductance / dt
    }

    /// Current through the companion pair for `v = V1 - V2`.
    pub fn branch_current(&self, v: f64) -> f64 {
        v / self.resistance + self.source_current
    }

    /// Advance one step from the last solved voltage `v = V1 - V2`.
    pub fn update_state(&mut self, v: f64, dt: f64) {
        // Current at the end of the step that was just solved
        let i = self.branch_current(v);
        self.resistance = self.companion_resistance(dt);
        self.source_current = i;
    }

    /// Stored energy, 1/2 L I^2.
    pub fn energy(&self, i: f64) -> f64 {
        0.5 * self.inductance * i * i
    }
}
