//! Solve driver: settings, automatic grounding, ticking.

use log::{debug, trace};

use crate::circuit::{validate_circuit, Capability, Circuit};
use crate::components::Component;
use crate::error::{Result, SolverError};

use super::conditions::assemble;
use super::nonlinear::DiodeLoop;
use super::{DEFAULT_MAX_ITERATIONS, DEFAULT_RESET_DIODES_EVERY_N_TICKS, DEFAULT_TIME_STEP};

/// Configuration for a circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitSettings {
    /// Maximum linear solves per `solve()`, the first one included.
    pub max_iterations: usize,
    /// Force every diode back to Hi-Z when `ticks % n == 0`. 0 disables.
    pub reset_diodes_every_n_ticks: u64,
    /// Companion-model time step in seconds.
    pub time_step: f64,
}

impl Default for CircuitSettings {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            reset_diodes_every_n_ticks: DEFAULT_RESET_DIODES_EVERY_N_TICKS,
            time_step: DEFAULT_TIME_STEP,
        }
    }
}

impl CircuitSettings {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum solves per `solve()`.
    ///
    /// A value of 1 disables diode re-classification entirely. Each extra
    /// iteration lets one more round of diode flips settle.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the diode reset cadence in ticks (0 disables).
    pub fn with_reset_diodes_every_n_ticks(mut self, n: u64) -> Self {
        self.reset_diodes_every_n_ticks = n;
        self
    }

    /// Set the companion-model time step (in seconds).
    pub fn with_time_step(mut self, time_step: f64) -> Self {
        self.time_step = time_step;
        self
    }

    /// Check the values can be used.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(SolverError::invalid_setting(
                "max_iterations must be at least 1",
            ));
        }
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(SolverError::invalid_setting(format!(
                "time_step must be a positive number of seconds, got {}",
                self.time_step
            )));
        }
        Ok(())
    }
}

impl Circuit {
    /// Recompute nodal voltages for the current topology and state.
    ///
    /// May insert or toggle a ground (see [`Circuit::auto_ground`]) and flip diode
    /// Hi-Z states. An unsettled diode loop is not an error; a singular
    /// system or a gap in the node ids is.
    pub fn solve(&mut self) -> Result<()> {
        self.update_auto_ground();

        let every = self.settings.reset_diodes_every_n_ticks;
        if every > 0 && self.ticks % every == 0 && !self.non_linear.is_empty() {
            debug!(
                "Resetting {} diodes to Hi-Z at tick {}",
                self.non_linear.len(),
                self.ticks
            );
            for i in 0..self.non_linear.len() {
                let id = self.non_linear[i];
                if !self.components[id.0].is_hi_z() {
                    self.set_hi_z(id, true);
                }
            }
        }

        self.nodal_voltages = self.solve_helper(false)?;
        DiodeLoop::new(self.settings.max_iterations).run(self)?;
        self.solved = true;
        Ok(())
    }

    /// Advance every capacitor and inductor by one time step from the last
    /// solved voltages. Does not re-solve.
    pub fn tick(&mut self) {
        self.ticks += 1;
        let dt = self.settings.time_step;
        for i in 0..self.ticking.len() {
            let id = self.ticking[i];
            let component = &self.components[id.0];
            let v = self.v(component.node1()) - self.v(component.node2());
            self.components[id.0].tick(v, dt);
        }
    }

    /// Nodal voltages with capacitors fully charged (open) and inductors
    /// fully fluxed (short).
    ///
    /// Cached until a diode flips or a component is changed.
    pub fn get_steady_state_nodal_voltages(&mut self) -> Result<&[f64]> {
        let voltages = match self.steady_state.take() {
            Some(voltages) => voltages,
            None => {
                self.update_auto_ground();
                self.solve_helper(true)?
            }
        };
        Ok(self.steady_state.insert(voltages).as_slice())
    }

    /// One linear solve. Returns voltages indexed by node id.
    pub(crate) fn solve_helper(&self, steady_state: bool) -> Result<Vec<f64>> {
        validate_circuit(self)?;

        let n = self.node_count();
        if n < 2 || self.energy_source_count == 0 {
            return Ok(vec![0.0; n]);
        }

        trace!("Solving {n}x{n} nodal system (steady state: {steady_state})");
        let mut matrix = assemble(self, steady_state);
        match matrix.factor_and_solve() {
            Ok(x) => Ok(x.to_vec()),
            Err(SolverError::SingularTopology(mut dump)) => {
                dump.ground_inserted = self
                    .auto_ground
                    .is_some_and(|id| !self.components[id.0].is_disabled());
                dump.steady_state = steady_state;
                Err(SolverError::SingularTopology(dump))
            }
            Err(e) => Err(e),
        }
    }

    /// Keep a ground in place exactly while energy is present and no other
    /// enabled ground or fixed node pins a voltage.
    ///
    /// Decided again on every solve: an inserted ground is disabled once the
    /// host enables a pin of its own, and re-enabled when that pin goes away.
    /// The anchor is node2 of the first voltage source, or failing that of
    /// the first current-like component.
    fn update_auto_ground(&mut self) {
        let auto = self.auto_ground;
        let pinned = self
            .bucket(Capability::FixedVoltage)
            .iter()
            .any(|&id| Some(id) != auto && !self.components[id.0].is_disabled());
        let wanted = self.energy_source_count > 0 && !pinned;

        if let Some(ground) = auto {
            if self.components[ground.0].is_disabled() == wanted {
                debug!(
                    "{} inserted ground at {}",
                    if wanted { "Re-enabling" } else { "Disabling" },
                    self.components[ground.0].node1()
                );
                self.set_disabled(ground, !wanted);
            }
            return;
        }
        if !wanted {
            return;
        }

        let anchor = self
            .bucket(Capability::VoltageDifference)
            .iter()
            .find(|id| !self.components[id.0].is_non_linear())
            .or_else(|| self.bucket(Capability::Current).first())
            .map(|id| self.components[id.0].node2());
        let Some(node) = anchor else {
            return;
        };

        let ground = self.add_component(Component::ground().named("auto ground"), node, node);
        self.auto_ground = Some(ground);
        debug!("No fixed-voltage point, inserted ground at {node}");
    }
}
