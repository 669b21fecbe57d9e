//! Fixed-point iteration for two-state diodes.

use log::{debug, trace};

use crate::circuit::{Circuit, ComponentId};
use crate::components::ComponentKind;
use crate::error::Result;

/// Re-classifies diodes after a solve and re-solves until their on/off
/// states agree with the voltages and currents they produce.
///
/// The loop is bounded: at most `max_iterations - 1` extra solves. When the
/// cap is hit the last solution is kept as is.
pub struct DiodeLoop {
    /// Maximum solves per `Circuit::solve`, the first one included
    pub max_iterations: usize,
}

impl DiodeLoop {
    /// Create a loop allowing `max_iterations` solves in total.
    pub fn new(max_iterations: usize) -> Self {
        Self { max_iterations }
    }

    /// Iterate on a circuit that has just been solved once.
    ///
    /// Returns the number of extra solves performed.
    pub fn run(&self, circuit: &mut Circuit) -> Result<usize> {
        if circuit.non_linear.is_empty() {
            return Ok(0);
        }

        let mut resolves = 0;
        for iteration in 1..self.max_iterations {
            let flips = self.flips(circuit);
            if flips.is_empty() {
                return Ok(resolves);
            }

            for &(id, hi_z) in &flips {
                trace!(
                    "Diode {} {} (iteration {})",
                    id,
                    if hi_z { "blocks" } else { "conducts" },
                    iteration
                );
                circuit.set_hi_z(id, hi_z);
            }
            circuit.steady_state = None;
            circuit.nodal_voltages = circuit.solve_helper(false)?;
            resolves += 1;
        }

        if !self.flips(circuit).is_empty() {
            debug!(
                "Diode states not settled after {} iterations, keeping last solution",
                self.max_iterations
            );
        }
        Ok(resolves)
    }

    /// Diodes whose assumed state disagrees with the last solution, paired
    /// with the Hi-Z flag they should take.
    ///
    /// Every diode is judged against the same solution before any flips.
    fn flips(&self, circuit: &Circuit) -> Vec<(ComponentId, bool)> {
        circuit
            .non_linear
            .iter()
            .filter_map(|&id| {
                let component = &circuit.components()[id.0];
                let ComponentKind::Diode(diode) = component.kind() else {
                    return None;
                };
                let conducts = diode.should_conduct(circuit.voltage(id), circuit.current(id));
                let hi_z = !conducts;
                (hi_z != component.is_hi_z()).then_some((id, hi_z))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Component;

    fn half_wave(forward: bool) -> (Circuit, ComponentId) {
        let mut circuit = Circuit::new();
        circuit.add_component(Component::voltage_source(10.0), 1, 0);
        circuit.add_component(Component::resistor(100.0), 1, 2);
        let d = if forward {
            circuit.add_component(Component::diode(0.7), 2, 3)
        } else {
            circuit.add_component(Component::diode(0.7), 3, 2)
        };
        circuit.add_component(Component::resistor(1.0), 3, 0);
        circuit.add_component(Component::ground(), 0, 0);
        (circuit, d)
    }

    #[test]
    fn test_forward_diode_switches_on() {
        let (mut circuit, d) = half_wave(true);
        circuit.set_hi_z(d, true);
        circuit.nodal_voltages = circuit.solve_helper(false).unwrap();

        let resolves = DiodeLoop::new(2).run(&mut circuit).unwrap();
        assert_eq!(resolves, 1);
        assert!(!circuit.component(d).unwrap().is_hi_z());
    }

    #[test]
    fn test_reverse_diode_stays_off() {
        let (mut circuit, d) = half_wave(false);
        circuit.set_hi_z(d, true);
        circuit.nodal_voltages = circuit.solve_helper(false).unwrap();

        let resolves = DiodeLoop::new(5).run(&mut circuit).unwrap();
        assert_eq!(resolves, 0);
        assert!(circuit.component(d).unwrap().is_hi_z());
    }

    #[test]
    fn test_single_iteration_never_resolves() {
        let (mut circuit, d) = half_wave(true);
        circuit.set_hi_z(d, true);
        circuit.nodal_voltages = circuit.solve_helper(false).unwrap();

        assert_eq!(DiodeLoop::new(1).run(&mut circuit).unwrap(), 0);
        assert!(circuit.component(d).unwrap().is_hi_z());
    }
}
