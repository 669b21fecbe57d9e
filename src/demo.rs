//! Reference circuits for the CLI frontend.
//!
//! Each circuit is built through the public API the way a host would, then
//! solved and stepped. The report lists nodal voltages and per-component
//! readings.

use std::fmt::Write;

use clap::ValueEnum;

use crate::circuit::Circuit;
use crate::components::Component;
use crate::error::Result;
use crate::solver::CircuitSettings;

/// Built-in circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReferenceCircuit {
    /// 10 V across two 1 k resistors in series
    Divider,
    /// 10 V charging 1 F through 100 ohms
    Rc,
    /// 10 V driving 1 H through 2 ohms
    Rl,
    /// 10 V through 100 ohms and a silicon diode into 1 ohm
    Diode,
}

impl ReferenceCircuit {
    /// Add this circuit's components to `circuit`.
    pub fn build(self, circuit: &mut Circuit) {
        circuit.add_component(Component::voltage_source(10.0).named("V1"), 1, 0);
        match self {
            ReferenceCircuit::Divider => {
                circuit.add_component(Component::resistor(1000.0).named("R1"), 1, 2);
                circuit.add_component(Component::resistor(1000.0).named("R2"), 2, 0);
            }
            ReferenceCircuit::Rc => {
                circuit.add_component(Component::resistor(100.0).named("R1"), 1, 2);
                circuit.add_component(Component::capacitor(1.0).named("C1"), 2, 0);
            }
            ReferenceCircuit::Rl => {
                circuit.add_component(Component::resistor(2.0).named("R1"), 1, 2);
                circuit.add_component(Component::inductor(1.0).named("L1"), 2, 0);
            }
            ReferenceCircuit::Diode => {
                circuit.add_component(Component::resistor(100.0).named("R1"), 1, 2);
                circuit.add_component(Component::diode(0.7).named("D1"), 2, 3);
                circuit.add_component(Component::resistor(1.0).named("R2"), 3, 0);
            }
        }
        circuit.add_component(Component::ground().named("GND"), 0, 0);
    }
}

/// Build, solve, then tick and re-solve `ticks` times.
pub fn run(reference: ReferenceCircuit, settings: CircuitSettings, ticks: u64) -> Result<Circuit> {
    let mut circuit = Circuit::with_settings(settings)?;
    reference.build(&mut circuit);

    circuit.solve()?;
    for _ in 0..ticks {
        circuit.tick();
        circuit.solve()?;
    }
    Ok(circuit)
}

/// Human-readable summary of a solved circuit.
pub fn report(circuit: &Circuit) -> String {
    let mut out = String::new();
    let elapsed = circuit.ticks() as f64 * circuit.settings().time_step;
    // Writing into a String cannot fail
    let _ = writeln!(out, "After {} ticks ({elapsed:.3} s)", circuit.ticks());

    let _ = writeln!(out, "Nodes:");
    for (node, v) in circuit.nodal_voltages().iter().enumerate() {
        let _ = writeln!(out, "  N{node:<4} {v:>12.6} V");
    }

    let _ = writeln!(out, "Components:");
    for (index, component) in circuit.components().iter().enumerate() {
        let id = crate::ComponentId(index);
        let _ = write!(
            out,
            "  {component}\n      V = {:.6} V, I = {:.6} A, P = {:.6} W",
            circuit.voltage(id),
            circuit.current(id),
            circuit.power(id)
        );
        if let Some(energy) = circuit.energy(id) {
            let _ = write!(out, ", E = {energy:.6} J");
        }
        let _ = writeln!(out);
    }
    out
}
