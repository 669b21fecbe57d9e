//! Integration tests for purely resistive networks.

use approx::assert_abs_diff_eq;
use nodal_core::{Circuit, Component, ComponentId};

const EPSILON: f64 = 1e-6;

/// Series divider across a source:
///
/// ```text
///   node1 --R1-- node2 --R2-- ... --RN-- node0
///     |                                    |
///     +---------------- V -----------------+
/// ```
fn series_divider(source: f64, resistances: &[f64]) -> (Circuit, Vec<ComponentId>) {
    let mut circuit = Circuit::new();
    circuit.add_component(Component::voltage_source(source), 1, 0);

    let last = resistances.len();
    let resistors = resistances
        .iter()
        .enumerate()
        .map(|(i, &r)| {
            let from = i + 1;
            let to = if i + 1 == last { 0 } else { i + 2 };
            circuit.add_component(Component::resistor(r), from, to)
        })
        .collect();
    circuit.add_component(Component::ground(), 0, 0);
    (circuit, resistors)
}

#[test]
fn test_series_divider_shares_voltage() {
    let resistances = [100.0, 220.0, 470.0, 1000.0];
    let total: f64 = resistances.iter().sum();
    let (mut circuit, resistors) = series_divider(12.0, &resistances);
    circuit.solve().unwrap();

    let current = 12.0 / total;
    for (&id, &r) in resistors.iter().zip(&resistances) {
        assert_abs_diff_eq!(circuit.voltage(id), -12.0 * r / total, epsilon = EPSILON);
        assert_abs_diff_eq!(circuit.current(id), current, epsilon = EPSILON);
    }
}

#[test]
fn test_parallel_divider_full_voltage() {
    let mut circuit = Circuit::new();
    circuit.add_component(Component::voltage_source(10.0), 1, 0);
    let resistors: Vec<_> = [1000.0, 2000.0, 3000.0]
        .into_iter()
        .map(|r| (r, circuit.add_component(Component::resistor(r), 1, 0)))
        .collect();
    circuit.add_component(Component::ground(), 0, 0);
    circuit.solve().unwrap();

    for (r, id) in resistors {
        assert_abs_diff_eq!(circuit.voltage(id), -10.0, epsilon = EPSILON);
        assert_abs_diff_eq!(circuit.current(id), 10.0 / r, epsilon = EPSILON);
    }
}

#[test]
fn test_single_resistor_reversed() {
    let mut circuit = Circuit::new();
    let r1 = circuit.add_component(Component::resistor(1000.0), 0, 1);
    let v1 = circuit.add_component(Component::voltage_source(10.0), 1, 0);
    circuit.add_component(Component::ground(), 0, 0);
    circuit.solve().unwrap();

    assert_abs_diff_eq!(circuit.voltage(r1), 10.0, epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.current(r1), -0.01, epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.current(v1), -0.01, epsilon = EPSILON);
}

#[test]
fn test_two_resistors_in_series() {
    let mut circuit = Circuit::new();
    let r1 = circuit.add_component(Component::resistor(1000.0), 0, 1);
    let r2 = circuit.add_component(Component::resistor(500.0), 1, 2);
    let v1 = circuit.add_component(Component::voltage_source(10.0), 2, 0);
    circuit.add_component(Component::ground(), 0, 0);
    circuit.solve().unwrap();

    let i = -10.0 / 1500.0;
    assert_abs_diff_eq!(circuit.voltage(r1), 20.0 / 3.0, epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.voltage(r2), 10.0 / 3.0, epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.current(r1), i, epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.current(r2), i, epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.current(v1), i, epsilon = EPSILON);
}

#[test]
fn test_series_then_parallel() {
    let mut circuit = Circuit::new();
    let r1 = circuit.add_component(Component::resistor(1000.0), 0, 1);
    let parallel: Vec<_> = (0..3)
        .map(|_| circuit.add_component(Component::resistor(500.0), 1, 2))
        .collect();
    let v1 = circuit.add_component(Component::voltage_source(10.0), 2, 0);
    circuit.add_component(Component::ground(), 0, 0);
    circuit.solve().unwrap();

    let bank = 500.0 / 3.0;
    let i = -10.0 / (1000.0 + bank);
    assert_abs_diff_eq!(circuit.voltage(r1), 10.0 * 1000.0 / (1000.0 + bank), epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.current(r1), i, epsilon = EPSILON);
    for id in parallel {
        assert_abs_diff_eq!(circuit.voltage(id), 10.0 * bank / (1000.0 + bank), epsilon = EPSILON);
        assert_abs_diff_eq!(circuit.current(id), i / 3.0, epsilon = EPSILON);
    }
    assert_abs_diff_eq!(circuit.current(v1), i, epsilon = EPSILON);
}

#[test]
fn test_opposing_sources_in_series() {
    let mut circuit = Circuit::new();
    let r1 = circuit.add_component(Component::resistor(1000.0), 0, 1);
    let v1 = circuit.add_component(Component::voltage_source(10.0), 1, 2);
    let r2 = circuit.add_component(Component::resistor(2000.0), 2, 3);
    let v2 = circuit.add_component(Component::voltage_source(5.0), 4, 3);
    circuit.add_component(Component::resistor(0.001), 4, 0);
    circuit.add_component(Component::ground(), 0, 0);
    circuit.solve().unwrap();

    let i = 5.0 / 3000.0;
    assert_abs_diff_eq!(circuit.voltage(r1), 1000.0 * i, epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.voltage(r2), 2000.0 * i, epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.current(v1), -i, epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.current(v2), i, epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.current(r1), -i, epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.current(r2), -i, epsilon = EPSILON);
}

#[test]
fn test_t_network_with_two_sources() {
    let mut circuit = Circuit::new();
    let v1 = circuit.add_component(Component::voltage_source(10.0), 1, 0);
    let v2 = circuit.add_component(Component::voltage_source(15.0), 3, 0);
    let r1 = circuit.add_component(Component::resistor(1000.0), 1, 2);
    let r2 = circuit.add_component(Component::resistor(1000.0), 3, 2);
    let r3 = circuit.add_component(Component::resistor(1000.0), 2, 0);
    circuit.add_component(Component::ground(), 0, 0);
    circuit.solve().unwrap();

    // Junction sits at (10 + 15) / 3
    let i_r1 = (10.0 - 25.0 / 3.0) / 1000.0;
    let i_r2 = (15.0 - 25.0 / 3.0) / 1000.0;
    let i_r3 = (25.0 / 3.0) / 1000.0;
    assert_abs_diff_eq!(circuit.voltage(r1), -1000.0 * i_r1, epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.voltage(r2), -1000.0 * i_r2, epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.voltage(r3), -1000.0 * i_r3, epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.current(r1), i_r1, epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.current(r2), i_r2, epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.current(r3), i_r3, epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.current(v1), -i_r1, epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.current(v2), -i_r2, epsilon = EPSILON);
}

#[test]
fn test_floating_branch_carries_nothing() {
    let mut circuit = Circuit::new();
    circuit.add_component(Component::voltage_source(10.0), 1, 0);
    let r1 = circuit.add_component(Component::resistor(1000.0), 1, 2);
    let r3 = circuit.add_component(Component::resistor(1000.0), 2, 3);
    let r2 = circuit.add_component(Component::resistor(1000.0), 1, 0);
    circuit.add_component(Component::ground(), 0, 0);
    circuit.solve().unwrap();

    assert_abs_diff_eq!(circuit.voltage(r2), -10.0, epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.current(r2), 0.01, epsilon = EPSILON);
    for id in [r1, r3] {
        assert_abs_diff_eq!(circuit.current(id), 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(circuit.voltage(id), 0.0, epsilon = EPSILON);
    }
    assert_abs_diff_eq!(circuit.nodal_voltage(2).unwrap(), 10.0, epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.nodal_voltage(3).unwrap(), 10.0, epsilon = EPSILON);
}

#[test]
fn test_power_of_resistor() {
    let mut circuit = Circuit::new();
    circuit.add_component(Component::voltage_source(10.0), 1, 0);
    let r1 = circuit.add_component(Component::resistor(1000.0), 1, 0);
    circuit.add_component(Component::ground(), 0, 0);
    circuit.solve().unwrap();

    assert_abs_diff_eq!(circuit.power(r1), 0.1, epsilon = EPSILON);
}

// ============ Current inference ============

#[test]
fn test_current_through_resistor() {
    let mut circuit = Circuit::new();
    let v1 = circuit.add_component(Component::voltage_source(10.0), 1, 0);
    let r1 = circuit.add_component(Component::resistor(500.0), 1, 2);
    let r2 = circuit.add_component(Component::resistor(500.0), 2, 0);
    circuit.add_component(Component::ground(), 0, 0);
    circuit.solve().unwrap();

    assert_abs_diff_eq!(circuit.current(r1), 0.01, epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.current(r2), 0.01, epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.current(v1), -0.01, epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.get_current_through(1, 2), circuit.current(r1), epsilon = EPSILON);
}

#[test]
fn test_current_through_current_source() {
    let mut circuit = Circuit::new();
    let r1 = circuit.add_component(Component::resistor(500.0), 0, 1);
    circuit.add_component(Component::current_source(10.0), 1, 2);
    let r2 = circuit.add_component(Component::resistor(500.0), 2, 0);
    circuit.add_component(Component::ground(), 0, 0);
    circuit.solve().unwrap();

    assert_abs_diff_eq!(circuit.current(r1), 10.0, epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.current(r2), 10.0, epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.get_current_through(1, 2), circuit.current(r1), epsilon = EPSILON);
}

#[test]
fn test_current_through_parallel_banks() {
    let mut circuit = Circuit::new();
    let r1 = circuit.add_component(Component::resistor(500.0), 0, 1);
    let r3 = circuit.add_component(Component::resistor(500.0), 0, 1);
    circuit.add_component(Component::voltage_source(1.0), 2, 1);
    circuit.add_component(Component::current_source(10.0), 3, 0);
    let r2 = circuit.add_component(Component::resistor(500.0), 2, 3);
    circuit.add_component(Component::resistor(500.0), 2, 3);
    circuit.add_component(Component::ground(), 0, 0);
    circuit.solve().unwrap();

    assert_abs_diff_eq!(circuit.current(r1), 5.0, epsilon = EPSILON);
    assert_abs_diff_eq!(circuit.current(r2), 5.0, epsilon = EPSILON);
    assert_abs_diff_eq!(
        circuit.get_current_through(1, 2),
        circuit.current(r1) + circuit.current(r3),
        epsilon = EPSILON
    );
}

#[test]
fn test_current_through_with_extra_branch_at_junction() {
    let mut circuit = Circuit::new();
    circuit.add_component(Component::resistor(500.0), 0, 1);
    circuit.add_component(Component::resistor(500.0), 0, 1);
    circuit.add_component(Component::voltage_source(1.0), 2, 1);
    circuit.add_component(Component::current_source(10.0), 3, 4);
    let r2 = circuit.add_component(Component::resistor(500.0), 2, 3);
    let r4 = circuit.add_component(Component::resistor(500.0), 2, 3);
    circuit.add_component(Component::resistor(1.0), 4, 0);
    circuit.add_component(Component::inductor(1.0), 0, 4);
    circuit.add_component(Component::resistor(1.0), 4, 1);
    circuit.add_component(Component::ground(), 0, 0);
    circuit.solve().unwrap();

    assert_abs_diff_eq!(
        circuit.get_current_through(1, 2),
        circuit.current(r2) + circuit.current(r4),
        epsilon = EPSILON
    );
}

#[test]
fn test_current_through_spanning_capacitor() {
    let mut circuit = Circuit::new();
    circuit.add_component(Component::resistor(500.0), 0, 1);
    circuit.add_component(Component::resistor(500.0), 0, 1);
    circuit.add_component(Component::current_source(10.0), 0, 1);
    circuit.add_component(Component::capacitor(1.0), 1, 2);
    let r2 = circuit.add_component(Component::resistor(500.0), 2, 3);
    let r4 = circuit.add_component(Component::resistor(500.0), 2, 3);
    let c2 = circuit.add_component(Component::current_source(10.0), 2, 3);
    circuit.add_component(Component::ground(), 0, 0);
    circuit.solve().unwrap();

    assert_abs_diff_eq!(
        circuit.get_current_through(1, 2),
        circuit.current(r2) + circuit.current(r4) + circuit.current(c2),
        epsilon = EPSILON
    );
}
