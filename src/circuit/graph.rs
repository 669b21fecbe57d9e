//! Circuit graph structure.

use std::collections::{BTreeSet, HashMap};

use super::types::{Capability, ComponentId, NodeId};
use crate::components::{Component, ComponentKind, Resistor};
use crate::error::{Result, SolverError};
use crate::solver::CircuitSettings;

/// The components of one topology and the results of solving it.
///
/// Components live in an arena owned by the circuit and are addressed by the
/// [`ComponentId`] returned from [`Circuit::add_component`]. The adjacency
/// map and capability buckets store handles only.
///
/// All methods take `&mut self` or `&self`, so the single-caller requirement
/// is enforced by the borrow checker: a circuit may be moved between threads
/// but never solved from two at once.
///
/// Methods taking a `ComponentId` panic if the handle was not issued by this
/// circuit since the last [`Circuit::clear`].
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    /// Component arena, indexed by `ComponentId`
    pub(crate) components: Vec<Component>,

    /// Components attached to each node, in insertion order
    pub(crate) node_map: HashMap<NodeId, Vec<ComponentId>>,

    /// One bucket per capability, indexed by `Capability as usize`
    pub(crate) buckets: [Vec<ComponentId>; 5],

    /// Components that take part in the diode loop
    pub(crate) non_linear: Vec<ComponentId>,

    /// Components updated by `tick`
    pub(crate) ticking: Vec<ComponentId>,

    /// Distinct node ids referenced so far
    pub(crate) unique_nodes: BTreeSet<NodeId>,

    /// Voltages from the last solve, indexed by node id
    pub(crate) nodal_voltages: Vec<f64>,

    /// Lazily computed steady-state voltages
    pub(crate) steady_state: Option<Vec<f64>>,

    pub(crate) energy_source_count: usize,
    pub(crate) solved: bool,
    pub(crate) settings: CircuitSettings,
    pub(crate) ticks: u64,

    /// Ground inserted by `solve` because the topology had none
    pub(crate) auto_ground: Option<ComponentId>,
}

impl Circuit {
    /// Create an empty circuit with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty circuit with the given settings.
    pub fn with_settings(settings: CircuitSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            ..Self::default()
        })
    }

    /// Replace the settings. Takes effect on the next `solve` or `tick`.
    pub fn change_settings(&mut self, settings: CircuitSettings) -> Result<()> {
        settings.validate()?;
        self.settings = settings;
        self.steady_state = None;
        Ok(())
    }

    /// Register a component between two nodes.
    ///
    /// Grounds and fixed nodes only use `node1`. Node ids are not checked
    /// here; gaps are reported by the next `solve`.
    pub fn add_component(
        &mut self,
        mut component: Component,
        node1: impl Into<NodeId>,
        node2: impl Into<NodeId>,
    ) -> ComponentId {
        let id = ComponentId(self.components.len());
        component.set_nodes(node1.into(), node2.into());
        let (n1, n2) = (component.node1(), component.node2());

        self.node_map.entry(n1).or_default().push(id);
        if n2 != n1 {
            self.node_map.entry(n2).or_default().push(id);
        }
        self.unique_nodes.insert(n1);
        self.unique_nodes.insert(n2);

        for capability in component.capabilities().iter() {
            self.buckets[capability as usize].push(id);
        }
        if component.is_non_linear() {
            self.non_linear.push(id);
        }
        if component.requires_ticking() {
            self.ticking.push(id);
        }
        if component.is_energy_source() {
            self.energy_source_count += 1;
        }

        self.components.push(component);
        self.steady_state = None;
        id
    }

    /// Forget the whole topology, including the tick counter.
    pub fn clear(&mut self) {
        self.components.clear();
        self.node_map.clear();
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.non_linear.clear();
        self.ticking.clear();
        self.unique_nodes.clear();
        self.nodal_voltages.clear();
        self.steady_state = None;
        self.energy_source_count = 0;
        self.solved = false;
        self.ticks = 0;
        self.auto_ground = None;
    }

    // ============ Mutators ============

    /// Enable or disable a component.
    pub fn set_disabled(&mut self, id: ComponentId, disabled: bool) {
        self.update(id, |c| c.set_disabled(disabled));
    }

    /// Put a component into or out of Hi-Z.
    pub fn set_hi_z(&mut self, id: ComponentId, hi_z: bool) {
        self.update(id, |c| c.set_hi_z(hi_z));
    }

    /// Change the value of a voltage source or fixed node.
    pub fn set_voltage(&mut self, id: ComponentId, voltage: f64) -> Result<()> {
        require_finite("voltage", voltage)?;
        self.try_update(id, |c| match c.kind_mut() {
            ComponentKind::VoltageSource(v) => {
                v.voltage = voltage;
                Ok(())
            }
            ComponentKind::FixedNode(n) => {
                n.voltage = voltage;
                Ok(())
            }
            ComponentKind::Ground => Err(SolverError::invalid_setting(
                "a ground is always at 0 V",
            )),
            other => Err(not_applicable("voltage", other)),
        })
    }

    /// Change the value of a current source.
    pub fn set_current(&mut self, id: ComponentId, current: f64) -> Result<()> {
        require_finite("current", current)?;
        self.try_update(id, |c| match c.kind_mut() {
            ComponentKind::CurrentSource(i) => {
                i.current = current;
                Ok(())
            }
            other => Err(not_applicable("current", other)),
        })
    }

    /// Change the resistance of a resistor.
    pub fn set_resistance(&mut self, id: ComponentId, resistance: f64) -> Result<()> {
        require_positive("resistance", resistance)?;
        self.try_update(id, |c| match c.kind_mut() {
            ComponentKind::Resistor(r) => {
                *r = Resistor::new(resistance);
                Ok(())
            }
            other => Err(not_applicable("resistance", other)),
        })
    }

    /// Change the capacitance of a capacitor, keeping its companion state.
    pub fn set_capacitance(&mut self, id: ComponentId, capacitance: f64) -> Result<()> {
        require_positive("capacitance", capacitance)?;
        self.try_update(id, |c| match c.kind_mut() {
            ComponentKind::Capacitor(cap) => {
                cap.capacitance = capacitance;
                Ok(())
            }
            other => Err(not_applicable("capacitance", other)),
        })
    }

    /// Change the inductance of an inductor, keeping its companion state.
    pub fn set_inductance(&mut self, id: ComponentId, inductance: f64) -> Result<()> {
        require_positive("inductance", inductance)?;
        self.try_update(id, |c| match c.kind_mut() {
            ComponentKind::Inductor(l) => {
                l.inductance = inductance;
                Ok(())
            }
            other => Err(not_applicable("inductance", other)),
        })
    }

    /// Change the forward voltage of a diode.
    pub fn set_forward_voltage(&mut self, id: ComponentId, forward_voltage: f64) -> Result<()> {
        require_finite("forward voltage", forward_voltage)?;
        if forward_voltage < 0.0 {
            return Err(SolverError::invalid_setting(
                "forward voltage must not be negative",
            ));
        }
        self.try_update(id, |c| match c.kind_mut() {
            ComponentKind::Diode(d) => {
                d.forward_voltage = forward_voltage;
                Ok(())
            }
            other => Err(not_applicable("forward voltage", other)),
        })
    }

    /// Apply `f` to a component, keeping the energy-source count exact.
    fn update(&mut self, id: ComponentId, f: impl FnOnce(&mut Component)) {
        let component = &mut self.components[id.0];
        let was_source = component.is_energy_source();
        f(component);
        let is_source = component.is_energy_source();

        match (was_source, is_source) {
            (false, true) => self.energy_source_count += 1,
            (true, false) => self.energy_source_count -= 1,
            _ => {}
        }
        self.steady_state = None;
    }

    /// Like `update`, for changes that can be rejected. A rejected change
    /// leaves the component untouched.
    fn try_update(
        &mut self,
        id: ComponentId,
        f: impl FnOnce(&mut Component) -> Result<()>,
    ) -> Result<()> {
        let mut result = Ok(());
        self.update(id, |c| result = f(c));
        result
    }

    // ============ Queries ============

    /// All components in insertion order. A component's index is its id.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Look up a component by handle.
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id.0)
    }

    /// Handles of the components attached to `node`.
    pub fn components_at(&self, node: NodeId) -> &[ComponentId] {
        self.node_map.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Handles of the components declaring `capability`.
    pub fn bucket(&self, capability: Capability) -> &[ComponentId] {
        &self.buckets[capability as usize]
    }

    /// Number of distinct node ids referenced.
    pub fn node_count(&self) -> usize {
        self.unique_nodes.len()
    }

    /// Highest node id referenced, if any component was added.
    pub fn highest_node_id(&self) -> Option<NodeId> {
        self.unique_nodes.iter().next_back().copied()
    }

    pub fn energy_source_count(&self) -> usize {
        self.energy_source_count
    }

    /// Whether some enabled ground or fixed node pins a voltage.
    pub fn contains_fixed_voltage_point(&self) -> bool {
        self.bucket(Capability::FixedVoltage)
            .iter()
            .any(|id| !self.components[id.0].is_disabled())
    }

    /// Whether `solve` has completed since the last `clear`.
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn settings(&self) -> &CircuitSettings {
        &self.settings
    }

    /// The ground inserted by `solve` when the topology had none.
    ///
    /// It stays in the arena until `clear`, and is disabled while the host
    /// has a ground or fixed node of its own enabled.
    pub fn auto_ground(&self) -> Option<ComponentId> {
        self.auto_ground
    }

    /// Voltage of `node` from the last solve.
    pub fn nodal_voltage(&self, node: impl Into<NodeId>) -> Option<f64> {
        self.nodal_voltages.get(node.into().index()).copied()
    }

    /// Voltages of every node from the last solve, indexed by node id.
    pub fn nodal_voltages(&self) -> &[f64] {
        &self.nodal_voltages
    }

    /// Voltage of `node`, 0 before the first solve.
    pub(crate) fn v(&self, node: NodeId) -> f64 {
        self.nodal_voltages.get(node.index()).copied().unwrap_or(0.0)
    }
}

fn require_finite(what: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SolverError::invalid_setting(format!(
            "{what} must be finite, got {value}"
        )))
    }
}

fn require_positive(what: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SolverError::invalid_setting(format!(
            "{what} must be positive, got {value}"
        )))
    }
}

fn not_applicable(what: &str, kind: &ComponentKind) -> SolverError {
    SolverError::invalid_setting(format!("a {} has no {what}", kind.name()))
}
