//! Component models for circuit simulation.
//!
//! This module provides models for all supported two-terminal components:
//! - Linear: Resistor, Capacitor, Inductor
//! - Sources: Voltage Source, Current Source
//! - Fixed points: Ground, Fixed Node
//! - Nonlinear: Diode
//!
//! A [`Component`] pairs one of these models with the state every component
//! shares (terminals, Hi-Z and disabled flags). The capabilities a kind
//! declares decide which stamping passes see it.

mod diode;
mod linear;
mod sources;

pub use diode::{Diode, GERMANIUM_FORWARD_VOLTAGE, SILICON_FORWARD_VOLTAGE};
pub use linear::{Capacitor, Inductor, Resistor};
pub use sources::{CurrentSource, FixedNode, VoltageSource};

use std::fmt;

use crate::circuit::{Capabilities, Capability, NodeId};
use crate::solver::{HI_Z_RESISTANCE, OPEN_CIRCUIT_RESISTANCE, SHORT_CIRCUIT_RESISTANCE};

/// The model behind a component.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentKind {
    Resistor(Resistor),
    VoltageSource(VoltageSource),
    CurrentSource(CurrentSource),
    Capacitor(Capacitor),
    Inductor(Inductor),
    Diode(Diode),
    Ground,
    FixedNode(FixedNode),
}

impl ComponentKind {
    /// Capabilities declared by this kind.
    pub fn capabilities(&self) -> Capabilities {
        use Capability::*;
        match self {
            ComponentKind::Resistor(_) => Capabilities::of(&[Resistive]),
            ComponentKind::VoltageSource(_) => Capabilities::of(&[VoltageDifference]),
            ComponentKind::CurrentSource(_) => Capabilities::of(&[Current]),
            // Norton companion pair
            ComponentKind::Capacitor(_) | ComponentKind::Inductor(_) => {
                Capabilities::of(&[Resistive, Current])
            }
            // Resistive only through Hi-Z
            ComponentKind::Diode(_) => Capabilities::of(&[VoltageDifference]),
            ComponentKind::Ground | ComponentKind::FixedNode(_) => Capabilities::of(&[FixedVoltage]),
        }
    }

    /// Short name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            ComponentKind::Resistor(_) => "resistor",
            ComponentKind::VoltageSource(_) => "voltage source",
            ComponentKind::CurrentSource(_) => "current source",
            ComponentKind::Capacitor(_) => "capacitor",
            ComponentKind::Inductor(_) => "inductor",
            ComponentKind::Diode(_) => "diode",
            ComponentKind::Ground => "ground",
            ComponentKind::FixedNode(_) => "fixed node",
        }
    }

    /// Only node1 is meaningful for this kind.
    pub fn is_mono_node(&self) -> bool {
        matches!(self, ComponentKind::Ground | ComponentKind::FixedNode(_))
    }
}

/// A circuit component.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    kind: ComponentKind,
    name: Option<String>,
    node1: NodeId,
    node2: NodeId,
    hi_z: bool,
    disabled: bool,
}

impl Component {
    /// Wrap a model. Terminals are assigned when the component is added to
    /// a circuit.
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            name: None,
            node1: NodeId(0),
            node2: NodeId(0),
            hi_z: false,
            disabled: false,
        }
    }

    pub fn resistor(resistance: f64) -> Self {
        Self::new(ComponentKind::Resistor(Resistor::new(resistance)))
    }

    pub fn voltage_source(voltage: f64) -> Self {
        Self::new(ComponentKind::VoltageSource(VoltageSource::new(voltage)))
    }

    pub fn current_source(current: f64) -> Self {
        Self::new(ComponentKind::CurrentSource(CurrentSource::new(current)))
    }

    pub fn capacitor(capacitance: f64) -> Self {
        Self::new(ComponentKind::Capacitor(Capacitor::new(capacitance)))
    }

    pub fn inductor(inductance: f64) -> Self {
        Self::new(ComponentKind::Inductor(Inductor::new(inductance)))
    }

    /// Diodes start off (Hi-Z) until the first solve classifies them.
    pub fn diode(forward_voltage: f64) -> Self {
        Self::new(ComponentKind::Diode(Diode::new(forward_voltage))).hi_z()
    }

    pub fn ground() -> Self {
        Self::new(ComponentKind::Ground)
    }

    pub fn fixed_node(voltage: f64) -> Self {
        Self::new(ComponentKind::FixedNode(FixedNode::new(voltage)))
    }

    /// Attach a display name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Start out disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Start out Hi-Z.
    pub fn hi_z(mut self) -> Self {
        self.hi_z = true;
        self
    }

    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Positive terminal.
    pub fn node1(&self) -> NodeId {
        self.node1
    }

    /// Negative terminal. Equal to node1 for grounds and fixed nodes.
    pub fn node2(&self) -> NodeId {
        self.node2
    }

    pub fn is_hi_z(&self) -> bool {
        self.hi_z
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn capabilities(&self) -> Capabilities {
        self.kind.capabilities()
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities().contains(capability)
    }

    /// Behaves as a plain resistor right now: a resistor, or any two-node
    /// component in Hi-Z.
    pub fn acts_as_resistor(&self) -> bool {
        if self.hi_z {
            return !self.kind.is_mono_node();
        }
        self.capabilities() == Capabilities::of(&[Capability::Resistive])
    }

    /// Has internal state advanced by `Circuit::tick`.
    pub fn requires_ticking(&self) -> bool {
        self.is_energy_storage()
    }

    /// Takes part in the diode fixed-point loop.
    pub fn is_non_linear(&self) -> bool {
        matches!(self.kind, ComponentKind::Diode(_))
    }

    pub fn is_energy_storage(&self) -> bool {
        matches!(
            self.kind,
            ComponentKind::Capacitor(_) | ComponentKind::Inductor(_)
        )
    }

    /// Whether this component currently supplies the circuit with energy.
    ///
    /// Storage elements always count since they may hold charge.
    pub fn is_energy_source(&self) -> bool {
        if self.is_energy_storage() {
            return true;
        }
        if self.hi_z || self.disabled {
            return false;
        }
        match &self.kind {
            ComponentKind::VoltageSource(v) => v.voltage != 0.0,
            ComponentKind::CurrentSource(i) => i.current != 0.0,
            ComponentKind::FixedNode(n) => n.voltage != 0.0,
            _ => false,
        }
    }

    pub(crate) fn set_nodes(&mut self, node1: NodeId, node2: NodeId) {
        self.node1 = node1;
        self.node2 = if self.kind.is_mono_node() { node1 } else { node2 };
    }

    pub(crate) fn set_hi_z(&mut self, hi_z: bool) {
        self.hi_z = hi_z;
    }

    pub(crate) fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub(crate) fn kind_mut(&mut self) -> &mut ComponentKind {
        &mut self.kind
    }

    /// Resistance stamped in the KCL pass, if any.
    ///
    /// Hi-Z overrides the component's own behaviour; during a steady-state
    /// solve storage elements are replaced by their open (capacitor) or
    /// short (inductor) surrogate.
    pub fn stamp_resistance(&self, steady_state: bool) -> Option<f64> {
        if steady_state {
            match self.kind {
                ComponentKind::Capacitor(_) => return Some(OPEN_CIRCUIT_RESISTANCE),
                ComponentKind::Inductor(_) => return Some(SHORT_CIRCUIT_RESISTANCE),
                _ => {}
            }
        }
        if self.hi_z && !self.kind.is_mono_node() {
            return Some(HI_Z_RESISTANCE);
        }
        match &self.kind {
            ComponentKind::Resistor(r) => Some(r.resistance),
            ComponentKind::Capacitor(c) => Some(c.resistance),
            ComponentKind::Inductor(l) => Some(l.resistance),
            _ => None,
        }
    }

    /// Current injected node1 -> node2 in the current-source pass, if any.
    pub fn injected_current(&self, steady_state: bool) -> Option<f64> {
        if self.hi_z || (steady_state && self.is_energy_storage()) {
            return None;
        }
        match &self.kind {
            ComponentKind::CurrentSource(i) => Some(i.effective_current(self.disabled)),
            ComponentKind::Capacitor(c) => Some(c.source_current),
            ComponentKind::Inductor(l) => Some(l.source_current),
            _ => None,
        }
    }

    /// Supernode constraint `V1 - V2` enforced in the voltage-difference
    /// pass, if any.
    pub fn enforced_voltage_difference(&self) -> Option<f64> {
        if self.hi_z {
            return None;
        }
        match &self.kind {
            ComponentKind::VoltageSource(v) => Some(v.effective_voltage(self.disabled)),
            ComponentKind::Diode(d) => Some(d.forward_voltage),
            _ => None,
        }
    }

    /// Absolute voltage pinned on node1 in the fixed-voltage pass, if any.
    pub fn pinned_voltage(&self) -> Option<f64> {
        if self.disabled {
            return None;
        }
        match &self.kind {
            ComponentKind::Ground => Some(0.0),
            ComponentKind::FixedNode(n) => Some(n.voltage),
            _ => None,
        }
    }

    /// Advance energy-storage state from the last solved `V1 - V2`.
    pub fn tick(&mut self, v: f64, dt: f64) {
        match &mut self.kind {
            ComponentKind::Capacitor(c) => c.update_state(v, dt),
            ComponentKind::Inductor(l) => l.update_state(v, dt),
            _ => {}
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{name}: ")?;
        }
        write!(f, "{} from {} to {}", self.kind.name(), self.node1, self.node2)?;
        if self.disabled {
            write!(f, " (disabled)")?;
        }
        if self.hi_z {
            write!(f, " (Hi-Z)")?;
        }
        match &self.kind {
            ComponentKind::Resistor(r) => write!(f, ", R = {} ohms", r.resistance),
            ComponentKind::VoltageSource(v) => write!(f, ", V = {} V", v.voltage),
            ComponentKind::CurrentSource(i) => write!(f, ", I = {} A", i.current),
            ComponentKind::Capacitor(c) => write!(f, ", C = {} F", c.capacitance),
            ComponentKind::Inductor(l) => write!(f, ", L = {} H", l.inductance),
            ComponentKind::Diode(d) => write!(f, ", V_fwd = {} V", d.forward_voltage),
            ComponentKind::Ground => Ok(()),
            ComponentKind::FixedNode(n) => write!(f, ", V = {} V", n.voltage),
        }
    }
}
