//! Diode model.
//!
//! A two-state diode. While blocking it is Hi-Z, stamped as a very large
//! resistor. While conducting it is an ideal voltage drop:
//!   V(anode) - V(cathode) = Vf
//!
//! Which state is correct depends on the solution, so the circuit iterates
//! solve / re-classify until no diode changes state or the iteration cap is
//! reached. Node1 is the anode, node2 the cathode.

/// Default forward voltage for a silicon diode.
pub const SILICON_FORWARD_VOLTAGE: f64 = 0.7;

/// Forward voltage for a germanium diode.
pub const GERMANIUM_FORWARD_VOLTAGE: f64 = 0.3;

/// Slack on the forward-voltage test. A conducting diode is solved to sit
/// exactly at its forward voltage, up to round-off.
const THRESHOLD_TOLERANCE: f64 = 1e-9;

/// A diode component.
#[derive(Debug, Clone, PartialEq)]
pub struct Diode {
    /// Forward voltage drop while conducting
    pub forward_voltage: f64,
}

impl Default for Diode {
    fn default() -> Self {
        Self::new(SILICON_FORWARD_VOLTAGE)
    }
}

impl Diode {
    /// Create a new diode.
    pub fn new(forward_voltage: f64) -> Self {
        Self { forward_voltage }
    }

    /// Create a germanium diode (lower forward voltage).
    pub fn germanium() -> Self {
        Self::new(GERMANIUM_FORWARD_VOLTAGE)
    }

    /// Create an LED. Red ~1.8V, Green ~2.2V, Blue ~3.3V.
    pub fn led(color_vf: f64) -> Self {
        Self::new(color_vf)
    }

    /// Decide whether the diode should conduct given its reported voltage
    /// (`V(cathode) - V(anode)`) and current (anode -> cathode positive).
    pub fn should_conduct(&self, voltage: f64, current: f64) -> bool {
        -voltage + THRESHOLD_TOLERANCE >= self.forward_voltage && current > 0.0
    }
}
