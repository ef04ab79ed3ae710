//! Layered circuit data model: qubit count plus ordered layers of gate
//! placements, with wire-occupancy validation and lossless (de)serialization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CircuitError, Result};
use crate::gates::Mat4;

/// Closed vocabulary of circuit elements. Serialized spellings match the
/// editor wire format ("MEASURE-ALL", "U_FULL", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    H,
    X,
    Y,
    Z,
    S,
    T,
    #[serde(rename = "CNOT")]
    Cnot,
    #[serde(rename = "MEASURE")]
    Measure,
    #[serde(rename = "MEASURE-ALL")]
    MeasureAll,
    #[serde(rename = "U_FULL")]
    PhaseOracle,
    #[serde(rename = "DIFFUSER")]
    Diffuser,
    #[serde(rename = "U2")]
    U2,
}

/// One gate placement.
///
/// `targets` and `control` index wires top-down; `marked` lists the basis
/// indices a phase oracle flips; `unitary` carries the explicit 4x4 of a
/// U2 element; `result` records a measurement outcome after execution.
/// Fields this crate does not interpret ride along in `extra` so round
/// trips through external editors stay lossless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marked: Option<Vec<usize>>,
    #[serde(rename = "U", default, skip_serializing_if = "Option::is_none")]
    pub unitary: Option<Mat4>,
    #[serde(rename = "_result", default, skip_serializing_if = "Option::is_none")]
    pub result: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Element {
    fn bare(kind: ElementKind) -> Self {
        Element {
            kind,
            targets: Vec::new(),
            control: None,
            marked: None,
            unitary: None,
            result: None,
            extra: Map::new(),
        }
    }

    fn gate1(kind: ElementKind, wire: usize) -> Self {
        let mut el = Self::bare(kind);
        el.targets = vec![wire];
        el
    }

    pub fn h(wire: usize) -> Self {
        Self::gate1(ElementKind::H, wire)
    }

    pub fn x(wire: usize) -> Self {
        Self::gate1(ElementKind::X, wire)
    }

    pub fn y(wire: usize) -> Self {
        Self::gate1(ElementKind::Y, wire)
    }

    pub fn z(wire: usize) -> Self {
        Self::gate1(ElementKind::Z, wire)
    }

    pub fn s(wire: usize) -> Self {
        Self::gate1(ElementKind::S, wire)
    }

    pub fn t(wire: usize) -> Self {
        Self::gate1(ElementKind::T, wire)
    }

    pub fn cnot(control: usize, target: usize) -> Self {
        let mut el = Self::gate1(ElementKind::Cnot, target);
        el.control = Some(control);
        el
    }

    pub fn measure(wire: usize) -> Self {
        Self::gate1(ElementKind::Measure, wire)
    }

    pub fn measure_all() -> Self {
        Self::bare(ElementKind::MeasureAll)
    }

    pub fn phase_oracle(marked: Vec<usize>) -> Self {
        let mut el = Self::bare(ElementKind::PhaseOracle);
        el.marked = Some(marked);
        el
    }

    pub fn diffuser() -> Self {
        Self::bare(ElementKind::Diffuser)
    }

    pub fn u2(a: usize, b: usize, unitary: Mat4) -> Self {
        let mut el = Self::bare(ElementKind::U2);
        el.targets = vec![a, b];
        el.unitary = Some(unitary);
        el
    }

    /// Every wire this element occupies (targets, then the control).
    pub fn wires(&self) -> impl Iterator<Item = usize> + '_ {
        self.targets.iter().copied().chain(self.control.iter().copied())
    }
}

/// A declarative quantum program. Layers run strictly in order; elements
/// within a layer never share a wire, so their order is immaterial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    qubits: usize,
    layers: Vec<Vec<Element>>,
}

impl Circuit {
    pub fn new(qubits: usize) -> Result<Self> {
        if qubits < 1 {
            return Err(CircuitError::InvalidConfiguration(qubits));
        }
        Ok(Circuit {
            qubits,
            layers: Vec::new(),
        })
    }

    pub fn num_qubits(&self) -> usize {
        self.qubits
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layers(&self) -> &[Vec<Element>] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&[Element]> {
        self.layers.get(index).map(|l| l.as_slice())
    }

    pub(crate) fn layer_mut(&mut self, index: usize) -> Option<&mut Vec<Element>> {
        self.layers.get_mut(index)
    }

    /// Insert `element` into `layer`, growing the layer list as needed.
    ///
    /// Fails with `InvalidWire` when any referenced wire is outside the
    /// register and with `WireCollision` when a wire is already occupied
    /// in that layer. Validation runs before any mutation, so a failed
    /// insert leaves the circuit exactly as it was.
    pub fn add_element(&mut self, element: Element, layer: usize) -> Result<()> {
        for wire in element.wires() {
            if wire >= self.qubits {
                return Err(CircuitError::InvalidWire {
                    wire,
                    qubits: self.qubits,
                });
            }
        }
        if let Some(existing) = self.layers.get(layer) {
            for wire in element.wires() {
                if existing.iter().any(|other| other.wires().any(|w| w == wire)) {
                    return Err(CircuitError::WireCollision { wire, layer });
                }
            }
        }
        while self.layers.len() <= layer {
            self.layers.push(Vec::new());
        }
        self.layers[layer].push(element);
        Ok(())
    }

    /// Drop one placement. Out-of-range indices are ignored so stale
    /// references from an interactive editor stay harmless.
    pub fn remove_element(&mut self, layer: usize, index: usize) {
        if let Some(l) = self.layers.get_mut(layer) {
            if index < l.len() {
                l.remove(index);
            }
        }
    }

    /// Drop every layer, keeping the qubit count.
    pub fn clear(&mut self) {
        self.layers.clear();
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a circuit description. Every nested element record is deep
    /// copied out of the input, so instances never alias shared state.
    pub fn from_json(json: &str) -> Result<Self> {
        let circuit: Circuit = serde_json::from_str(json)?;
        if circuit.qubits < 1 {
            return Err(CircuitError::InvalidConfiguration(circuit.qubits));
        }
        Ok(circuit)
    }
}
