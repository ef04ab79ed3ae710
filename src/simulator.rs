//! Layer-stepping engine: drives a circuit against a quantum state one
//! layer per step, with lifecycle notifications and a caller-driven
//! auto-run ticker.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::circuit::{Circuit, Element, ElementKind};
use crate::gates;
use crate::state::QuantumState;

/// Uniform [0, 1) source for measurement draws. Injected so tests can
/// substitute a deterministic stub; this is the engine's sole
/// nondeterminism.
pub type Sampler = Box<dyn FnMut() -> f64>;

/// Lifecycle notification passed to registered listeners. The state
/// borrow is read-only; listeners observe, they never mutate.
#[derive(Debug)]
pub enum SimEvent<'a> {
    Reset { state: &'a QuantumState },
    BeforeStep { layer: usize, state: &'a QuantumState },
    AfterStep { layer: usize, state: &'a QuantumState },
}

pub type Listener = Box<dyn FnMut(&SimEvent)>;

enum Phase {
    Reset,
    Before,
    After,
}

/// State machine over a circuit's layers. The cursor runs 0..=layer_count;
/// executing a layer advances it, and the terminal state is
/// cursor == layer_count. All mutable engine state (cursor, bound state,
/// armed deadline) lives in the instance.
pub struct Simulator {
    circuit: Circuit,
    state: QuantumState,
    layer: usize,
    sampler: Sampler,
    listeners: Vec<Listener>,
    running: bool,
    step_delay: Duration,
    deadline: Option<Instant>,
}

impl Simulator {
    /// Entropy-backed simulator. Use `with_seed` or `with_sampler` for
    /// reproducible runs.
    pub fn new(circuit: Circuit) -> Self {
        let mut rng = StdRng::from_entropy();
        Self::with_sampler(circuit, Box::new(move || rng.gen::<f64>()))
    }

    pub fn with_seed(circuit: Circuit, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::with_sampler(circuit, Box::new(move || rng.gen::<f64>()))
    }

    pub fn with_sampler(circuit: Circuit, sampler: Sampler) -> Self {
        let state = QuantumState::new(circuit.num_qubits());
        Simulator {
            circuit,
            state,
            layer: 0,
            sampler,
            listeners: Vec::new(),
            running: false,
            step_delay: Duration::from_millis(300),
            deadline: None,
        }
    }

    /// Register a lifecycle listener.
    pub fn on(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn state(&self) -> &QuantumState {
        &self.state
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn circuit_mut(&mut self) -> &mut Circuit {
        &mut self.circuit
    }

    /// Give the circuit back, e.g. to read recorded measurement outcomes.
    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }

    pub fn layer_index(&self) -> usize {
        self.layer
    }

    pub fn is_done(&self) -> bool {
        self.layer >= self.circuit.layer_count()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Rebind a fresh |0...0> state, rewind the cursor and cancel any
    /// pending auto-run.
    pub fn reset(&mut self) {
        self.state = QuantumState::new(self.circuit.num_qubits());
        self.layer = 0;
        self.stop();
        self.emit(Phase::Reset, 0);
    }

    /// Execute the current layer and advance. No-op returning false once
    /// terminal; otherwise returns whether layers remain.
    pub fn step(&mut self) -> bool {
        if self.is_done() {
            return false;
        }
        let layer = self.layer;
        self.emit(Phase::Before, layer);
        self.execute_layer(layer);
        self.emit(Phase::After, layer);
        self.layer += 1;
        self.layer < self.circuit.layer_count()
    }

    /// Arm the auto-run ticker; the host event loop drives it via `tick`.
    pub fn run(&mut self) {
        if self.running || self.is_done() {
            return;
        }
        self.running = true;
        self.deadline = Some(Instant::now() + self.step_delay);
    }

    /// Advance the armed ticker: performs one step once the deadline has
    /// passed, then re-arms or disarms. Returns whether it is still armed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.running {
            return false;
        }
        if self.deadline.map_or(false, |d| now >= d) {
            if self.step() {
                self.deadline = Some(now + self.step_delay);
            } else {
                self.stop();
            }
        }
        self.running
    }

    /// Cancel a pending tick. Idempotent; a step already in flight always
    /// completes.
    pub fn stop(&mut self) {
        self.running = false;
        self.deadline = None;
    }

    /// Per-step delay used by subsequent ticks.
    pub fn set_speed(&mut self, ms: u64) {
        self.step_delay = Duration::from_millis(ms);
    }

    fn execute_layer(&mut self, layer: usize) {
        let Self {
            circuit,
            state,
            sampler,
            ..
        } = self;
        let Some(elements) = circuit.layer_mut(layer) else {
            return;
        };
        for element in elements.iter_mut() {
            match element.kind {
                ElementKind::Measure => {
                    let Some(&wire) = element.targets.first() else {
                        log::warn!("measure element missing its target wire, skipping");
                        continue;
                    };
                    let bit = state.measure_at(wire, sampler);
                    element.result = Some(bit as u64);
                }
                ElementKind::MeasureAll => {
                    let outcome = state.measure_all(sampler);
                    element.result = Some(outcome as u64);
                }
                _ => {
                    apply_unitary_element(state, element);
                }
            }
        }
    }

    // listeners are moved out while the event borrows the state, then put
    // back; they cannot re-enter the simulator
    fn emit(&mut self, phase: Phase, layer: usize) {
        if self.listeners.is_empty() {
            return;
        }
        let mut listeners = std::mem::take(&mut self.listeners);
        let event = match phase {
            Phase::Reset => SimEvent::Reset { state: &self.state },
            Phase::Before => SimEvent::BeforeStep {
                layer,
                state: &self.state,
            },
            Phase::After => SimEvent::AfterStep {
                layer,
                state: &self.state,
            },
        };
        for listener in listeners.iter_mut() {
            listener(&event);
        }
        drop(event);
        self.listeners = listeners;
    }
}

/// Apply one unitary placement to the state; measurement kinds are left
/// untouched and reported as false. The match is exhaustive over the
/// element vocabulary, so a new kind fails compilation here instead of
/// being silently skipped. Elements missing required operands (possible
/// after hand-edited descriptions) are logged and skipped.
pub(crate) fn apply_unitary_element(state: &mut QuantumState, element: &Element) -> bool {
    match element.kind {
        ElementKind::H => apply_single(state, element, gates::hadamard()),
        ElementKind::X => apply_single(state, element, gates::pauli_x()),
        ElementKind::Y => apply_single(state, element, gates::pauli_y()),
        ElementKind::Z => apply_single(state, element, gates::pauli_z()),
        ElementKind::S => apply_single(state, element, gates::phase_s()),
        ElementKind::T => apply_single(state, element, gates::phase_t()),
        ElementKind::Cnot => {
            let (Some(control), Some(&target)) = (element.control, element.targets.first())
            else {
                log::warn!("cnot element missing control or target, skipping");
                return true;
            };
            state.apply_cnot(control, target);
        }
        ElementKind::U2 => {
            let (Some(unitary), [a, b, ..]) = (&element.unitary, element.targets.as_slice())
            else {
                log::warn!("u2 element missing wires or matrix, skipping");
                return true;
            };
            state.apply_2q(unitary, *a, *b);
        }
        ElementKind::PhaseOracle => {
            state.apply_phase_oracle(element.marked.as_deref().unwrap_or(&[]));
        }
        ElementKind::Diffuser => state.apply_diffusion(),
        ElementKind::Measure | ElementKind::MeasureAll => return false,
    }
    true
}

fn apply_single(state: &mut QuantumState, element: &Element, u: gates::Mat2) {
    let Some(&wire) = element.targets.first() else {
        log::warn!("{:?} element missing its target wire, skipping", element.kind);
        return;
    };
    state.apply_1q(&u, wire);
}
