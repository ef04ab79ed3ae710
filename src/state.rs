use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::gates::{Mat2, Mat4};
use crate::linalg;

/// Dense amplitude vector for an n-qubit register.
///
/// Qubit count is fixed at construction. Every nominally-unitary
/// operation renormalizes afterwards so floating-point drift never
/// accumulates; a vector that has collapsed to zero norm is left alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantumState {
    n: usize,
    amps: Vec<Complex64>,
}

impl QuantumState {
    /// Fresh register in |0...0>.
    pub fn new(n: usize) -> Self {
        assert!(n >= 1, "register needs at least one qubit");
        let mut amps = vec![Complex64::new(0.0, 0.0); 1 << n];
        amps[0] = Complex64::new(1.0, 0.0);
        QuantumState { n, amps }
    }

    /// Register prepared in the computational basis state |index>.
    pub fn from_basis(n: usize, index: usize) -> Self {
        let mut state = QuantumState::new(n);
        assert!(index < state.amps.len(), "basis index {index} out of range");
        state.amps[0] = Complex64::new(0.0, 0.0);
        state.amps[index] = Complex64::new(1.0, 0.0);
        state
    }

    pub fn num_qubits(&self) -> usize {
        self.n
    }

    /// Vector length, always 2^n.
    pub fn len(&self) -> usize {
        self.amps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amps.is_empty()
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amps
    }

    /// Squared magnitude per basis index; sums to 1 within tolerance.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amps.iter().map(|a| a.norm_sqr()).collect()
    }

    fn renorm(&mut self) {
        linalg::normalize(&mut self.amps);
    }

    pub fn apply_1q(&mut self, u: &Mat2, wire: usize) {
        linalg::apply_1q(&mut self.amps, self.n, u, wire);
        self.renorm();
    }

    pub fn apply_2q(&mut self, u: &Mat4, a: usize, b: usize) {
        linalg::apply_2q(&mut self.amps, self.n, u, a, b);
        self.renorm();
    }

    pub fn apply_cnot(&mut self, control: usize, target: usize) {
        linalg::apply_cnot(&mut self.amps, self.n, control, target);
        self.renorm();
    }

    /// Flip the sign of every marked basis amplitude. Marked indices
    /// outside the register are ignored.
    pub fn apply_phase_oracle(&mut self, marked: &[usize]) {
        for &idx in marked {
            if idx < self.amps.len() {
                self.amps[idx] = -self.amps[idx];
            }
        }
        self.renorm();
    }

    /// Reflect every amplitude about the vector mean.
    pub fn apply_diffusion(&mut self) {
        let mean =
            self.amps.iter().copied().sum::<Complex64>() / self.amps.len() as f64;
        let twice = mean * 2.0;
        for amp in self.amps.iter_mut() {
            *amp = twice - *amp;
        }
        self.renorm();
    }

    /// Sample a full-register measurement, collapse to the drawn basis
    /// state and return its index. `draw` supplies uniform [0, 1) values.
    pub fn measure_all(&mut self, draw: &mut dyn FnMut() -> f64) -> usize {
        let r = draw();
        let mut acc = 0.0;
        // rounding can leave the cumulative walk short of the draw;
        // fall through to the last index rather than leave it undefined
        let mut outcome = self.amps.len() - 1;
        for (i, amp) in self.amps.iter().enumerate() {
            acc += amp.norm_sqr();
            if r <= acc {
                outcome = i;
                break;
            }
        }
        for (i, amp) in self.amps.iter_mut().enumerate() {
            *amp = if i == outcome {
                Complex64::new(1.0, 0.0)
            } else {
                Complex64::new(0.0, 0.0)
            };
        }
        outcome
    }

    /// Measure a single wire: draw against the marginal P(1), zero the
    /// amplitudes inconsistent with the outcome, renormalize, return the bit.
    pub fn measure_at(&mut self, wire: usize, draw: &mut dyn FnMut() -> f64) -> u8 {
        assert!(wire < self.n, "wire {wire} out of range for {} qubits", self.n);
        let mask = linalg::wire_mask(self.n, wire);
        let p_one: f64 = self
            .amps
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, amp)| amp.norm_sqr())
            .sum();
        let bit = if draw() < p_one { 1u8 } else { 0u8 };
        let keep = if bit == 1 { mask } else { 0 };
        for (i, amp) in self.amps.iter_mut().enumerate() {
            if i & mask != keep {
                *amp = Complex64::new(0.0, 0.0);
            }
        }
        self.renorm();
        bit
    }
}
