//! Partial trace of a single wire out of the joint state.

use num_complex::Complex64;
use serde::Serialize;

use crate::gates::Mat2;
use crate::linalg::wire_mask;
use crate::state::QuantumState;

/// Bloch-sphere coordinates of one qubit, x^2 + y^2 + z^2 <= 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bloch {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Reduced 2x2 density matrix of `wire`, traced out of the joint state.
///
/// Basis-index pairs agreeing on every bit except the target contribute
/// their squared magnitudes to the diagonal and amp0 * conj(amp1) to the
/// off-diagonal entry. Hermitian with unit trace by construction.
pub fn reduced_density_matrix(state: &QuantumState, wire: usize) -> Mat2 {
    let n = state.num_qubits();
    assert!(wire < n, "wire {wire} out of range for {n} qubits");
    let mask = wire_mask(n, wire);
    let amps = state.amplitudes();
    let mut p00 = 0.0;
    let mut p11 = 0.0;
    let mut off = Complex64::new(0.0, 0.0);
    for base in (0..amps.len()).step_by(mask << 1) {
        for i0 in base..base + mask {
            let a0 = amps[i0];
            let a1 = amps[i0 | mask];
            p00 += a0.norm_sqr();
            p11 += a1.norm_sqr();
            off += a0 * a1.conj();
        }
    }
    [
        [Complex64::new(p00, 0.0), off],
        [off.conj(), Complex64::new(p11, 0.0)],
    ]
}

/// Bloch vector of `wire`: x = 2 Re(rho01), y = -2 Im(rho01), z = rho00 - rho11.
pub fn bloch_vector(state: &QuantumState, wire: usize) -> Bloch {
    let rho = reduced_density_matrix(state, wire);
    Bloch {
        x: 2.0 * rho[0][1].re,
        y: -2.0 * rho[0][1].im,
        z: rho[0][0].re - rho[1][1].re,
    }
}
