//! In-place application of small unitaries to a 2^n amplitude vector.
//!
//! A 1- or 2-qubit gate never needs the full 2^n x 2^n lift: a bit mask
//! for each wire pairs the affected amplitudes directly, so every gate is
//! O(2^n). Generic dense ops (identity, matmul, Kronecker products) come
//! straight from ndarray (`Array2::eye`, `.dot`, `ndarray::linalg::kron`).

use num_complex::Complex64;

pub use ndarray::linalg::kron;

use crate::gates::{Mat2, Mat4};

// qubit 0 is the most significant bit of a basis index
pub(crate) fn wire_mask(n: usize, wire: usize) -> usize {
    1 << (n - 1 - wire)
}

/// Scale the vector back to unit l2 norm. A zero vector is left as-is.
pub fn normalize(amps: &mut [Complex64]) {
    let norm_sqr: f64 = amps.iter().map(|a| a.norm_sqr()).sum();
    if norm_sqr == 0.0 {
        return;
    }
    let norm = norm_sqr.sqrt();
    for amp in amps.iter_mut() {
        *amp /= norm;
    }
}

/// Apply a 2x2 unitary to `target`, pairing each index with target bit 0
/// against its partner with target bit 1.
pub fn apply_1q(amps: &mut [Complex64], n: usize, u: &Mat2, target: usize) {
    assert!(target < n, "target wire {target} out of range for {n} qubits");
    assert_eq!(amps.len(), 1 << n, "amplitude vector length mismatch");
    let mask = wire_mask(n, target);
    for base in (0..amps.len()).step_by(mask << 1) {
        for i0 in base..base + mask {
            let i1 = i0 | mask;
            let a0 = amps[i0];
            let a1 = amps[i1];
            amps[i0] = u[0][0] * a0 + u[0][1] * a1;
            amps[i1] = u[1][0] * a0 + u[1][1] * a1;
        }
    }
}

/// CNOT as a control-gated index swap; no arithmetic on the amplitudes.
pub fn apply_cnot(amps: &mut [Complex64], n: usize, control: usize, target: usize) {
    assert!(
        control < n && target < n,
        "control {control} or target {target} out of range for {n} qubits"
    );
    assert_ne!(control, target, "cnot needs distinct wires");
    assert_eq!(amps.len(), 1 << n, "amplitude vector length mismatch");
    let c_mask = wire_mask(n, control);
    let t_mask = wire_mask(n, target);
    for i in 0..amps.len() {
        if i & c_mask != 0 && i & t_mask == 0 {
            amps.swap(i, i | t_mask);
        }
    }
}

/// Apply a 4x4 unitary to the wire pair (a, b). Wires are canonicalized
/// ascending; the matrix basis is (bit of lower wire, bit of higher wire)
/// = 00, 01, 10, 11. Only canonical both-bits-zero base indices are
/// visited, so each 4-group is touched exactly once.
pub fn apply_2q(amps: &mut [Complex64], n: usize, u: &Mat4, a: usize, b: usize) {
    assert!(
        a < n && b < n,
        "wires {a}, {b} out of range for {n} qubits"
    );
    assert_ne!(a, b, "two-qubit gate needs distinct wires");
    assert_eq!(amps.len(), 1 << n, "amplitude vector length mismatch");
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    let b1 = wire_mask(n, lo);
    let b2 = wire_mask(n, hi);
    for base in 0..amps.len() {
        if base & b1 != 0 || base & b2 != 0 {
            continue;
        }
        let idx = [base, base | b2, base | b1, base | b1 | b2];
        let v = [amps[idx[0]], amps[idx[1]], amps[idx[2]], amps[idx[3]]];
        for (r, &i) in idx.iter().enumerate() {
            amps[i] = u[r][0] * v[0] + u[r][1] * v[1] + u[r][2] * v[2] + u[r][3] * v[3];
        }
    }
}
