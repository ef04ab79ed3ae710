//! Independent reconstruction of a circuit's end-to-end unitary.
//!
//! Each of the 2^n basis vectors is propagated through every layer with
//! the same per-gate rules the stepping engine uses (measurements are
//! skipped, they are not unitary); the resulting states are the columns
//! of the transform. Small registers get the dense matrix; past the
//! practical display size only entries above a magnitude floor are kept,
//! so nothing quadratic in 2^n is materialized.

use ndarray::Array2;
use num_complex::Complex64;
use serde::Serialize;

use crate::circuit::Circuit;
use crate::simulator::apply_unitary_element;
use crate::state::QuantumState;

/// Dense output stays practical up to this dimension (64 = 2^6 basis states).
pub const DENSE_DIM_LIMIT: usize = 64;

/// Default magnitude floor below which sparse entries are dropped.
pub const SPARSE_EPS: f64 = 1e-12;

/// One nonzero entry of the sparse form, in the row,col,re,im shape
/// downstream exporters emit verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitaryEntry {
    pub row: usize,
    pub col: usize,
    pub re: f64,
    pub im: f64,
}

#[derive(Debug)]
pub enum CircuitUnitary {
    Dense(Array2<Complex64>),
    Sparse {
        dim: usize,
        entries: Vec<UnitaryEntry>,
    },
}

/// Recompute the whole-circuit transform, dense while the register is
/// small and sparse beyond `DENSE_DIM_LIMIT`.
pub fn circuit_unitary(circuit: &Circuit) -> CircuitUnitary {
    let dim = 1usize << circuit.num_qubits();
    if dim <= DENSE_DIM_LIMIT {
        CircuitUnitary::Dense(dense_unitary(circuit))
    } else {
        CircuitUnitary::Sparse {
            dim,
            entries: sparse_unitary(circuit, SPARSE_EPS),
        }
    }
}

fn propagate_basis(circuit: &Circuit, col: usize) -> QuantumState {
    let mut state = QuantumState::from_basis(circuit.num_qubits(), col);
    for layer in circuit.layers() {
        for element in layer {
            apply_unitary_element(&mut state, element);
        }
    }
    state
}

pub fn dense_unitary(circuit: &Circuit) -> Array2<Complex64> {
    let dim = 1usize << circuit.num_qubits();
    let mut u = Array2::zeros((dim, dim));
    for col in 0..dim {
        let state = propagate_basis(circuit, col);
        for (row, amp) in state.amplitudes().iter().enumerate() {
            u[[row, col]] = *amp;
        }
    }
    u
}

/// Entries with magnitude above `eps`, ordered row-major.
pub fn sparse_unitary(circuit: &Circuit, eps: f64) -> Vec<UnitaryEntry> {
    let dim = 1usize << circuit.num_qubits();
    let mut entries = Vec::new();
    for col in 0..dim {
        let state = propagate_basis(circuit, col);
        for (row, amp) in state.amplitudes().iter().enumerate() {
            if amp.norm_sqr() > eps * eps {
                entries.push(UnitaryEntry {
                    row,
                    col,
                    re: amp.re,
                    im: amp.im,
                });
            }
        }
    }
    entries.sort_by_key(|e| (e.row, e.col));
    entries
}
