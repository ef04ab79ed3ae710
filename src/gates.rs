use ndarray::Array2;
use num_complex::Complex64;
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

/// Row-major 2x2 operator acting on one qubit.
pub type Mat2 = [[Complex64; 2]; 2];

/// Row-major 4x4 operator acting on an ordered qubit pair.
pub type Mat4 = [[Complex64; 4]; 4];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

pub fn identity() -> Mat2 {
    [[ONE, ZERO], [ZERO, ONE]]
}

pub fn pauli_x() -> Mat2 {
    [[ZERO, ONE], [ONE, ZERO]]
}

pub fn pauli_y() -> Mat2 {
    [
        [ZERO, Complex64::new(0.0, -1.0)],
        [Complex64::new(0.0, 1.0), ZERO],
    ]
}

pub fn pauli_z() -> Mat2 {
    [[ONE, ZERO], [ZERO, Complex64::new(-1.0, 0.0)]]
}

pub fn hadamard() -> Mat2 {
    let s = Complex64::new(FRAC_1_SQRT_2, 0.0);
    [[s, s], [s, -s]]
}

pub fn phase_s() -> Mat2 {
    [[ONE, ZERO], [ZERO, Complex64::new(0.0, 1.0)]]
}

/// diag(1, e^{i pi/4})
pub fn phase_t() -> Mat2 {
    [[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, FRAC_PI_4)]]
}

/// 2^n identity with -1 on the marked diagonal entries. Marked indices
/// outside the register are ignored.
pub fn phase_oracle(n: usize, marked: &[usize]) -> Array2<Complex64> {
    let dim = 1usize << n;
    let mut m = Array2::eye(dim);
    for &idx in marked {
        if idx < dim {
            m[[idx, idx]] = Complex64::new(-1.0, 0.0);
        }
    }
    m
}

/// Grover diffusion operator D = 2|s><s| - I over the n-qubit uniform
/// superposition |s>; applying it reflects amplitudes about their mean.
pub fn diffusion(n: usize) -> Array2<Complex64> {
    let dim = 1usize << n;
    let mut m = Array2::from_elem((dim, dim), Complex64::new(2.0 / dim as f64, 0.0));
    for i in 0..dim {
        m[[i, i]] -= ONE;
    }
    m
}
