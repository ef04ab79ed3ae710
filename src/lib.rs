pub mod circuit; // layered circuit data model
pub mod error; // configuration and placement errors
pub mod gates; // fixed 2x2 unitaries and register-scale builders
pub mod linalg; // in-place amplitude kernels
pub mod simulator; // layer stepping engine
pub mod state; // dense amplitude register
pub mod trace; // partial trace and bloch vectors
pub mod unitary; // whole-circuit unitary reconstruction

pub use circuit::{Circuit, Element, ElementKind};
pub use error::{CircuitError, Result};
pub use gates::{Mat2, Mat4};
pub use simulator::{SimEvent, Simulator};
pub use state::QuantumState;
pub use trace::{bloch_vector, reduced_density_matrix, Bloch};
pub use unitary::{circuit_unitary, CircuitUnitary, UnitaryEntry};
