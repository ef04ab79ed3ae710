use thiserror::Error;

/// Errors surfaced while constructing or editing a circuit.
///
/// Placement errors are fatal to the offending call only; the circuit is
/// left exactly as it was so an interactive editor can report the message
/// inline and carry on.
#[derive(Debug, Error)]
pub enum CircuitError {
    /// A circuit needs at least one qubit.
    #[error("circuit needs at least one qubit, got {0}")]
    InvalidConfiguration(usize),

    /// An element referenced a wire outside the register.
    #[error("wire index {wire} out of range for a {qubits}-qubit circuit")]
    InvalidWire { wire: usize, qubits: usize },

    /// Two elements in the same layer would share a wire.
    #[error("wire {wire} is already occupied in layer {layer}")]
    WireCollision { wire: usize, layer: usize },

    /// A circuit description failed to parse.
    #[error("malformed circuit description: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CircuitError>;
