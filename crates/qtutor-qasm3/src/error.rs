//! Error types for the QASM emitter.

use thiserror::Error;

/// Errors that can occur while emitting QASM.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmitError {
    /// A circuit without qubits has no QASM program.
    #[error("Circuit '{0}' has no qubits")]
    EmptyCircuit(String),
}

/// Result type for emit operations.
pub type EmitResult<T> = Result<T, EmitError>;
