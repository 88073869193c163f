//! Error types for the demo suite.

use thiserror::Error;

/// Errors raised while building or analyzing demo circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DemoError {
    /// The secret string was empty.
    #[error("Secret must contain at least one bit")]
    EmptySecret,

    /// The secret string contained something other than '0' or '1'.
    #[error("Invalid secret: '{found}' at position {position} is not '0' or '1'")]
    InvalidSecret {
        /// Position of the offending character, counted from the left.
        position: usize,
        /// The offending character.
        found: char,
    },

    /// The secret is too long for the circuit's qubit count to fit a `u32`.
    #[error("Secret of {len} bits is too long (at most {max} bits)")]
    SecretTooLong {
        /// Length of the secret.
        len: usize,
        /// Longest secret the oracle mode supports.
        max: usize,
    },

    /// A Pauli label could not be used.
    #[error("Invalid observable '{label}': {reason}")]
    InvalidObservable {
        /// The label as given.
        label: String,
        /// What is wrong with it.
        reason: String,
    },

    /// There were no outcomes to analyze.
    #[error("No measurement outcomes to analyze")]
    EmptyCounts,

    /// A measured outcome did not fit the circuit that produced it.
    #[error("Unexpected outcome '{0}'")]
    UnexpectedOutcome(String),

    /// The number of count sets did not match the number of circuits.
    #[error("Expected counts for {expected} circuits, got {got}")]
    CountsMismatch {
        /// Circuits planned.
        expected: usize,
        /// Count sets supplied.
        got: usize,
    },

    /// Circuit construction failed.
    #[error(transparent)]
    Ir(#[from] qtutor_ir::IrError),

    /// Execution failed.
    #[error(transparent)]
    Hal(#[from] qtutor_hal::HalError),

    /// Writing demo output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Counts could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for demo operations.
pub type DemoResult<T> = Result<T, DemoError>;
