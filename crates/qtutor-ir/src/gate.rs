//! Quantum gate types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Gates with known semantics.
///
/// The set is deliberately small: what the oracle circuits need (H, X, CX),
/// plus the Pauli and phase gates used for measurement-basis changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gate {
    /// Hadamard gate.
    H,
    /// Pauli-X gate (unconditional flip).
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// Controlled-X (CNOT) gate. Operands are `[control, target]`.
    CX,
}

impl Gate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Gate::H => "h",
            Gate::X => "x",
            Gate::Y => "y",
            Gate::Z => "z",
            Gate::S => "s",
            Gate::Sdg => "sdg",
            Gate::CX => "cx",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            Gate::H | Gate::X | Gate::Y | Gate::Z | Gate::S | Gate::Sdg => 1,
            Gate::CX => 2,
        }
    }

    /// Whether this gate is controlled by another qubit.
    #[inline]
    pub fn is_controlled(&self) -> bool {
        matches!(self, Gate::CX)
    }

    /// Short label used in circuit diagrams.
    pub fn label(&self) -> &'static str {
        match self {
            Gate::H => "H",
            Gate::X | Gate::CX => "X",
            Gate::Y => "Y",
            Gate::Z => "Z",
            Gate::S => "S",
            Gate::Sdg => "Sdg",
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
