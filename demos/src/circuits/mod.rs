//! Quantum circuit generators for demos.

pub mod bernstein_vazirani;
pub mod deutsch;

pub use bernstein_vazirani::{
    OracleMode, Secret, bernstein_vazirani_circuit, circuit_name, expected_outcome,
    is_possible_outcome, recover_secret,
};
pub use deutsch::{DeutschOracle, FunctionClass, classify, deutsch_circuit};
