//! `OpenQASM` Emitter for qtutor
//!
//! Circuits built with `qtutor-ir` are handed to external executors as
//! `OpenQASM` source. This crate serializes a [`Circuit`](qtutor_ir::Circuit)
//! to `OpenQASM` 3.0 ([`emit`]) or to `OpenQASM` 2.0 ([`emit_qasm2`]) for
//! tools that still expect the older dialect.
//!
//! # Example
//!
//! ```rust
//! use qtutor_ir::Circuit;
//! use qtutor_qasm3::emit;
//!
//! let circuit = Circuit::bell().unwrap();
//! let qasm = emit(&circuit).unwrap();
//! assert!(qasm.contains("OPENQASM 3.0;"));
//! assert!(qasm.contains("h q[0];"));
//! assert!(qasm.contains("cx q[0], q[1];"));
//! assert!(qasm.contains("c[1] = measure q[1];"));
//! ```

pub mod emitter;
pub mod error;

pub use emitter::{emit, emit_qasm2};
pub use error::{EmitError, EmitResult};
