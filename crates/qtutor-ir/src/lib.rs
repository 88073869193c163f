//! qtutor Circuit Intermediate Representation
//!
//! This crate provides the data structures for describing small quantum
//! circuits. A circuit here is a pure description: an ordered list of tagged
//! operations over a fixed number of qubits and classical bits. Nothing in
//! this crate executes a circuit; execution belongs to a backend behind the
//! `qtutor-hal` contract.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`]
//! - **Gates**: [`Gate`] for the supported single- and two-qubit gates
//! - **Instructions**: [`Instruction`] combining an operation with its operands
//! - **Builder**: [`CircuitBuilder`] validates every appended instruction
//! - **Circuit**: [`Circuit`] is the frozen, immutable result
//! - **Drawing**: [`draw`] renders a text diagram
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qtutor_ir::{CircuitBuilder, ClbitId, QubitId};
//!
//! let mut builder = CircuitBuilder::with_size("bell_state", 2, 2);
//! builder
//!     .h(QubitId(0))?
//!     .cx(QubitId(0), QubitId(1))?
//!     .measure(QubitId(0), ClbitId(0))?
//!     .measure(QubitId(1), ClbitId(1))?;
//! let circuit = builder.build();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 3); // H, CX, parallel measures
//! # Ok::<(), qtutor_ir::IrError>(())
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg` | 1 | S and S-dagger gates |
//! | `CX` | 2 | Controlled-NOT (CNOT) |

pub mod circuit;
pub mod draw;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::{Circuit, CircuitBuilder};
pub use draw::draw;
pub use error::{IrError, IrResult};
pub use gate::Gate;
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{ClbitId, QubitId};
