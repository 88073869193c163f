//! Circuit builder and the immutable circuit it produces.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};

/// An immutable quantum circuit description.
///
/// A `Circuit` is produced by [`CircuitBuilder::build`] and cannot be
/// changed afterwards. Every instruction it holds was validated against the
/// declared qubit and classical-bit counts when it was appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Circuit {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    instructions: Vec<Instruction>,
}

/// Wire format used to decode a circuit; replayed through the builder so a
/// decoded circuit is validated like a built one.
#[derive(Deserialize)]
struct RawCircuit {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits as usize
    }

    /// The instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Iterate over all qubit ids of the circuit.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        (0..self.num_qubits).map(QubitId)
    }

    /// Get the circuit depth.
    ///
    /// Barriers align the wires they touch but do not add a layer.
    pub fn depth(&self) -> usize {
        let mut qubit_level = vec![0usize; self.num_qubits()];
        let mut clbit_level = vec![0usize; self.num_clbits()];

        for inst in &self.instructions {
            let current = inst
                .qubits
                .iter()
                .map(|q| qubit_level[q.index()])
                .chain(inst.clbits.iter().map(|c| clbit_level[c.index()]))
                .max()
                .unwrap_or(0);
            let level = if inst.is_barrier() { current } else { current + 1 };
            for q in &inst.qubits {
                qubit_level[q.index()] = level;
            }
            for c in &inst.clbits {
                clbit_level[c.index()] = level;
            }
        }

        qubit_level
            .into_iter()
            .chain(clbit_level)
            .max()
            .unwrap_or(0)
    }

    /// Count instructions by name (`"h"`, `"cx"`, `"barrier"`, `"measure"`, ...).
    pub fn count_ops(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for inst in &self.instructions {
            *counts.entry(inst.name()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of gate instructions (barriers and measurements excluded).
    pub fn gate_count(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_gate()).count()
    }

    /// Whether the circuit reads out at least one qubit.
    pub fn has_measurements(&self) -> bool {
        self.instructions.iter().any(Instruction::is_measure)
    }

    /// All `(control, target)` pairs of the circuit's `CX` gates, in order.
    pub fn cx_pairs(&self) -> Vec<(QubitId, QubitId)> {
        self.instructions
            .iter()
            .filter_map(Instruction::as_cx)
            .collect()
    }

    /// Start a new builder seeded with this circuit's contents.
    pub fn to_builder(&self) -> CircuitBuilder {
        CircuitBuilder {
            name: self.name.clone(),
            num_qubits: self.num_qubits,
            num_clbits: self.num_clbits,
            instructions: self.instructions.clone(),
        }
    }

    /// Serialize the circuit as JSON.
    pub fn to_json(&self) -> IrResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode a circuit from JSON, validating every instruction.
    pub fn from_json(json: &str) -> IrResult<Self> {
        let raw: RawCircuit = serde_json::from_str(json)?;
        let mut builder = CircuitBuilder::with_size(raw.name, raw.num_qubits, raw.num_clbits);
        for inst in raw.instructions {
            builder.append(inst)?;
        }
        Ok(builder.build())
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Bell-state preparation without measurement: H on q0, then CX q0 → q1.
    pub fn bell_state_prep() -> IrResult<Self> {
        let mut builder = CircuitBuilder::with_size("bell", 2, 0);
        builder.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
        Ok(builder.build())
    }

    /// Bell-state circuit with both qubits measured.
    pub fn bell() -> IrResult<Self> {
        let mut builder = CircuitBuilder::with_size("bell", 2, 2);
        builder
            .h(QubitId(0))?
            .cx(QubitId(0), QubitId(1))?
            .measure(QubitId(0), ClbitId(0))?
            .measure(QubitId(1), ClbitId(1))?;
        Ok(builder.build())
    }
}

/// Builder for [`Circuit`].
///
/// Every append validates its operands against the declared sizes, so the
/// circuit returned by [`build`](CircuitBuilder::build) is always well formed.
#[derive(Debug, Clone)]
pub struct CircuitBuilder {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    instructions: Vec<Instruction>,
}

impl CircuitBuilder {
    /// Create a builder for a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            instructions: vec![],
        }
    }

    /// Rename the circuit being built.
    pub fn rename(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Declare additional classical bits, returning the first new id.
    pub fn add_clbits(&mut self, count: u32) -> ClbitId {
        let first = ClbitId(self.num_clbits);
        self.num_clbits += count;
        first
    }

    /// Number of qubits declared so far.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Number of classical bits declared so far.
    pub fn num_clbits(&self) -> u32 {
        self.num_clbits
    }

    /// Append a pre-built instruction after validating it.
    pub fn append(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.validate(&instruction)?;
        trace!(op = instruction.name(), qubits = ?instruction.qubits, "append");
        self.instructions.push(instruction);
        Ok(self)
    }

    /// Append every instruction of another circuit.
    ///
    /// The other circuit's operands must exist in this builder.
    pub fn extend_from(&mut self, other: &Circuit) -> IrResult<&mut Self> {
        for inst in other.instructions() {
            self.append(inst.clone())?;
        }
        Ok(self)
    }

    // =========================================================================
    // Gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(Gate::H, qubit))
    }

    /// Apply Hadamard gate to each of the given qubits, in order.
    pub fn h_each(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        for q in qubits {
            self.h(q)?;
        }
        Ok(self)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(Gate::X, qubit))
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(Gate::Y, qubit))
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(Gate::Z, qubit))
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(Gate::S, qubit))
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(Gate::Sdg, qubit))
    }

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::cx(control, target))
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.append(Instruction::measure(qubit, clbit))
    }

    /// Measure `qubits[k]` into `clbits[k]` for every position `k`.
    pub fn measure_range(
        &mut self,
        qubits: impl IntoIterator<Item = QubitId>,
        clbits: impl IntoIterator<Item = ClbitId>,
    ) -> IrResult<&mut Self> {
        let qubits: Vec<_> = qubits.into_iter().collect();
        let clbits: Vec<_> = clbits.into_iter().collect();
        if qubits.len() != clbits.len() {
            return Err(IrError::MeasureArity {
                qubits: qubits.len(),
                clbits: clbits.len(),
            });
        }
        for (q, c) in qubits.into_iter().zip(clbits) {
            self.measure(q, c)?;
        }
        Ok(self)
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.append(Instruction::barrier(qubits))
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        self.append(Instruction::barrier((0..self.num_qubits).map(QubitId)))
    }

    /// Freeze the builder into an immutable circuit.
    pub fn build(self) -> Circuit {
        Circuit {
            name: self.name,
            num_qubits: self.num_qubits,
            num_clbits: self.num_clbits,
            instructions: self.instructions,
        }
    }

    fn validate(&self, inst: &Instruction) -> IrResult<()> {
        let op_name = || Some(inst.name().to_string());

        if let InstructionKind::Gate(gate) = inst.kind {
            let got = inst.qubits.len() as u32;
            if got != gate.num_qubits() {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected: gate.num_qubits(),
                    got,
                });
            }
        }

        if inst.is_measure() && inst.qubits.len() != inst.clbits.len() {
            return Err(IrError::MeasureArity {
                qubits: inst.qubits.len(),
                clbits: inst.clbits.len(),
            });
        }

        for (pos, &qubit) in inst.qubits.iter().enumerate() {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitNotFound {
                    qubit,
                    num_qubits: self.num_qubits,
                    op_name: op_name(),
                });
            }
            if inst.qubits[..pos].contains(&qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    op_name: op_name(),
                });
            }
        }

        for &clbit in &inst.clbits {
            if clbit.0 >= self.num_clbits {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    num_clbits: self.num_clbits,
                    op_name: op_name(),
                });
            }
        }

        Ok(())
    }
}
