//! QASM emitter for serializing circuits.

use qtutor_ir::{Circuit, ClbitId, Instruction, InstructionKind, QubitId};

use crate::error::{EmitError, EmitResult};

/// Emit a circuit as `OpenQASM` 3.0 source code.
pub fn emit(circuit: &Circuit) -> EmitResult<String> {
    Emitter::new(Dialect::Qasm3).emit_circuit(circuit)
}

/// Emit a circuit as `OpenQASM` 2.0 source code.
///
/// Register declarations use the QASM2 style (`qreg q[n];` / `creg c[n];`)
/// and measurements use `measure q[i] -> c[i];`. Every gate in the IR is part
/// of `qelib1.inc`, so no inline gate definitions are needed.
pub fn emit_qasm2(circuit: &Circuit) -> EmitResult<String> {
    Emitter::new(Dialect::Qasm2).emit_circuit(circuit)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Qasm3,
    Qasm2,
}

struct Emitter {
    dialect: Dialect,
    output: String,
}

impl Emitter {
    fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            output: String::new(),
        }
    }

    fn emit_circuit(mut self, circuit: &Circuit) -> EmitResult<String> {
        let num_qubits = circuit.num_qubits();
        if num_qubits == 0 {
            return Err(EmitError::EmptyCircuit(circuit.name().to_string()));
        }
        let num_clbits = circuit.num_clbits();

        match self.dialect {
            Dialect::Qasm3 => {
                self.writeln("OPENQASM 3.0;");
                self.writeln("include \"stdgates.inc\";");
                self.writeln("");
                self.writeln(&format!("qubit[{num_qubits}] q;"));
                if num_clbits > 0 {
                    self.writeln(&format!("bit[{num_clbits}] c;"));
                }
            }
            Dialect::Qasm2 => {
                self.writeln("OPENQASM 2.0;");
                self.writeln("include \"qelib1.inc\";");
                self.writeln("");
                self.writeln(&format!("qreg q[{num_qubits}];"));
                if num_clbits > 0 {
                    self.writeln(&format!("creg c[{num_clbits}];"));
                }
            }
        }
        self.writeln("");

        for instruction in circuit.instructions() {
            self.emit_instruction(instruction);
        }

        Ok(self.output)
    }

    fn emit_instruction(&mut self, instruction: &Instruction) {
        match instruction.kind {
            InstructionKind::Gate(gate) => {
                let qubits = emit_qubits(&instruction.qubits);
                self.writeln(&format!("{} {qubits};", gate.name()));
            }

            InstructionKind::Measure => {
                for (q, c) in instruction.qubits.iter().zip(&instruction.clbits) {
                    let line = match self.dialect {
                        Dialect::Qasm3 => format!("{} = measure {};", clbit(*c), qubit(*q)),
                        Dialect::Qasm2 => format!("measure {} -> {};", qubit(*q), clbit(*c)),
                    };
                    self.writeln(&line);
                }
            }

            InstructionKind::Barrier => {
                if instruction.qubits.is_empty() {
                    self.writeln("barrier;");
                } else {
                    let qubits = emit_qubits(&instruction.qubits);
                    self.writeln(&format!("barrier {qubits};"));
                }
            }
        }
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

fn qubit(q: QubitId) -> String {
    format!("q[{}]", q.0)
}

fn clbit(c: ClbitId) -> String {
    format!("c[{}]", c.0)
}

fn emit_qubits(qubits: &[QubitId]) -> String {
    qubits
        .iter()
        .map(|q| qubit(*q))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtutor_ir::CircuitBuilder;

    #[test]
    fn test_emit_bell_qasm3() {
        let circuit = Circuit::bell().unwrap();
        let qasm = emit(&circuit).unwrap();
        let expected = "\
OPENQASM 3.0;
include \"stdgates.inc\";

qubit[2] q;
bit[2] c;

h q[0];
cx q[0], q[1];
c[0] = measure q[0];
c[1] = measure q[1];
";
        assert_eq!(qasm, expected);
    }

    #[test]
    fn test_emit_bell_qasm2() {
        let circuit = Circuit::bell().unwrap();
        let qasm = emit_qasm2(&circuit).unwrap();
        assert!(qasm.starts_with("OPENQASM 2.0;\ninclude \"qelib1.inc\";"));
        assert!(qasm.contains("qreg q[2];"));
        assert!(qasm.contains("creg c[2];"));
        assert!(qasm.contains("measure q[1] -> c[1];"));
    }

    #[test]
    fn test_emit_barrier_and_basis_gates() {
        let mut builder = CircuitBuilder::with_size("basis", 2, 0);
        builder
            .barrier_all()
            .unwrap()
            .sdg(QubitId(1))
            .unwrap()
            .h(QubitId(1))
            .unwrap();
        let qasm = emit(&builder.build()).unwrap();
        assert!(qasm.contains("barrier q[0], q[1];"));
        assert!(qasm.contains("sdg q[1];"));
        assert!(!qasm.contains("\nbit["));
    }

    #[test]
    fn test_emit_empty_barrier() {
        let mut builder = CircuitBuilder::with_size("one", 1, 0);
        builder.barrier(std::iter::empty()).unwrap();
        let qasm = emit(&builder.build()).unwrap();
        assert!(qasm.contains("barrier;"));
    }

    #[test]
    fn test_emit_rejects_empty_circuit() {
        let circuit = CircuitBuilder::with_size("nothing", 0, 0).build();
        assert!(matches!(emit(&circuit), Err(EmitError::EmptyCircuit(name)) if name == "nothing"));
    }
}
