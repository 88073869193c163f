//! Text circuit diagrams.
//!
//! ```text
//! q0: ─H──■──M0─
//! q1: ────X──M1─
//! ```
//!
//! Instructions are packed into columns as early as their wires allow. A
//! two-qubit gate occupies every row between its operands, so nothing else
//! is drawn across the vertical connector. `■` marks a control, `┼` a wire
//! crossed by a connector, `░` a barrier, and `Mk` a measurement into
//! classical bit `k`.

use std::fmt::Write as _;

use crate::circuit::Circuit;
use crate::instruction::{Instruction, InstructionKind};

const WIRE: char = '─';

/// Render a circuit as a text diagram, one row per qubit.
pub fn draw(circuit: &Circuit) -> String {
    let num_rows = circuit.num_qubits();
    if num_rows == 0 {
        return String::new();
    }

    let mut columns: Vec<Vec<Option<String>>> = Vec::new();
    let mut next_free = vec![0usize; num_rows];

    for inst in circuit.instructions() {
        let Some((lo, hi)) = span(inst) else { continue };
        let column = (lo..=hi).map(|r| next_free[r]).max().unwrap_or(0);
        for slot in &mut next_free[lo..=hi] {
            *slot = column + 1;
        }
        if columns.len() <= column {
            columns.resize_with(column + 1, || vec![None; num_rows]);
        }
        for (row, symbol) in cells(inst, lo, hi) {
            columns[column][row] = Some(symbol);
        }
    }

    let prefix_width = format!("q{}", num_rows - 1).len();
    let mut out = String::new();
    for row in 0..num_rows {
        let _ = write!(out, "{:<prefix_width$}: ", format!("q{row}"));
        for column in &columns {
            let width = column
                .iter()
                .flatten()
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(1);
            out.push(WIRE);
            match &column[row] {
                Some(symbol) => out.push_str(&center(symbol, width)),
                None => out.extend(std::iter::repeat_n(WIRE, width)),
            }
            out.push(WIRE);
        }
        if row + 1 < num_rows {
            out.push('\n');
        }
    }
    out
}

/// Rows covered by an instruction, inclusive.
fn span(inst: &Instruction) -> Option<(usize, usize)> {
    let lo = inst.qubits.iter().map(|q| q.index()).min()?;
    let hi = inst.qubits.iter().map(|q| q.index()).max()?;
    Some((lo, hi))
}

fn cells(inst: &Instruction, lo: usize, hi: usize) -> Vec<(usize, String)> {
    match inst.kind {
        InstructionKind::Gate(gate) => match inst.as_cx() {
            Some((control, target)) => (lo..=hi)
                .map(|row| {
                    let symbol = if row == control.index() {
                        "■"
                    } else if row == target.index() {
                        gate.label()
                    } else {
                        "┼"
                    };
                    (row, symbol.to_string())
                })
                .collect(),
            None => inst
                .qubits
                .iter()
                .map(|q| (q.index(), gate.label().to_string()))
                .collect(),
        },
        InstructionKind::Measure => inst
            .qubits
            .iter()
            .zip(&inst.clbits)
            .map(|(q, c)| (q.index(), format!("M{}", c.0)))
            .collect(),
        InstructionKind::Barrier => inst
            .qubits
            .iter()
            .map(|q| (q.index(), "░".to_string()))
            .collect(),
    }
}

fn center(symbol: &str, width: usize) -> String {
    let len = symbol.chars().count();
    let left = (width - len) / 2;
    let right = width - len - left;
    let mut cell = String::with_capacity(width * 3);
    cell.extend(std::iter::repeat_n(WIRE, left));
    cell.push_str(symbol);
    cell.extend(std::iter::repeat_n(WIRE, right));
    cell
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::CircuitBuilder;
    use crate::qubit::{ClbitId, QubitId};

    #[test]
    fn test_draw_bell() {
        let circuit = Circuit::bell().unwrap();
        let diagram = draw(&circuit);
        let lines: Vec<_> = diagram.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "q0: ─H──■──M0─");
        assert_eq!(lines[1], "q1: ────X──M1─");
    }

    #[test]
    fn test_draw_crossing_wire() {
        let mut builder = CircuitBuilder::with_size("cross", 3, 0);
        builder.cx(QubitId(0), QubitId(2)).unwrap();
        let diagram = draw(&builder.build());
        let lines: Vec<_> = diagram.lines().collect();
        assert_eq!(lines[0], "q0: ─■─");
        assert_eq!(lines[1], "q1: ─┼─");
        assert_eq!(lines[2], "q2: ─X─");
    }

    #[test]
    fn test_draw_barrier_and_wide_labels() {
        let mut builder = CircuitBuilder::with_size("wide", 2, 1);
        builder
            .sdg(QubitId(0))
            .unwrap()
            .barrier_all()
            .unwrap()
            .measure(QubitId(1), ClbitId(0))
            .unwrap();
        let diagram = draw(&builder.build());
        let lines: Vec<_> = diagram.lines().collect();
        assert_eq!(lines[0], "q0: ─Sdg──░─────");
        assert_eq!(lines[1], "q1: ──────░──M0─");
    }

    #[test]
    fn test_draw_empty() {
        assert!(draw(&CircuitBuilder::with_size("empty", 0, 0).build()).is_empty());
    }
}
