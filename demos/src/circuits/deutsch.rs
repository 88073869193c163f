//! Deutsch's algorithm circuit generator.
//!
//! Decides with one oracle query whether `f: {0,1} → {0,1}` is constant or
//! balanced. Qubit 0 is the query register, qubit 1 the |−⟩ target.

use std::fmt;

use qtutor_hal::Counts;
use qtutor_ir::{Circuit, CircuitBuilder, ClbitId, QubitId};

use crate::error::{DemoError, DemoResult};

/// The four one-bit functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeutschOracle {
    /// f(x) = 0
    ConstantZero,
    /// f(x) = 1
    ConstantOne,
    /// f(x) = x
    Identity,
    /// f(x) = ¬x
    Negation,
}

impl DeutschOracle {
    /// All four oracles.
    pub const ALL: [DeutschOracle; 4] = [
        Self::ConstantZero,
        Self::ConstantOne,
        Self::Identity,
        Self::Negation,
    ];

    /// Whether f takes each value on exactly one input.
    pub fn is_balanced(self) -> bool {
        matches!(self, Self::Identity | Self::Negation)
    }

    /// The class the algorithm should report for this oracle.
    pub fn class(self) -> FunctionClass {
        if self.is_balanced() {
            FunctionClass::Balanced
        } else {
            FunctionClass::Constant
        }
    }

    /// Short name used in circuit names and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::ConstantZero => "constant_zero",
            Self::ConstantOne => "constant_one",
            Self::Identity => "identity",
            Self::Negation => "negation",
        }
    }

    fn apply(self, builder: &mut CircuitBuilder) -> DemoResult<()> {
        let (query, target) = (QubitId(0), QubitId(1));
        match self {
            Self::ConstantZero => {}
            Self::ConstantOne => {
                builder.x(target)?;
            }
            Self::Identity => {
                builder.cx(query, target)?;
            }
            Self::Negation => {
                builder.cx(query, target)?.x(target)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for DeutschOracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Answer of Deutsch's algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionClass {
    /// f(0) = f(1)
    Constant,
    /// f(0) ≠ f(1)
    Balanced,
}

impl fmt::Display for FunctionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant => write!(f, "constant"),
            Self::Balanced => write!(f, "balanced"),
        }
    }
}

/// Generate the Deutsch circuit for `oracle`: 2 qubits, 1 classical bit.
pub fn deutsch_circuit(oracle: DeutschOracle) -> DemoResult<Circuit> {
    let (query, target) = (QubitId(0), QubitId(1));
    let mut builder = CircuitBuilder::with_size(format!("deutsch_{}", oracle.name()), 2, 1);

    builder.x(target)?.h(query)?.h(target)?.barrier_all()?;
    oracle.apply(&mut builder)?;
    builder
        .barrier_all()?
        .h(query)?
        .measure(query, ClbitId(0))?;

    Ok(builder.build())
}

/// Classify from the most frequent outcome: '0' is constant, '1' balanced.
pub fn classify(counts: &Counts) -> DemoResult<FunctionClass> {
    match counts.most_frequent() {
        Some(("0", _)) => Ok(FunctionClass::Constant),
        Some(("1", _)) => Ok(FunctionClass::Balanced),
        Some((other, _)) => Err(DemoError::UnexpectedOutcome(other.to_string())),
        None => Err(DemoError::EmptyCounts),
    }
}
