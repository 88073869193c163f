//! Bernstein-Vazirani circuit generator.
//!
//! The algorithm recovers an n-bit secret `s` from an oracle computing
//! `f(x) = s · x (mod 2)` with a single query, against n queries
//! classically.
//!
//! Secrets are written most significant bit first but indexed from the
//! right: bit 0 is the last character and drives input qubit 0.

use std::fmt;
use std::str::FromStr;

use qtutor_hal::Counts;
use qtutor_ir::{Circuit, CircuitBuilder, ClbitId, QubitId};
use tracing::debug;

use crate::error::{DemoError, DemoResult};

/// A non-empty secret bit string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Secret {
    /// `bits[i]` is bit i, counted from the right of the written form.
    bits: Vec<bool>,
}

impl Secret {
    /// Parse a string of '0' and '1' characters.
    pub fn parse(s: &str) -> DemoResult<Self> {
        if s.is_empty() {
            return Err(DemoError::EmptySecret);
        }
        let mut bits = Vec::with_capacity(s.len());
        for (position, c) in s.chars().enumerate() {
            match c {
                '0' => bits.push(false),
                '1' => bits.push(true),
                found => return Err(DemoError::InvalidSecret { position, found }),
            }
        }
        bits.reverse();
        Ok(Self { bits })
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether there are no bits. Never true for a parsed secret.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Bit `i`, counted from the right. Out-of-range bits read as zero.
    pub fn bit(&self, i: usize) -> bool {
        self.bits.get(i).copied().unwrap_or(false)
    }

    /// Number of set bits.
    pub fn popcount(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Indices of the set bits, ascending.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| b.then_some(i))
    }
}

impl FromStr for Secret {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in self.bits.iter().rev() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Where the oracle writes its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleMode {
    /// One shared ancilla qubit (index n), prepared in |−⟩.
    Ancilla,
    /// A dedicated target qubit `n + i` for every input qubit `i`. The
    /// targets start in |0⟩, so there is no phase kickback: each set input
    /// ends up entangled with its partner and reads out 0 or 1 at random.
    Paired,
    /// No target qubits. Set bits become a plain X on the input qubit, which
    /// is not controlled by the superposition and therefore leaves no trace
    /// in the measured outcome.
    Plain,
}

impl OracleMode {
    /// Resolve the two configuration flags. Ancilla wins over paired.
    pub fn from_flags(use_ancilla: bool, use_paired: bool) -> Self {
        if use_ancilla {
            Self::Ancilla
        } else if use_paired {
            Self::Paired
        } else {
            Self::Plain
        }
    }

    /// Qubits needed for an `n`-bit secret.
    pub fn num_qubits(self, n: u32) -> u32 {
        match self {
            Self::Ancilla => n + 1,
            Self::Paired => 2 * n,
            Self::Plain => n,
        }
    }

    /// Classical bits needed for an `n`-bit secret.
    pub fn num_clbits(self, n: u32) -> u32 {
        n
    }

    /// Longest secret whose circuit still has a `u32` qubit count.
    pub fn max_secret_len(self) -> usize {
        let max = match self {
            Self::Ancilla => u32::MAX - 1,
            Self::Paired => u32::MAX / 2,
            Self::Plain => u32::MAX,
        };
        usize::try_from(max).unwrap_or(usize::MAX)
    }

    /// Width of the input register for a `len`-bit secret.
    fn secret_width(self, len: usize) -> DemoResult<u32> {
        let max = self.max_secret_len();
        u32::try_from(len)
            .ok()
            .filter(|_| len <= max)
            .ok_or(DemoError::SecretTooLong { len, max })
    }
}

impl fmt::Display for OracleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ancilla => write!(f, "ancilla"),
            Self::Paired => write!(f, "paired"),
            Self::Plain => write!(f, "plain"),
        }
    }
}

/// Generate a Bernstein-Vazirani circuit.
///
/// # Layout
/// 1. H on every input qubit; in ancilla mode the ancilla is flipped to |1⟩
///    first and superposed along with the inputs
/// 2. Barrier
/// 3. Oracle: one operation per set bit of the secret
/// 4. Barrier
/// 5. H on every input qubit
/// 6. Measure input qubit `i` into classical bit `i`
///
/// The circuit is named `bernstein_vazirani_{mode}_{secret}`, so every
/// secret and mode has its own entry in a recording.
pub fn bernstein_vazirani_circuit(secret: &Secret, mode: OracleMode) -> DemoResult<Circuit> {
    let n = mode.secret_width(secret.len())?;
    let mut builder = CircuitBuilder::with_size(
        circuit_name(secret, mode),
        mode.num_qubits(n),
        mode.num_clbits(n),
    );

    let inputs = || (0..n).map(QubitId);
    let ancilla = QubitId(n);

    if mode == OracleMode::Ancilla {
        builder.x(ancilla)?;
        builder.h_each((0..=n).map(QubitId))?;
    } else {
        builder.h_each(inputs())?;
    }

    builder.barrier_all()?;

    for i in (0..n).filter(|&i| secret.bit(i as usize)) {
        let input = QubitId(i);
        match mode {
            OracleMode::Ancilla => builder.cx(input, ancilla)?,
            OracleMode::Paired => builder.cx(input, QubitId(n + i))?,
            OracleMode::Plain => builder.x(input)?,
        };
    }

    builder.barrier_all()?;
    builder.h_each(inputs())?;
    builder.measure_range(inputs(), (0..n).map(ClbitId))?;

    let circuit = builder.build();
    debug!(
        "Built {} circuit for secret {}: {} qubits, depth {}",
        mode,
        secret,
        circuit.num_qubits(),
        circuit.depth()
    );
    Ok(circuit)
}

/// Name of the circuit built for `secret` in `mode`.
pub fn circuit_name(secret: &Secret, mode: OracleMode) -> String {
    format!("bernstein_vazirani_{mode}_{secret}")
}

/// Parse `secret` and build its circuit for the given flags.
pub fn build(secret: &str, use_ancilla: bool, use_paired: bool) -> DemoResult<Circuit> {
    let secret = Secret::parse(secret)?;
    bernstein_vazirani_circuit(&secret, OracleMode::from_flags(use_ancilla, use_paired))
}

/// The outcome an ideal executor always measures for `secret` in `mode`.
///
/// The ancilla oracle reveals the secret. The plain X placeholder cancels
/// between the two Hadamard layers, so plain mode always reads zeros.
/// Paired mode has no single outcome and returns `None`.
pub fn expected_outcome(secret: &Secret, mode: OracleMode) -> Option<Secret> {
    match mode {
        OracleMode::Ancilla => Some(secret.clone()),
        OracleMode::Paired => None,
        OracleMode::Plain => Some(Secret {
            bits: vec![false; secret.len()],
        }),
    }
}

/// Whether an ideal executor can measure `outcome` for `secret` in `mode`.
///
/// In paired mode every set bit of the secret reads 0 or 1 with equal
/// probability and every clear bit reads 0.
pub fn is_possible_outcome(secret: &Secret, mode: OracleMode, outcome: &Secret) -> bool {
    if outcome.len() != secret.len() {
        return false;
    }
    match expected_outcome(secret, mode) {
        Some(expected) => *outcome == expected,
        None => outcome.ones().all(|i| secret.bit(i)),
    }
}

/// Read the secret off measured counts: the most frequent outcome.
pub fn recover_secret(counts: &Counts) -> DemoResult<Secret> {
    let (outcome, _) = counts.most_frequent().ok_or(DemoError::EmptyCounts)?;
    Secret::parse(outcome).map_err(|_| DemoError::UnexpectedOutcome(outcome.to_string()))
}
