//! Pauli observables and expectation-value estimation from counts.
//!
//! Labels follow the usual tensor-product order: the leftmost character acts
//! on the highest qubit, so `"IZ"` is Z on qubit 0. Observables are grouped
//! into qubit-wise commuting sets; each set is measured with one circuit and
//! every member is evaluated from that circuit's counts.

use std::fmt;
use std::str::FromStr;

use qtutor_hal::{Backend, Counts};
use qtutor_ir::{Circuit, CircuitBuilder, ClbitId, QubitId};
use tracing::{debug, info};

use crate::error::{DemoError, DemoResult};

/// A single Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pauli {
    /// Identity operator.
    I,
    /// Pauli-X operator.
    X,
    /// Pauli-Y operator.
    Y,
    /// Pauli-Z operator.
    Z,
}

impl Pauli {
    /// Get the name of this Pauli operator.
    pub fn name(self) -> &'static str {
        match self {
            Pauli::I => "I",
            Pauli::X => "X",
            Pauli::Y => "Y",
            Pauli::Z => "Z",
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(Pauli::I),
            'X' => Some(Pauli::X),
            'Y' => Some(Pauli::Y),
            'Z' => Some(Pauli::Z),
            _ => None,
        }
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A tensor product of Pauli operators over a fixed number of qubits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PauliLabel {
    /// `paulis[q]` acts on qubit `q`.
    paulis: Vec<Pauli>,
}

impl PauliLabel {
    /// Parse a label such as `"XZ"` (X on qubit 1, Z on qubit 0).
    pub fn parse(label: &str) -> DemoResult<Self> {
        let invalid = |reason: String| DemoError::InvalidObservable {
            label: label.to_string(),
            reason,
        };
        if label.is_empty() {
            return Err(invalid("label is empty".into()));
        }
        let mut paulis = label
            .chars()
            .map(|c| {
                Pauli::from_char(c)
                    .ok_or_else(|| invalid(format!("'{c}' is not one of I, X, Y, Z")))
            })
            .collect::<DemoResult<Vec<_>>>()?;
        paulis.reverse();
        Ok(Self { paulis })
    }

    /// The identity on `num_qubits` qubits.
    pub fn identity(num_qubits: usize) -> Self {
        Self {
            paulis: vec![Pauli::I; num_qubits],
        }
    }

    /// Number of qubits the label acts on.
    pub fn num_qubits(&self) -> usize {
        self.paulis.len()
    }

    /// Operator on `qubit`. Qubits past the end are identity.
    pub fn get(&self, qubit: usize) -> Pauli {
        self.paulis.get(qubit).copied().unwrap_or(Pauli::I)
    }

    /// Qubits with a non-identity operator, ascending.
    pub fn support(&self) -> impl Iterator<Item = usize> + '_ {
        self.paulis
            .iter()
            .enumerate()
            .filter_map(|(q, &p)| (p != Pauli::I).then_some(q))
    }

    /// Whether every operator is the identity.
    pub fn is_identity(&self) -> bool {
        self.paulis.iter().all(|&p| p == Pauli::I)
    }

    /// Whether the two labels agree on every qubit where both act.
    pub fn commutes_qubitwise(&self, other: &PauliLabel) -> bool {
        self.num_qubits() == other.num_qubits()
            && self
                .paulis
                .iter()
                .zip(&other.paulis)
                .all(|(&a, &b)| a == Pauli::I || b == Pauli::I || a == b)
    }

    /// Fill this label's identity slots from `other`.
    fn absorb(&mut self, other: &PauliLabel) {
        for (mine, &theirs) in self.paulis.iter_mut().zip(&other.paulis) {
            if *mine == Pauli::I {
                *mine = theirs;
            }
        }
    }
}

impl FromStr for PauliLabel {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PauliLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in self.paulis.iter().rev() {
            write!(f, "{p}")?;
        }
        Ok(())
    }
}

/// Labels measured together with one basis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementGroup {
    /// Basis every qubit is measured in; identity slots are read in Z.
    pub basis: PauliLabel,
    /// Indices of the member labels in the input list.
    pub members: Vec<usize>,
}

/// Greedily partition `labels` into qubit-wise commuting groups.
///
/// Each label joins the first group it is compatible with, so the result is
/// deterministic in the input order.
pub fn group_observables(labels: &[PauliLabel]) -> Vec<MeasurementGroup> {
    let mut groups: Vec<MeasurementGroup> = Vec::new();
    for (index, label) in labels.iter().enumerate() {
        match groups
            .iter_mut()
            .find(|g| g.basis.commutes_qubitwise(label))
        {
            Some(group) => {
                group.basis.absorb(label);
                group.members.push(index);
            }
            None => groups.push(MeasurementGroup {
                basis: label.clone(),
                members: vec![index],
            }),
        }
    }
    groups
}

/// Append basis changes and a full readout to a state-preparation circuit.
///
/// X is rotated with H, Y with Sdg then H; Z and I need nothing. Qubit `q`
/// is measured into classical bit `q`.
pub fn measurement_circuit(prep: &Circuit, basis: &PauliLabel) -> DemoResult<Circuit> {
    if basis.num_qubits() != prep.num_qubits() {
        return Err(DemoError::InvalidObservable {
            label: basis.to_string(),
            reason: format!(
                "acts on {} qubits but the circuit has {}",
                basis.num_qubits(),
                prep.num_qubits()
            ),
        });
    }

    let n = prep.num_qubits() as u32;
    let num_clbits = n.max(prep.num_clbits() as u32);
    let mut builder = CircuitBuilder::with_size(format!("{}_{basis}", prep.name()), n, num_clbits);
    builder.extend_from(prep)?;
    builder.barrier_all()?;

    for q in 0..n {
        let qubit = QubitId(q);
        match basis.get(q as usize) {
            Pauli::X => {
                builder.h(qubit)?;
            }
            Pauli::Y => {
                builder.sdg(qubit)?.h(qubit)?;
            }
            Pauli::I | Pauli::Z => {}
        }
    }

    builder.measure_range((0..n).map(QubitId), (0..n).map(ClbitId))?;
    Ok(builder.build())
}

/// An estimated expectation value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// Mean of the observable's eigenvalue over all shots.
    pub value: f64,
    /// Standard error of the mean.
    pub std_error: f64,
}

/// Estimate ⟨label⟩ from counts measured in a compatible basis.
///
/// Each outcome contributes `(−1)^(parity of the supported bits)`. The
/// standard error is `sqrt((1 − v²) / shots)`.
pub fn expectation(label: &PauliLabel, counts: &Counts) -> DemoResult<Estimate> {
    if label.is_identity() {
        return Ok(Estimate {
            value: 1.0,
            std_error: 0.0,
        });
    }

    let shots = counts.total_shots();
    if shots == 0 {
        return Err(DemoError::EmptyCounts);
    }
    let width = label.num_qubits();
    counts.validate(width)?;

    let support: Vec<usize> = label.support().collect();
    let mut sum = 0i64;
    for (bits, count) in counts.iter() {
        let bits = bits.as_bytes();
        let odd = support
            .iter()
            .filter(|&&q| bits[width - 1 - q] == b'1')
            .count()
            % 2
            == 1;
        let count = i64::try_from(count).unwrap_or(i64::MAX);
        sum += if odd { -count } else { count };
    }

    let value = sum as f64 / shots as f64;
    let std_error = ((1.0 - value * value).max(0.0) / shots as f64).sqrt();
    Ok(Estimate { value, std_error })
}

/// Ideal expectation of `label` on the Bell state (|00⟩ + |11⟩)/√2.
///
/// Returns `None` for labels that are not two-qubit.
pub fn ideal_bell_expectation(label: &PauliLabel) -> Option<f64> {
    if label.num_qubits() != 2 {
        return None;
    }
    let value = match (label.get(1), label.get(0)) {
        (Pauli::I, Pauli::I) | (Pauli::X, Pauli::X) | (Pauli::Z, Pauli::Z) => 1.0,
        (Pauli::Y, Pauli::Y) => -1.0,
        _ => 0.0,
    };
    Some(value)
}

/// Plans and evaluates expectation values for one state-preparation circuit.
#[derive(Debug, Clone)]
pub struct Estimator {
    prep: Circuit,
    labels: Vec<PauliLabel>,
    groups: Vec<MeasurementGroup>,
}

impl Estimator {
    /// Plan measurements of `labels` on the state prepared by `prep`.
    pub fn new(prep: Circuit, labels: Vec<PauliLabel>) -> DemoResult<Self> {
        if let Some(bad) = labels.iter().find(|l| l.num_qubits() != prep.num_qubits()) {
            return Err(DemoError::InvalidObservable {
                label: bad.to_string(),
                reason: format!("circuit '{}' has {} qubits", prep.name(), prep.num_qubits()),
            });
        }
        let groups = group_observables(&labels);
        debug!(
            "Planned {} measurement circuits for {} observables",
            groups.len(),
            labels.len()
        );
        Ok(Self {
            prep,
            labels,
            groups,
        })
    }

    /// Parse labels and plan their measurements.
    pub fn from_labels<S: AsRef<str>>(prep: Circuit, labels: &[S]) -> DemoResult<Self> {
        let labels = labels
            .iter()
            .map(|l| PauliLabel::parse(l.as_ref()))
            .collect::<DemoResult<Vec<_>>>()?;
        Self::new(prep, labels)
    }

    /// The observables, in input order.
    pub fn labels(&self) -> &[PauliLabel] {
        &self.labels
    }

    /// The measurement groups.
    pub fn groups(&self) -> &[MeasurementGroup] {
        &self.groups
    }

    /// One measurement circuit per group.
    pub fn circuits(&self) -> DemoResult<Vec<Circuit>> {
        self.groups
            .iter()
            .map(|g| measurement_circuit(&self.prep, &g.basis))
            .collect()
    }

    /// Evaluate every label from per-group counts (same order as [`circuits`]).
    ///
    /// [`circuits`]: Estimator::circuits
    pub fn evaluate(&self, group_counts: &[Counts]) -> DemoResult<Vec<Estimate>> {
        if group_counts.len() != self.groups.len() {
            return Err(DemoError::CountsMismatch {
                expected: self.groups.len(),
                got: group_counts.len(),
            });
        }

        let mut estimates = vec![
            Estimate {
                value: 0.0,
                std_error: 0.0
            };
            self.labels.len()
        ];
        for (group, counts) in self.groups.iter().zip(group_counts) {
            for &member in &group.members {
                estimates[member] = expectation(&self.labels[member], counts)?;
            }
        }
        Ok(estimates)
    }

    /// Run every measurement circuit on `backend` and evaluate the labels.
    pub async fn run<B: Backend + ?Sized>(
        &self,
        backend: &B,
        shots: u32,
    ) -> DemoResult<Vec<Estimate>> {
        let mut group_counts = Vec::with_capacity(self.groups.len());
        for circuit in self.circuits()? {
            let result = backend.run(&circuit, shots).await?;
            info!(
                "{}: {} shots on {}",
                circuit.name(),
                result.shots,
                backend.name()
            );
            group_counts.push(result.counts);
        }
        self.evaluate(&group_counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtutor_ir::Gate;

    fn labels(list: &[&str]) -> Vec<PauliLabel> {
        list.iter().map(|l| PauliLabel::parse(l).unwrap()).collect()
    }

    #[test]
    fn test_label_order() {
        let label = PauliLabel::parse("XZ").unwrap();
        assert_eq!(label.get(0), Pauli::Z);
        assert_eq!(label.get(1), Pauli::X);
        assert_eq!(label.to_string(), "XZ");
        assert_eq!(PauliLabel::parse("IZ").unwrap().support().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_label_rejects_bad_input() {
        assert!(PauliLabel::parse("").is_err());
        assert!(matches!(
            "XQ".parse::<PauliLabel>(),
            Err(DemoError::InvalidObservable { label, .. }) if label == "XQ"
        ));
    }

    #[test]
    fn test_grouping_default_observables() {
        let labels = labels(&["IZ", "IX", "ZI", "XI", "ZZ", "XX", "YY"]);
        let groups = group_observables(&labels);
        let summary: Vec<_> = groups
            .iter()
            .map(|g| (g.basis.to_string(), g.members.clone()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("ZZ".to_string(), vec![0, 2, 4]),
                ("XX".to_string(), vec![1, 3, 5]),
                ("YY".to_string(), vec![6]),
            ]
        );
    }

    #[test]
    fn test_measurement_circuit_basis_changes() {
        let prep = Circuit::bell_state_prep().unwrap();
        let circuit = measurement_circuit(&prep, &PauliLabel::parse("YX").unwrap()).unwrap();
        assert_eq!(circuit.name(), "bell_YX");
        assert_eq!(circuit.num_clbits(), 2);

        let tail: Vec<_> = circuit
            .instructions()
            .iter()
            .skip_while(|i| !i.is_barrier())
            .skip(1)
            .filter_map(|i| i.as_gate().map(|g| (g, i.qubits[0].0)))
            .collect();
        assert_eq!(tail, vec![(Gate::H, 0), (Gate::Sdg, 1), (Gate::H, 1)]);
        assert_eq!(circuit.count_ops()["measure"], 2);

        assert!(measurement_circuit(&prep, &PauliLabel::parse("Z").unwrap()).is_err());
    }

    #[test]
    fn test_expectation_values() {
        let zz = PauliLabel::parse("ZZ").unwrap();
        let iz = PauliLabel::parse("IZ").unwrap();
        let zi = PauliLabel::parse("ZI").unwrap();
        let counts = Counts::from_pairs([("00", 300), ("11", 100)]);

        let est = expectation(&zz, &counts).unwrap();
        assert!((est.value - 1.0).abs() < 1e-12);
        assert_eq!(est.std_error, 0.0);

        let est = expectation(&iz, &counts).unwrap();
        assert!((est.value - 0.5).abs() < 1e-12);
        assert!((est.std_error - (0.75f64 / 400.0).sqrt()).abs() < 1e-12);

        // Bit 0 is the rightmost character.
        let skewed = Counts::from_pairs([("01", 10)]);
        assert_eq!(expectation(&iz, &skewed).unwrap().value, -1.0);
        assert_eq!(expectation(&zi, &skewed).unwrap().value, 1.0);
    }

    #[test]
    fn test_identity_expectation() {
        let est = expectation(&PauliLabel::identity(2), &Counts::new()).unwrap();
        assert_eq!(est.value, 1.0);
        assert_eq!(est.std_error, 0.0);
    }

    #[test]
    fn test_expectation_rejects_width_mismatch() {
        let zz = PauliLabel::parse("ZZ").unwrap();
        let counts = Counts::from_pairs([("000", 3)]);
        assert!(matches!(expectation(&zz, &counts), Err(DemoError::Hal(_))));
        assert!(matches!(expectation(&zz, &Counts::new()), Err(DemoError::EmptyCounts)));
    }

    #[test]
    fn test_ideal_bell() {
        let ideal = |l: &str| ideal_bell_expectation(&PauliLabel::parse(l).unwrap());
        assert_eq!(ideal("ZZ"), Some(1.0));
        assert_eq!(ideal("XX"), Some(1.0));
        assert_eq!(ideal("YY"), Some(-1.0));
        assert_eq!(ideal("IZ"), Some(0.0));
        assert_eq!(ideal("XZ"), Some(0.0));
        assert_eq!(ideal("Z"), None);
    }

    #[test]
    fn test_estimator_evaluate() {
        let prep = Circuit::bell_state_prep().unwrap();
        let estimator = Estimator::from_labels(prep, &["ZZ", "XX", "IZ"]).unwrap();
        assert_eq!(estimator.groups().len(), 2);
        assert_eq!(estimator.circuits().unwrap().len(), 2);

        let zz_counts = Counts::from_pairs([("00", 50), ("11", 50)]);
        let xx_counts = Counts::from_pairs([("00", 40), ("11", 60)]);
        let estimates = estimator.evaluate(&[zz_counts, xx_counts]).unwrap();
        assert_eq!(estimates[0].value, 1.0);
        assert_eq!(estimates[1].value, 1.0);
        assert_eq!(estimates[2].value, 0.0);

        assert!(matches!(
            estimator.evaluate(&[]),
            Err(DemoError::CountsMismatch { expected: 2, got: 0 })
        ));
    }

    #[test]
    fn test_estimator_rejects_wrong_width() {
        let prep = Circuit::bell_state_prep().unwrap();
        assert!(Estimator::from_labels(prep, &["ZZZ"]).is_err());
    }
}
