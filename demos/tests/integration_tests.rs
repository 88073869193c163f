//! Integration tests for the demo suite.
//!
//! These tests run the demo algorithms end to end against the recorded
//! counts shipped in `data/recorded_counts.json`.

use std::path::PathBuf;

use qtutor_demos::circuits::bernstein_vazirani::{
    OracleMode, Secret, bernstein_vazirani_circuit, build, expected_outcome, is_possible_outcome,
    recover_secret,
};
use qtutor_demos::circuits::deutsch::{DeutschOracle, classify, deutsch_circuit};
use qtutor_demos::observables::Estimator;
use qtutor_demos::{DemoConfig, DemoError, open_backend};
use qtutor_hal::{Backend, HalError, RecordedBackend};
use qtutor_ir::{Circuit, draw};
use qtutor_qasm3::emit;

fn recorded_counts_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/recorded_counts.json")
}

fn recorded_backend() -> RecordedBackend {
    RecordedBackend::from_json_file(recorded_counts_path()).unwrap()
}

/// The default secret is recovered from one recorded run.
#[tokio::test]
async fn test_bernstein_vazirani_end_to_end() {
    let config = DemoConfig {
        counts_file: Some(recorded_counts_path()),
        ..DemoConfig::default()
    };
    let backend = open_backend(&config).unwrap().unwrap();

    let secret = Secret::parse(&config.secret).unwrap();
    let circuit = bernstein_vazirani_circuit(&secret, OracleMode::Ancilla).unwrap();
    let result = backend.run(&circuit, config.shots).await.unwrap();

    assert_eq!(recover_secret(&result.counts).unwrap(), secret);
}

/// A secret without its own recording is not answered with another's counts.
#[tokio::test]
async fn test_bernstein_vazirani_recordings_are_per_secret() {
    let backend = recorded_backend();

    let other = build("00000001", true, false).unwrap();
    let err = backend.run(&other, 1024).await.unwrap_err();
    let HalError::InvalidCircuit(msg) = &err else {
        panic!("expected a missing recording, got {err}");
    };
    assert!(msg.contains("bernstein_vazirani_ancilla_00000001"), "{msg}");

    // Same secret, different mode.
    let paired = build("10110101", false, true).unwrap();
    assert!(matches!(
        backend.run(&paired, 1024).await,
        Err(HalError::InvalidCircuit(_))
    ));
}

/// Paired mode reads the set bits at random, so the most frequent outcome
/// need not be the secret.
#[tokio::test]
async fn test_bernstein_vazirani_paired_mode_analysis() {
    let backend = recorded_backend();
    let secret = Secret::parse("101").unwrap();
    let circuit = bernstein_vazirani_circuit(&secret, OracleMode::Paired).unwrap();
    let result = backend.run(&circuit, 1024).await.unwrap();

    assert_eq!(expected_outcome(&secret, OracleMode::Paired), None);

    let outcomes: Vec<Secret> = result
        .counts
        .iter()
        .map(|(outcome, _)| Secret::parse(outcome).unwrap())
        .collect();
    assert_eq!(outcomes.len(), 4);
    assert!(
        outcomes
            .iter()
            .all(|o| is_possible_outcome(&secret, OracleMode::Paired, o))
    );

    let recovered = recover_secret(&result.counts).unwrap();
    assert_eq!(recovered.to_string(), "000");
    assert_ne!(recovered, secret);
    assert!(is_possible_outcome(&secret, OracleMode::Paired, &recovered));
}

/// Plain mode always reads zeros, whatever the secret.
#[tokio::test]
async fn test_bernstein_vazirani_plain_mode_analysis() {
    let backend = recorded_backend();
    let secret = Secret::parse("101").unwrap();
    let circuit = bernstein_vazirani_circuit(&secret, OracleMode::Plain).unwrap();
    let result = backend.run(&circuit, 1024).await.unwrap();

    let expected = expected_outcome(&secret, OracleMode::Plain).unwrap();
    assert_eq!(expected.to_string(), "000");

    let recovered = recover_secret(&result.counts).unwrap();
    assert_eq!(recovered, expected);
    assert_eq!(result.counts.probability("000"), 1.0);
}

/// Every Deutsch oracle is classified correctly.
#[tokio::test]
async fn test_deutsch_classifies_all_oracles() {
    let backend = recorded_backend();
    for oracle in DeutschOracle::ALL {
        let circuit = deutsch_circuit(oracle).unwrap();
        let result = backend.run(&circuit, 1024).await.unwrap();
        assert_eq!(
            classify(&result.counts).unwrap(),
            oracle.class(),
            "oracle {oracle}"
        );
    }
}

/// Bell-state estimates match the ideal values within a few standard errors.
#[tokio::test]
async fn test_bell_estimation() {
    let backend = recorded_backend();
    let labels = DemoConfig::default().observables;
    let estimator = Estimator::from_labels(Circuit::bell_state_prep().unwrap(), &labels).unwrap();
    assert_eq!(estimator.groups().len(), 3);

    let estimates = estimator.run(&backend, 1024).await.unwrap();
    let by_label = |label: &str| {
        let index = labels.iter().position(|l| l == label).unwrap();
        estimates[index]
    };

    assert_eq!(by_label("ZZ").value, 1.0);
    assert_eq!(by_label("XX").value, 1.0);
    assert_eq!(by_label("YY").value, -1.0);
    for label in ["IZ", "IX", "ZI", "XI"] {
        let est = by_label(label);
        assert!(
            est.value.abs() < 4.0 * est.std_error,
            "{label}: {} ± {}",
            est.value,
            est.std_error
        );
    }
}

/// Estimation fails cleanly when a group has no recording.
#[tokio::test]
async fn test_bell_estimation_missing_recording() {
    let backend = recorded_backend();
    let estimator =
        Estimator::from_labels(Circuit::bell_state_prep().unwrap(), &["ZX"]).unwrap();
    let err = estimator.run(&backend, 1024).await.unwrap_err();
    assert!(matches!(err, DemoError::Hal(_)));
}

/// The "101" scenario emits the expected QASM and diagram.
#[test]
fn test_bernstein_vazirani_outputs() {
    let circuit = build("101", true, false).unwrap();

    let qasm = emit(&circuit).unwrap();
    assert!(qasm.contains("qubit[4] q;"));
    assert!(qasm.contains("bit[3] c;"));
    assert!(qasm.contains("cx q[0], q[3];"));
    assert!(qasm.contains("cx q[2], q[3];"));
    assert!(!qasm.contains("cx q[1]"));

    let diagram = draw(&circuit);
    assert_eq!(diagram.lines().count(), 4);
    assert!(diagram.lines().all(|line| line.starts_with('q')));
}

/// Circuits survive a JSON round trip unchanged.
#[test]
fn test_circuit_json_round_trip() {
    for (secret, ancilla, paired) in [("10110101", true, false), ("0110", false, true)] {
        let circuit = build(secret, ancilla, paired).unwrap();
        let json = circuit.to_json().unwrap();
        assert_eq!(Circuit::from_json(&json).unwrap(), circuit);
    }
}

/// Malformed secrets are rejected before any circuit is built.
#[test]
fn test_invalid_secrets() {
    assert!(matches!(build("", true, false), Err(DemoError::EmptySecret)));
    assert!(matches!(
        build("1021", true, false),
        Err(DemoError::InvalidSecret {
            position: 2,
            found: '2'
        })
    ));
}
