//! Backend that replays recorded counts.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tracing::{debug, instrument, warn};

use qtutor_ir::Circuit;

use crate::backend::Backend;
use crate::error::{HalError, HalResult};
use crate::job::{Job, JobId, JobStatus};
use crate::result::{Counts, ExecutionResult};

/// Default qubit limit for a recorded backend.
pub const DEFAULT_MAX_QUBITS: u32 = 32;

struct RecordedJob {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Replays counts captured from an external executor.
///
/// Recordings are keyed by circuit name. The JSON form is
/// `{"<circuit name>": {"<bits>": count, ...}, ...}`, which is what a
/// simulator or hardware run dumps per circuit. Jobs complete at submission.
pub struct RecordedBackend {
    name: String,
    max_qubits: u32,
    recordings: FxHashMap<String, Counts>,
    jobs: Arc<Mutex<FxHashMap<String, RecordedJob>>>,
}

impl RecordedBackend {
    /// Create a backend from `(circuit name, counts)` pairs.
    pub fn new(recordings: impl IntoIterator<Item = (String, Counts)>) -> Self {
        Self {
            name: "recorded".into(),
            max_qubits: DEFAULT_MAX_QUBITS,
            recordings: recordings.into_iter().collect(),
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
        }
    }

    /// Parse recordings from a JSON string.
    pub fn from_json(json: &str) -> HalResult<Self> {
        let recordings: FxHashMap<String, Counts> = serde_json::from_str(json)?;
        Ok(Self::new(recordings))
    }

    /// Load recordings from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> HalResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let backend = Self::from_json(&json)?;
        debug!(
            "Loaded {} recordings from {}",
            backend.recordings.len(),
            path.display()
        );
        Ok(backend.with_name(format!("recorded:{}", path.display())))
    }

    /// Set the backend name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the qubit limit.
    pub fn with_max_qubits(mut self, max_qubits: u32) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Add or replace the recording for one circuit.
    pub fn with_recording(mut self, circuit_name: impl Into<String>, counts: Counts) -> Self {
        self.recordings.insert(circuit_name.into(), counts);
        self
    }

    /// Names of the circuits that have recordings, sorted.
    pub fn circuit_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.recordings.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    fn replay(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        let start = Instant::now();

        if circuit.num_qubits() > self.max_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but {} only supports {}",
                circuit.num_qubits(),
                self.name,
                self.max_qubits
            )));
        }
        if shots == 0 {
            return Err(HalError::InvalidShots("shots must be at least 1".into()));
        }
        if !circuit.has_measurements() {
            return Err(HalError::InvalidCircuit(format!(
                "circuit '{}' has no measurements",
                circuit.name()
            )));
        }

        let counts = self.recordings.get(circuit.name()).ok_or_else(|| {
            HalError::InvalidCircuit(format!(
                "no recorded counts for circuit '{}'",
                circuit.name()
            ))
        })?;
        counts.validate(circuit.num_clbits())?;

        let recorded_shots = counts.total_shots();
        if recorded_shots != u64::from(shots) {
            warn!(
                "Recorded counts for '{}' hold {} shots, {} requested",
                circuit.name(),
                recorded_shots,
                shots
            );
        }

        let shots = u32::try_from(recorded_shots).unwrap_or(u32::MAX);
        Ok(ExecutionResult::new(counts.clone(), shots)
            .with_execution_time(start.elapsed().as_millis() as u64))
    }

    fn jobs(&self) -> std::sync::MutexGuard<'_, FxHashMap<String, RecordedJob>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Backend for RecordedBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn max_qubits(&self) -> u32 {
        self.max_qubits
    }

    #[instrument(skip(self, circuit))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        let result = self.replay(circuit, shots)?;

        let job_id = JobId::random();
        let mut job = Job::new(job_id.clone(), circuit.name(), shots);
        job.transition(JobStatus::Running);
        job.transition(JobStatus::Completed);

        self.jobs().insert(
            job_id.0.clone(),
            RecordedJob {
                job,
                result: Some(result),
            },
        );

        debug!("Submitted job: {}", job_id);
        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        self.jobs()
            .get(&job_id.0)
            .map(|j| j.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let jobs = self.jobs();
        let recorded = jobs
            .get(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;

        match &recorded.job.status {
            JobStatus::Completed => recorded
                .result
                .clone()
                .ok_or_else(|| HalError::JobFailed(format!("job {job_id} has no result"))),
            JobStatus::Cancelled => Err(HalError::JobCancelled),
            JobStatus::Failed(msg) => Err(HalError::JobFailed(msg.clone())),
            status => Err(HalError::JobFailed(format!(
                "job {job_id} is not finished ({status})"
            ))),
        }
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        let mut jobs = self.jobs();
        let recorded = jobs
            .get_mut(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;

        if !recorded.job.transition(JobStatus::Cancelled) {
            debug!("Job {} already {}", job_id, recorded.job.status);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bell_backend() -> RecordedBackend {
        RecordedBackend::new([(
            "bell".to_string(),
            Counts::from_pairs([("00", 510), ("11", 514)]),
        )])
    }

    #[tokio::test]
    async fn test_replays_recorded_counts() {
        let backend = bell_backend();
        let job_id = backend.submit(&Circuit::bell().unwrap(), 1024).await.unwrap();

        assert!(backend.status(&job_id).await.unwrap().is_success());
        let result = backend.result(&job_id).await.unwrap();
        assert_eq!(result.shots, 1024);
        assert_eq!(result.counts.get("00") + result.counts.get("11"), 1024);
        assert_eq!(result.counts.get("01") + result.counts.get("10"), 0);
    }

    #[tokio::test]
    async fn test_shot_mismatch_keeps_recorded_total() {
        let backend = bell_backend();
        let result = backend.run(&Circuit::bell().unwrap(), 100).await.unwrap();
        assert_eq!(result.shots, 1024);
    }

    #[tokio::test]
    async fn test_rejects_oversized_circuit() {
        let backend = bell_backend().with_max_qubits(1);
        let err = backend.submit(&Circuit::bell().unwrap(), 1024).await.unwrap_err();
        assert!(matches!(err, HalError::CircuitTooLarge(_)));
    }

    #[tokio::test]
    async fn test_rejects_unmeasured_circuit() {
        let backend = bell_backend();
        let prep = Circuit::bell_state_prep().unwrap();
        let err = backend.submit(&prep, 1024).await.unwrap_err();
        assert!(matches!(err, HalError::InvalidCircuit(_)));
    }

    #[tokio::test]
    async fn test_rejects_zero_shots() {
        let backend = bell_backend();
        let err = backend.submit(&Circuit::bell().unwrap(), 0).await.unwrap_err();
        assert!(matches!(err, HalError::InvalidShots(_)));
    }

    #[tokio::test]
    async fn test_rejects_wrong_bit_width() {
        let backend =
            RecordedBackend::new([("bell".to_string(), Counts::from_pairs([("000", 8)]))]);
        let err = backend.submit(&Circuit::bell().unwrap(), 8).await.unwrap_err();
        assert!(matches!(err, HalError::InvalidCounts(_)));
    }

    #[tokio::test]
    async fn test_missing_recording() {
        let backend = RecordedBackend::new(std::iter::empty());
        let err = backend.submit(&Circuit::bell().unwrap(), 8).await.unwrap_err();
        assert!(matches!(err, HalError::InvalidCircuit(msg) if msg.contains("bell")));
    }

    #[tokio::test]
    async fn test_cancel_after_completion_is_ignored() {
        let backend = bell_backend();
        let job_id = backend.submit(&Circuit::bell().unwrap(), 1024).await.unwrap();
        backend.cancel(&job_id).await.unwrap();
        assert_eq!(backend.status(&job_id).await.unwrap(), JobStatus::Completed);
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let backend = bell_backend();
        let err = backend.status(&JobId::new("nope")).await.unwrap_err();
        assert!(matches!(err, HalError::JobNotFound(id) if id == "nope"));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{"bell": {"00": 3, "11": 5}, "bv": {"101": 8}}"#;
        let backend = RecordedBackend::from_json(json).unwrap();
        assert_eq!(backend.circuit_names(), vec!["bell", "bv"]);
        assert!(RecordedBackend::from_json("[1, 2]").is_err());
    }
}
