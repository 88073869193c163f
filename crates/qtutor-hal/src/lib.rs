//! qtutor Execution Contract
//!
//! Circuits built with `qtutor-ir` are descriptions only. Running them is the
//! job of an external collaborator (a simulator or a hardware service) that
//! accepts a circuit and a shot count and returns how often each classical
//! bitstring was observed. This crate pins that contract down:
//!
//! - the async [`Backend`] trait (`submit` → `status` → `result`, plus the
//!   provided `wait` and `run`)
//! - the job lifecycle types [`JobId`], [`JobStatus`], [`Job`]
//! - the result types [`Counts`] and [`ExecutionResult`]
//! - [`RecordedBackend`], which replays counts captured from an external
//!   executor so demos and tests have a deterministic collaborator
//!
//! # Bitstring convention
//!
//! Classical bit 0 is the rightmost character of a bitstring, matching the
//! way secrets and Pauli labels are written.
//!
//! # Example
//!
//! ```ignore
//! use qtutor_hal::{Backend, RecordedBackend};
//! use qtutor_ir::Circuit;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = RecordedBackend::from_json_file("counts.json")?;
//!     let result = backend.run(&Circuit::bell()?, 1024).await?;
//!
//!     if let Some((bitstring, count)) = result.counts.most_frequent() {
//!         println!("Most frequent: {bitstring} ({count} times)");
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod error;
pub mod job;
pub mod recorded;
pub mod result;

pub use backend::Backend;
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use recorded::RecordedBackend;
pub use result::{Counts, ExecutionResult};
