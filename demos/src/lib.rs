//! qtutor Demo Suite
//!
//! Small textbook algorithms built on the qtutor circuit IR:
//!
//! - **Bernstein-Vazirani**: recover a secret bit string with one oracle query
//! - **Deutsch**: decide whether a one-bit function is constant or balanced
//! - **Bell state**: estimate Pauli expectation values from measured counts
//!
//! Circuits are descriptions only. The binaries draw them, emit `OpenQASM`
//! for an external executor, and analyze counts replayed through a
//! [`qtutor_hal::Backend`]:
//!
//! ```ignore
//! use qtutor_demos::circuits::bernstein_vazirani::{build, recover_secret};
//! use qtutor_hal::{Backend, RecordedBackend};
//!
//! let circuit = build("10110101", true, false)?;
//! let backend = RecordedBackend::from_json_file("counts.json")?;
//! let result = backend.run(&circuit, 1024).await?;
//! println!("secret: {}", recover_secret(&result.counts)?);
//! ```

pub mod circuits;
pub mod config;
pub mod error;
pub mod observables;

use std::path::Path;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use qtutor_hal::{Backend, Counts, ExecutionResult, RecordedBackend};
use qtutor_ir::Circuit;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use config::{ConfigError, DemoConfig};
pub use error::{DemoError, DemoResult};

/// Outcomes shown in a histogram before the rest are summarized.
const MAX_HISTOGRAM_ROWS: usize = 16;

/// Initialize logging for a demo binary.
///
/// `-v` repetitions select warn, info, debug or trace. `RUST_LOG` wins when set.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Create a spinner for waiting on a backend.
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("⚠").yellow().bold(), message);
}

/// Print an indented multi-line block, such as a circuit diagram.
pub fn print_block(text: &str) {
    for line in text.lines() {
        println!("  {line}");
    }
}

/// Print counts as a histogram, most frequent first.
pub fn print_counts(counts: &Counts) {
    let sorted = counts.sorted();
    let total = counts.total_shots().max(1) as f64;

    for (bitstring, count) in sorted.iter().take(MAX_HISTOGRAM_ROWS) {
        let prob = *count as f64 / total * 100.0;
        let bar_len = (prob / 2.0).round() as usize;

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style("█".repeat(bar_len)).green()
        );
    }

    if sorted.len() > MAX_HISTOGRAM_ROWS {
        println!("  ... and {} more outcomes", sorted.len() - MAX_HISTOGRAM_ROWS);
    }
}

/// Print an execution result: shot count, histogram and timing.
pub fn print_execution(result: &ExecutionResult) {
    println!(
        "\n{} Results ({} shots):",
        style("✓").green().bold(),
        result.shots
    );
    print_counts(&result.counts);

    if let Some(time_ms) = result.execution_time_ms {
        println!("\n  Execution time: {} ms", style(time_ms).yellow());
    }
}

/// Open the recorded counts named by the configuration, if any.
pub fn open_backend(config: &DemoConfig) -> DemoResult<Option<RecordedBackend>> {
    let Some(path) = config.counts_file.as_deref() else {
        return Ok(None);
    };
    let backend = RecordedBackend::from_json_file(path)?;
    info!(
        "Replaying counts for {} circuits from {}",
        backend.circuit_names().len(),
        path.display()
    );
    Ok(Some(backend))
}

/// Run `circuit` on `backend` behind a spinner.
pub async fn run_with_spinner<B: Backend + ?Sized>(
    backend: &B,
    circuit: &Circuit,
    shots: u32,
) -> DemoResult<ExecutionResult> {
    let spinner = create_spinner(&format!("Running '{}' on {}", circuit.name(), backend.name()));
    let result = backend.run(circuit, shots).await;
    spinner.finish_and_clear();
    Ok(result?)
}

/// Write `{circuit name: counts}` entries in the format recorded backends read.
pub fn save_counts<'a>(
    path: &Path,
    entries: impl IntoIterator<Item = (&'a str, &'a Counts)>,
) -> DemoResult<()> {
    let map: std::collections::BTreeMap<&str, &Counts> = entries.into_iter().collect();
    let json = serde_json::to_string_pretty(&map)?;
    std::fs::write(path, json)?;
    info!("Wrote counts for {} circuits to {}", map.len(), path.display());
    Ok(())
}
