//! Bell-State Estimation Demo
//!
//! Prepares (|00⟩ + |11⟩)/√2 and estimates Pauli expectation values from
//! replayed counts, one measurement circuit per commuting group.

use std::path::PathBuf;

use clap::Parser;
use console::style;

use qtutor_demos::config::split_labels;
use qtutor_demos::observables::{Estimate, Estimator, ideal_bell_expectation};
use qtutor_demos::{
    DemoConfig, init_tracing, open_backend, print_block, print_header, print_info, print_result,
    print_section, print_success, run_with_spinner, save_counts,
};
use qtutor_ir::{Circuit, draw};
use qtutor_qasm3::emit;

#[derive(Parser, Debug)]
#[command(name = "demo-bell")]
#[command(about = "Estimate Pauli expectation values on a Bell state")]
struct Args {
    /// Observables to estimate, e.g. "ZZ,XX,YY"
    #[arg(short, long)]
    observables: Option<String>,

    /// Number of shots per measurement circuit
    #[arg(long)]
    shots: Option<u32>,

    /// Recorded counts to replay (JSON keyed by circuit name)
    #[arg(long)]
    counts_file: Option<PathBuf>,

    /// Write the measured counts to this file
    #[arg(long)]
    save_counts: Option<PathBuf>,

    /// Show generated QASM code for every measurement circuit
    #[arg(long)]
    show_qasm: bool,

    /// Configuration file
    #[arg(short, long, env = "QTUTOR_CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args).await {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = DemoConfig::load(args.config.as_deref())?;
    if let Some(list) = &args.observables {
        config.observables = split_labels(list);
    }
    if let Some(shots) = args.shots {
        config.shots = shots;
    }
    if args.counts_file.is_some() {
        config.counts_file = args.counts_file;
    }
    config.validate()?;

    print_header("Bell-State Estimation Demo");

    print_section("State Preparation");
    let prep = Circuit::bell_state_prep()?;
    print_block(&draw(&prep));

    let estimator = Estimator::from_labels(prep, &config.observables)?;
    let circuits = estimator.circuits()?;

    print_section("Measurement Plan");
    print_result("Observables", estimator.labels().len());
    print_result("Measurement circuits", circuits.len());
    for (group, circuit) in estimator.groups().iter().zip(&circuits) {
        let members: Vec<String> = group
            .members
            .iter()
            .map(|&i| estimator.labels()[i].to_string())
            .collect();
        print_result(circuit.name(), members.join(", "));
    }

    if args.show_qasm {
        for circuit in &circuits {
            print_section(&format!("Generated QASM3: {}", circuit.name()));
            println!("{}", emit(circuit)?);
        }
    }

    let estimates = match open_backend(&config)? {
        Some(backend) => {
            print_section("Execution");
            let mut group_counts = Vec::with_capacity(circuits.len());
            for circuit in &circuits {
                let result = run_with_spinner(&backend, circuit, config.shots).await?;
                print_result(circuit.name(), format!("{} shots", result.shots));
                group_counts.push(result.counts);
            }

            if let Some(path) = &args.save_counts {
                save_counts(
                    path,
                    circuits.iter().map(Circuit::name).zip(group_counts.iter()),
                )?;
                print_result("Counts written to", path.display());
            }

            Some(estimator.evaluate(&group_counts)?)
        }
        None => None,
    };

    print_section("Expectation Values");
    println!(
        "  {:<8} {:>8} {:>18}",
        style("label").dim(),
        style("ideal").dim(),
        style("estimate").dim()
    );
    for (i, label) in estimator.labels().iter().enumerate() {
        let ideal = ideal_bell_expectation(label)
            .map_or_else(|| "-".to_string(), |v| format!("{v:+.3}"));
        let estimate = estimates
            .as_ref()
            .map_or_else(|| "-".to_string(), |e| format_estimate(&e[i]));
        println!("  {:<8} {:>8} {:>18}", style(label.to_string()).cyan(), ideal, estimate);
    }

    println!();
    if estimates.is_none() {
        print_info("No recorded counts given; pass --counts-file to estimate from a run.");
    }
    print_success("Bell-state demo complete!");
    Ok(())
}

fn format_estimate(estimate: &Estimate) -> String {
    format!("{:+.3} ± {:.3}", estimate.value, estimate.std_error)
}
