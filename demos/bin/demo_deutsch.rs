//! Deutsch's Algorithm Demo
//!
//! Builds the circuit for each one-bit oracle and classifies the function
//! from replayed counts.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use console::style;

use qtutor_demos::circuits::deutsch::{DeutschOracle, classify, deutsch_circuit};
use qtutor_demos::{
    DemoConfig, init_tracing, open_backend, print_block, print_execution, print_header,
    print_info, print_result, print_section, print_success, print_warning, run_with_spinner,
    save_counts,
};
use qtutor_hal::Counts;
use qtutor_ir::draw;
use qtutor_qasm3::emit;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OracleArg {
    ConstantZero,
    ConstantOne,
    Identity,
    Negation,
    All,
}

impl OracleArg {
    fn oracles(self) -> Vec<DeutschOracle> {
        match self {
            Self::ConstantZero => vec![DeutschOracle::ConstantZero],
            Self::ConstantOne => vec![DeutschOracle::ConstantOne],
            Self::Identity => vec![DeutschOracle::Identity],
            Self::Negation => vec![DeutschOracle::Negation],
            Self::All => DeutschOracle::ALL.to_vec(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "demo-deutsch")]
#[command(about = "Demonstrate Deutsch's algorithm")]
struct Args {
    /// Oracle to run
    #[arg(short, long, value_enum, default_value = "all")]
    oracle: OracleArg,

    /// Number of shots
    #[arg(long)]
    shots: Option<u32>,

    /// Recorded counts to replay (JSON keyed by circuit name)
    #[arg(long)]
    counts_file: Option<PathBuf>,

    /// Write the measured counts to this file
    #[arg(long)]
    save_counts: Option<PathBuf>,

    /// Show generated QASM code
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
    if let Some(shots) = args.shots {
        config.shots = shots;
    }
    if args.counts_file.is_some() {
        config.counts_file = args.counts_file;
    }
    config.validate()?;

    print_header("Deutsch's Algorithm Demo");

    let backend = open_backend(&config)?;
    let mut measured: Vec<(String, Counts)> = Vec::new();
    let mut correct = 0usize;
    let oracles = args.oracle.oracles();

    for oracle in &oracles {
        print_section(&format!("Oracle: {oracle}"));
        let circuit = deutsch_circuit(*oracle)?;
        print_result("Circuit", circuit.name());
        print_result("Circuit depth", circuit.depth());
        print_result("Expected class", oracle.class());
        println!();
        print_block(&draw(&circuit));

        if args.show_qasm {
            println!();
            println!("{}", emit(&circuit)?);
        }

        let Some(backend) = &backend else {
            continue;
        };

        let result = run_with_spinner(backend, &circuit, config.shots).await?;
        print_execution(&result);

        let class = classify(&result.counts)?;
        print_result("Measured class", class);
        if class == oracle.class() {
            correct += 1;
            print_success("Classified correctly");
        } else {
            print_warning("Classification disagrees with the oracle");
        }
        measured.push((circuit.name().to_string(), result.counts));
    }

    print_section("Summary");
    if backend.is_none() {
        print_info("No recorded counts given; pass --counts-file to classify runs.");
    } else {
        print_result(
            "Correctly classified",
            format!("{correct}/{}", oracles.len()),
        );
    }

    if let Some(path) = &args.save_counts {
        if measured.is_empty() {
            print_warning("Nothing measured; no counts written");
        } else {
            save_counts(path, measured.iter().map(|(name, c)| (name.as_str(), c)))?;
            print_result("Counts written to", path.display());
        }
    }

    println!();
    print_success("Deutsch demo complete!");
    Ok(())
}
