//! Bernstein-Vazirani Demo
//!
//! Builds the oracle circuit for a secret, shows it, and recovers the secret
//! from replayed counts.

use std::path::PathBuf;

use clap::Parser;
use console::style;

use qtutor_demos::circuits::bernstein_vazirani::{
    OracleMode, Secret, bernstein_vazirani_circuit, expected_outcome, is_possible_outcome,
    recover_secret,
};
use qtutor_demos::{
    DemoConfig, init_tracing, open_backend, print_block, print_execution, print_header,
    print_info, print_result, print_section, print_success, print_warning, run_with_spinner,
    save_counts,
};
use qtutor_ir::draw;
use qtutor_qasm3::{emit, emit_qasm2};

#[derive(Parser, Debug)]
#[command(name = "demo-bv")]
#[command(about = "Demonstrate the Bernstein-Vazirani algorithm")]
struct Args {
    /// Secret bit string, most significant bit first
    #[arg(short, long)]
    secret: Option<String>,

    /// Do not use an ancilla qubit
    #[arg(long)]
    no_ancilla: bool,

    /// Give every input qubit its own target (only without ancilla)
    #[arg(long)]
    paired: bool,

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

    /// Emit OpenQASM 2.0 instead of 3.0
    #[arg(long, requires = "show_qasm")]
    qasm2: bool,

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
    if let Some(secret) = args.secret {
        config.secret = secret;
    }
    if let Some(shots) = args.shots {
        config.shots = shots;
    }
    if args.counts_file.is_some() {
        config.counts_file = args.counts_file;
    }
    if args.no_ancilla {
        config.use_ancilla = false;
    }
    if args.paired {
        config.use_paired = true;
    }
    config.validate()?;

    print_header("Bernstein-Vazirani Demo");

    let secret = Secret::parse(&config.secret)?;
    let mode = OracleMode::from_flags(config.use_ancilla, config.use_paired);

    print_section("Problem Setup");
    print_result("Secret", &secret);
    print_result("Secret length", secret.len());
    print_result("Set bits", secret.popcount());
    print_result("Oracle mode", mode);
    if config.use_ancilla && config.use_paired {
        print_info("Both ancilla and paired requested; ancilla takes precedence");
    }

    print_section("Circuit Generation");
    let circuit = bernstein_vazirani_circuit(&secret, mode)?;
    print_result("Qubits", circuit.num_qubits());
    print_result("Classical bits", circuit.num_clbits());
    print_result("Circuit depth", circuit.depth());
    print_result("Oracle CX gates", circuit.cx_pairs().len());
    println!();
    print_block(&draw(&circuit));

    if args.show_qasm {
        let (title, qasm) = if args.qasm2 {
            ("Generated QASM2", emit_qasm2(&circuit)?)
        } else {
            ("Generated QASM3", emit(&circuit)?)
        };
        print_section(title);
        println!("{qasm}");
    }

    print_section("Expected Results");
    let expected = expected_outcome(&secret, mode);
    match &expected {
        Some(outcome) => print_result("Ideal outcome", outcome),
        None => print_result("Ideal outcome", "random on the set bits"),
    }
    print_result("Classical queries needed", secret.len());
    print_result("Quantum queries needed", 1);
    match mode {
        OracleMode::Ancilla => {}
        OracleMode::Paired => {
            print_warning("Paired targets start in |0⟩; set bits read out at random")
        }
        OracleMode::Plain => {
            print_warning("Plain mode applies uncontrolled X gates; the secret is not encoded")
        }
    }

    let Some(backend) = open_backend(&config)? else {
        println!();
        print_info("No recorded counts given; pass --counts-file to analyze a run.");
        print_success("Bernstein-Vazirani demo complete!");
        return Ok(());
    };

    print_section("Execution");
    let result = run_with_spinner(&backend, &circuit, config.shots).await?;
    print_execution(&result);

    print_section("Analysis");
    let recovered = recover_secret(&result.counts)?;
    print_result("Recovered secret", &recovered);
    print_result(
        "Outcome probability",
        format!("{:.1}%", result.counts.probability(&recovered.to_string()) * 100.0),
    );

    if let Some(path) = &args.save_counts {
        save_counts(path, [(circuit.name(), &result.counts)])?;
        print_result("Counts written to", path.display());
    }

    println!();
    match expected {
        Some(expected) if recovered == expected => {
            print_success("Recovered the expected outcome");
        }
        Some(expected) => {
            print_warning(&format!("Recovered {recovered}, expected {expected}"));
        }
        None if is_possible_outcome(&secret, mode, &recovered) => {
            print_info("Outcome is consistent with the paired oracle");
        }
        None => {
            print_warning(&format!("Recovered {recovered}, which paired mode cannot produce"));
        }
    }

    Ok(())
}
