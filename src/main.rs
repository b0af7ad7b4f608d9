//! APEX Pipeline Simulator CLI.
//!
//! # Usage
//!
//! ```text
//! apex-sim <input_file> <simulate|silent> <max_cycles> [--config <path>]
//! ```
//!
//! `simulate` prints the stage-by-stage trace for every cycle; `silent` only
//! prints the final machine state. Both end with the register file, the first
//! data-memory cells and the run statistics.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use apex_sim::config::Config;
use apex_sim::sim::{loader, report, RunOutcome, Simulator};

/// Command-line arguments for the APEX simulator.
#[derive(Parser, Debug)]
#[command(author, version, about = "APEX 7-Stage Pipeline Simulator")]
struct Args {
    /// Program file in APEX assembly text.
    input_file: PathBuf,

    /// Output mode.
    #[arg(value_enum)]
    mode: Mode,

    /// Number of cycles to simulate at most.
    max_cycles: u64,

    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Per-cycle stage trace plus final state.
    Simulate,
    /// Final state only.
    Silent,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Main entry point.
///
/// 1. Parses arguments and the optional configuration file.
/// 2. Loads the program into code memory.
/// 3. Runs the cycle loop, tracing each cycle in `simulate` mode.
/// 4. Prints the final state and exits 0, or 1 on any failure.
fn main() {
    init_logging();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    let config = match &args.config {
        Some(path) => Config::load(path).unwrap_or_else(|e| {
            eprintln!("APEX_Error: {e}");
            process::exit(1);
        }),
        None => Config::default(),
    };

    let program = loader::load_program(&args.input_file, &config).unwrap_or_else(|e| {
        eprintln!("APEX_Error: Unable to initialize CPU: {e}");
        process::exit(1);
    });

    let trace =
        args.mode == Mode::Simulate || config.general.trace || cfg!(feature = "always-trace");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut sim = Simulator::new(program, &config);

    let result = if trace {
        report::write_listing(&mut out, &sim.cpu.program)
            .map_err(Into::into)
            .and_then(|()| sim.run_traced(args.max_cycles, &mut out))
    } else {
        sim.run(args.max_cycles)
    };

    let code = match result {
        Ok(RunOutcome::CycleLimit { cycles }) => {
            let _ = writeln!(out, "(apex) >> Cycle limit reached after {cycles} cycles");
            0
        }
        Ok(_) => {
            let _ = writeln!(out, "(apex) >> Simulation Complete");
            0
        }
        Err(e) => {
            eprintln!("[!] FATAL: {e}");
            1
        }
    };

    if let Err(e) = report::write_final_state(&mut out, &sim.cpu, config.memory.report_window)
        .and_then(|()| out.flush())
    {
        eprintln!("[!] FATAL: {e}");
        process::exit(1);
    }
    process::exit(code);
}
