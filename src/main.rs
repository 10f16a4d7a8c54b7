//! Andamio CLI
//!
//! Experiment runner entry point.
//!
//! # Usage
//!
//! ```bash
//! # Create an experiment
//! andamio --experiment-name baseline init --config-path config.json
//!
//! # Show experiment info
//! andamio --experiment-name baseline info
//!
//! # Train on two GPUs
//! andamio --experiment-name baseline train --device cuda:0 cuda:1
//!
//! # Test a checkpoint on CPU
//! andamio --experiment-name baseline test --epoch 10 --device cpu
//! ```

use andamio::cli::{init_tracing, run, Cli, LogLevel, Outcome};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(LogLevel::from_flags(cli.verbose, cli.quiet));

    match run(&cli) {
        Outcome::Success => ExitCode::SUCCESS,
        Outcome::Failed(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Outcome::Aborted => ExitCode::FAILURE,
    }
}
