//! CLI module for andamio
//!
//! This module contains the command handlers and the process-boundary
//! logic of the binary.

mod commands;
mod logging;

pub use commands::run_command;
pub use logging::{init_tracing, LogLevel};

// Re-export Cli from config for convenience
pub use crate::config::Cli;

use crate::execution::{
    AcceleratorProbe, Execution, FixedAccelerators, LoadError, SystemAccelerators, TracingLogger,
};

/// Result of a full CLI invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Error to print before exiting
    Failed(String),
    /// Error already reported through the log; exit without printing
    Aborted,
}

/// Load the execution described by `cli` and dispatch it
pub fn run(cli: &Cli) -> Outcome {
    let level = LogLevel::from_flags(cli.verbose, cli.quiet);
    let accelerators: Box<dyn AcceleratorProbe> = match cli.accelerators {
        Some(count) => Box::new(FixedAccelerators::new(count)),
        None => Box::new(SystemAccelerators),
    };

    let execution = match Execution::load(cli.to_raw_arguments(), &TracingLogger, accelerators.as_ref()) {
        Ok(execution) => execution,
        Err(LoadError::Fatal(_)) => return Outcome::Aborted,
        Err(LoadError::Validation(e)) => return Outcome::Failed(e.to_string()),
    };

    match run_command(&execution, level) {
        Ok(()) => Outcome::Success,
        Err(e) => Outcome::Failed(e),
    }
}
