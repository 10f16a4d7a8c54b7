//! CLI command implementations

mod info;
mod init;
mod pipeline;


use crate::cli::logging::{log, with_experiment_log};
use crate::cli::LogLevel;
use crate::execution::{DeviceSpec, Execution};
use crate::experiment::ExperimentPaths;
use std::str::FromStr;

/// Execute the command of a validated execution
pub fn run_command(execution: &Execution, level: LogLevel) -> Result<(), String> {
    if level == LogLevel::Verbose {
        let summary = serde_json::to_string_pretty(execution)
            .map_err(|e| format!("Failed to serialize execution: {e}"))?;
        log(level, LogLevel::Verbose, &summary);
    }

    let handler: fn(&Execution, LogLevel) -> Result<(), String> = match execution.command() {
        "init" => return init::run_init(execution, level),
        "info" => info::run_info,
        "train" => pipeline::run_train,
        "test" => pipeline::run_test,
        other => return Err(format!("Unknown command: {other}")),
    };

    // Commands on an existing experiment keep their log inside it
    let log_path = ExperimentPaths::new(execution.experiments_path(), experiment_name(execution)?).log;
    with_experiment_log(&log_path, level, || handler(execution, level))
        .map_err(|e| format!("Failed to open experiment log {}: {e}", log_path.display()))?
}

fn experiment_name(execution: &Execution) -> Result<&str, String> {
    execution
        .experiment_name()
        .ok_or_else(|| "Missing experiment name".to_string())
}

/// Parse an optional numeric argument stored as text
fn parse_arg<T>(execution: &Execution, key: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    execution
        .text(key)
        .map(|value| value.parse().map_err(|e| format!("Invalid {key} '{value}': {e}")))
        .transpose()
}

fn format_devices(devices: &[DeviceSpec]) -> String {
    devices
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
