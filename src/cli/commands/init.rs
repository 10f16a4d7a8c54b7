//! Init command implementation

use super::{experiment_name, parse_arg};
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::SEED;
use crate::execution::{Execution, CONFIG_PATH, CONFIG_SCHEMA_PATH};
use crate::experiment::Experiment;
use std::path::Path;

pub fn run_init(execution: &Execution, level: LogLevel) -> Result<(), String> {
    let name = experiment_name(execution)?;
    let config_path = execution
        .text(CONFIG_PATH)
        .map(Path::new)
        .ok_or_else(|| "Missing configuration path".to_string())?;
    let seed = parse_arg::<u64>(execution, SEED)?.unwrap_or(0);

    log(
        level,
        LogLevel::Verbose,
        &format!("Reading configuration: {}", config_path.display()),
    );

    let schema_path = execution
        .text(CONFIG_SCHEMA_PATH)
        .filter(|_| execution.schema_available())
        .map(Path::new);
    if let Some(schema) = schema_path {
        log(
            level,
            LogLevel::Verbose,
            &format!("Validating configuration against {}", schema.display()),
        );
    }

    let experiment =
        Experiment::create(execution.experiments_path(), name, config_path, schema_path, seed)
            .map_err(|e| format!("Failed to create experiment: {e}"))?;

    log(
        level,
        LogLevel::Normal,
        &format!(
            "Experiment {name} created at {}",
            experiment.paths().experiment.display()
        ),
    );
    Ok(())
}
