//! Info command implementation

use super::experiment_name;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::execution::Execution;
use crate::experiment::{configuration_sections, Experiment};

/// Format experiment information as a string
pub fn format_experiment_info(experiment: &Experiment, checkpoints: &[usize]) -> String {
    let paths = experiment.paths();
    let mut lines = vec![
        format!("Experiment: {}", experiment.name()),
        format!("  Path: {}", paths.experiment.display()),
    ];
    if let Some(seed) = experiment.seed() {
        lines.push(format!("  Seed: {seed}"));
    }

    let sections: Vec<&str> = configuration_sections(experiment.configuration())
        .into_iter()
        .filter(|section| !section.starts_with('_'))
        .collect();
    lines.push(format!("  Configuration sections: {}", sections.join(", ")));

    if checkpoints.is_empty() {
        lines.push("  Checkpoints: none".to_string());
    } else {
        let epochs: Vec<String> = checkpoints.iter().map(ToString::to_string).collect();
        lines.push(format!("  Checkpoints: {}", epochs.join(", ")));
    }
    lines.join("\n")
}

pub fn run_info(execution: &Execution, level: LogLevel) -> Result<(), String> {
    let name = experiment_name(execution)?;
    let experiment = Experiment::open(execution.experiments_path(), name)
        .map_err(|e| format!("Failed to load experiment: {e}"))?;
    let checkpoints = experiment.checkpoints().map_err(|e| e.to_string())?;
    tracing::debug!(experiment = name, checkpoints = checkpoints.len(), "Experiment inspected");

    log(level, LogLevel::Normal, &format_experiment_info(&experiment, &checkpoints));
    Ok(())
}
