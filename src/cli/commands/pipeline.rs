//! Train and test command implementations
//!
//! Both resolve the checkpoint to start from and report the run plan; the
//! training loop itself belongs to the pipeline runner.

use super::{experiment_name, format_devices, parse_arg};
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{EPOCH, LOG_PERIOD, MAX_EPOCHS, NUM_WORKERS};
use crate::execution::Execution;
use crate::experiment::{resolve_epoch, Experiment};

/// Epoch range a training run covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainPlan {
    /// Checkpoint restored before training, if any
    pub resume_from: Option<usize>,
    pub first_epoch: usize,
    pub max_epochs: usize,
}

impl TrainPlan {
    pub fn new(resume_from: Option<usize>, max_epochs: usize) -> Self {
        Self {
            resume_from,
            first_epoch: resume_from.map_or(1, |epoch| epoch.saturating_add(1)),
            max_epochs,
        }
    }

    /// True when the restored checkpoint already reached `max_epochs`
    pub fn is_complete(&self) -> bool {
        self.first_epoch > self.max_epochs
    }
}

pub fn plan_train(execution: &Execution, experiment: &Experiment) -> Result<TrainPlan, String> {
    let requested = parse_arg::<usize>(execution, EPOCH)?;
    let max_epochs = parse_arg::<usize>(execution, MAX_EPOCHS)?.unwrap_or(999);
    let checkpoints = experiment.checkpoints().map_err(|e| e.to_string())?;
    let resume_from = resolve_epoch(requested, &checkpoints).map_err(|e| e.to_string())?;
    Ok(TrainPlan::new(resume_from, max_epochs))
}

pub fn run_train(execution: &Execution, level: LogLevel) -> Result<(), String> {
    let name = experiment_name(execution)?;
    let experiment = Experiment::open(execution.experiments_path(), name)
        .map_err(|e| format!("Failed to load experiment: {e}"))?;
    let plan = plan_train(execution, &experiment)?;
    let devices = format_devices(execution.devices().unwrap_or_default());

    match plan.resume_from {
        Some(epoch) => log(level, LogLevel::Normal, &format!("Checkpoint of epoch {epoch} selected")),
        None => log(level, LogLevel::Verbose, "No checkpoint found, starting from scratch"),
    }
    if plan.is_complete() {
        log(
            level,
            LogLevel::Normal,
            &format!("Training completed: max epochs {} already reached", plan.max_epochs),
        );
        return Ok(());
    }

    let log_period = parse_arg::<usize>(execution, LOG_PERIOD)?.unwrap_or(100);
    let num_workers = parse_arg::<usize>(execution, NUM_WORKERS)?.unwrap_or(1);
    tracing::info!(
        experiment = name,
        devices = %devices,
        first_epoch = plan.first_epoch,
        max_epochs = plan.max_epochs,
        log_period,
        num_workers,
        "Training run planned"
    );
    log(
        level,
        LogLevel::Normal,
        &format!(
            "Training {name} on [{devices}]: epochs {}..={}",
            plan.first_epoch, plan.max_epochs
        ),
    );
    log(
        level,
        LogLevel::Verbose,
        &format!("  Log period: {log_period}\n  Data workers: {num_workers}"),
    );
    Ok(())
}

pub fn run_test(execution: &Execution, level: LogLevel) -> Result<(), String> {
    let name = experiment_name(execution)?;
    let experiment = Experiment::open(execution.experiments_path(), name)
        .map_err(|e| format!("Failed to load experiment: {e}"))?;
    let epoch = parse_arg::<usize>(execution, EPOCH)?
        .ok_or_else(|| "The test command requires an epoch".to_string())?;
    let checkpoints = experiment.checkpoints().map_err(|e| e.to_string())?;
    resolve_epoch(Some(epoch), &checkpoints).map_err(|e| e.to_string())?;

    let devices = format_devices(execution.devices().unwrap_or_default());
    tracing::info!(experiment = name, epoch, devices = %devices, "Test run planned");
    log(
        level,
        LogLevel::Normal,
        &format!("Testing {name} at epoch {epoch} on [{devices}]"),
    );
    Ok(())
}
