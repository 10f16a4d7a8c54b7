//! Train and test command types

use clap::Parser;

use crate::execution::{RawArguments, DEVICE};

/// Checkpoint epoch to start from or evaluate
pub const EPOCH: &str = "epoch";
/// Last epoch of a training run
pub const MAX_EPOCHS: &str = "max_epochs";
/// Iterations between loss reports
pub const LOG_PERIOD: &str = "log_period";
/// Data loader workers
pub const NUM_WORKERS: &str = "num_workers";

/// Arguments for the train command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct TrainArgs {
    /// Resume from this epoch instead of the latest checkpoint
    #[arg(long)]
    pub epoch: Option<usize>,

    /// Train until this epoch
    #[arg(long, default_value_t = 999)]
    pub max_epochs: usize,

    /// Report the loss every N iterations
    #[arg(long, default_value_t = 100)]
    pub log_period: usize,

    /// Number of data loader workers
    #[arg(long, default_value_t = 1)]
    pub num_workers: usize,

    /// Devices to run on: cpu, cuda or cuda:<index> (repeatable)
    #[arg(long, num_args = 1..)]
    pub device: Option<Vec<String>>,
}

impl TrainArgs {
    pub(crate) fn write_raw(&self, raw: &mut RawArguments) {
        raw.insert(EPOCH, self.epoch.map(|epoch| epoch.to_string()));
        raw.insert_text(MAX_EPOCHS, self.max_epochs.to_string());
        raw.insert_text(LOG_PERIOD, self.log_period.to_string());
        raw.insert_text(NUM_WORKERS, self.num_workers.to_string());
        raw.insert(DEVICE, self.device.clone());
    }
}

/// Arguments for the test command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct TestArgs {
    /// Epoch of the checkpoint to evaluate
    #[arg(long)]
    pub epoch: usize,

    /// Number of data loader workers
    #[arg(long, default_value_t = 1)]
    pub num_workers: usize,

    /// Devices to run on: cpu, cuda or cuda:<index> (repeatable)
    #[arg(long, num_args = 1..)]
    pub device: Option<Vec<String>>,
}

impl TestArgs {
    pub(crate) fn write_raw(&self, raw: &mut RawArguments) {
        raw.insert_text(EPOCH, self.epoch.to_string());
        raw.insert_text(NUM_WORKERS, self.num_workers.to_string());
        raw.insert(DEVICE, self.device.clone());
    }
}
