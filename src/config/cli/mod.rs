//! CLI argument parsing
//!
//! This module provides the command-line interface of andamio.
//!
//! # Usage
//!
//! ```bash
//! andamio --experiment-name baseline init --config-path config.json
//! andamio --experiment-name baseline info
//! andamio --experiment-name baseline train --device cuda:0 cuda:1
//! andamio --experiment-name baseline test --epoch 10 --device cpu
//! ```

mod core;
mod init;
mod pipeline;


pub use core::{parse_args, Cli, Command};
pub use init::{InitArgs, SEED};
pub use pipeline::{TestArgs, TrainArgs, EPOCH, LOG_PERIOD, MAX_EPOCHS, NUM_WORKERS};
