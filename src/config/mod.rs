//! Command-line configuration

pub mod cli;

pub use cli::{
    parse_args, Cli, Command, InitArgs, TestArgs, TrainArgs, EPOCH, LOG_PERIOD, MAX_EPOCHS,
    NUM_WORKERS, SEED,
};
