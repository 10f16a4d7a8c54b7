//! Core CLI types - Cli, Command and conversion into raw arguments

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use super::init::InitArgs;
use super::pipeline::{TestArgs, TrainArgs};
use crate::execution::{
    RawArguments, BASE_PATH, COMMAND, DATA_PATH, EXPERIMENTS_PATH, EXPERIMENT_NAME,
};

/// Andamio: experiment runner for ML training pipelines
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "andamio")]
#[command(version)]
#[command(about = "Create, inspect and run training experiments")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Name of the experiment
    #[arg(long)]
    pub experiment_name: String,

    /// Root of the project; default experiments and data paths live here
    #[arg(long, default_value = ".")]
    pub base_path: PathBuf,

    /// Directory holding the experiments [default: <BASE_PATH>/experiments]
    #[arg(long)]
    pub experiments_path: Option<PathBuf>,

    /// Directory holding the datasets [default: <BASE_PATH>/data]
    #[arg(long)]
    pub data_path: Option<PathBuf>,

    /// Override the number of detected accelerators
    #[arg(long, global = true)]
    pub accelerators: Option<usize>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a new experiment from a configuration file
    Init(InitArgs),

    /// Display information about an experiment
    Info,

    /// Train the model of an experiment
    Train(TrainArgs),

    /// Test the model of an experiment at a given epoch
    Test(TestArgs),
}

impl Command {
    /// Name used as the `command` raw argument
    pub fn name(&self) -> &'static str {
        match self {
            Command::Init(_) => "init",
            Command::Info => "info",
            Command::Train(_) => "train",
            Command::Test(_) => "test",
        }
    }
}

impl Cli {
    /// Flatten the parsed command line into the mapping the loader expects
    ///
    /// Every argument the command accepts gets a key; options left out are
    /// stored as `Null`.
    pub fn to_raw_arguments(&self) -> RawArguments {
        let mut raw = RawArguments::new();
        raw.insert_text(COMMAND, self.command.name());
        raw.insert_text(EXPERIMENT_NAME, self.experiment_name.clone());
        raw.insert_text(BASE_PATH, path_text(&self.base_path));
        raw.insert(EXPERIMENTS_PATH, self.experiments_path.as_deref().map(path_text));
        raw.insert(DATA_PATH, self.data_path.as_deref().map(path_text));

        match &self.command {
            Command::Init(args) => args.write_raw(&mut raw),
            Command::Info => {}
            Command::Train(args) => args.write_raw(&mut raw),
            Command::Test(args) => args.write_raw(&mut raw),
        }
        raw
    }
}

pub(crate) fn path_text(path: &Path) -> String {
    path.display().to_string()
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
