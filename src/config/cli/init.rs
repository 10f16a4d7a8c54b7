//! Init command types

use clap::Parser;
use std::path::PathBuf;

use super::core::path_text;
use crate::execution::{RawArguments, CONFIG_PATH, CONFIG_SCHEMA_PATH};

/// Seed stored in the experiment configuration
pub const SEED: &str = "seed";

/// Arguments for the init command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InitArgs {
    /// Path to the JSON configuration file
    #[arg(long)]
    pub config_path: PathBuf,

    /// Path to a JSON schema used to validate the configuration
    #[arg(long)]
    pub config_schema_path: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

impl InitArgs {
    pub(crate) fn write_raw(&self, raw: &mut RawArguments) {
        raw.insert_text(CONFIG_PATH, path_text(&self.config_path));
        raw.insert(CONFIG_SCHEMA_PATH, self.config_schema_path.as_deref().map(path_text));
        raw.insert_text(SEED, self.seed.to_string());
    }
}
