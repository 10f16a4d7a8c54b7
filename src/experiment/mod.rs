//! On-disk experiment layout
//!
//! ```text
//! <experiments_path>/<name>/
//! ├── checkpoints/      <epoch>.checkpoint files
//! ├── results/
//! ├── tensorboard/
//! ├── config.json       configuration copied at creation, plus `_others.seed`
//! └── verbose.log
//! ```

mod error;


pub use error::{ExperimentError, Result};

use regex::Regex;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static CHECKPOINT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)\.checkpoint$").expect("Invalid checkpoint regex"));

/// Paths of the files and folders belonging to an experiment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentPaths {
    pub experiment: PathBuf,
    pub checkpoints: PathBuf,
    pub results: PathBuf,
    pub tensorboard: PathBuf,
    pub configuration: PathBuf,
    pub log: PathBuf,
}

impl ExperimentPaths {
    pub fn new(experiments_path: &Path, name: &str) -> Self {
        let experiment = experiments_path.join(name);
        Self {
            checkpoints: experiment.join("checkpoints"),
            results: experiment.join("results"),
            tensorboard: experiment.join("tensorboard"),
            configuration: experiment.join("config.json"),
            log: experiment.join("verbose.log"),
            experiment,
        }
    }

    /// Checkpoint file of an epoch
    pub fn checkpoint(&self, epoch: usize) -> PathBuf {
        self.checkpoints.join(format!("{epoch}.checkpoint"))
    }
}

/// An experiment and its stored configuration
#[derive(Debug, Clone)]
pub struct Experiment {
    name: String,
    paths: ExperimentPaths,
    configuration: Value,
}

impl Experiment {
    /// Create the experiment layout from a JSON configuration file
    ///
    /// With a schema, the configuration must satisfy it before anything is
    /// written.
    pub fn create(
        experiments_path: &Path,
        name: &str,
        config_path: &Path,
        schema_path: Option<&Path>,
        seed: u64,
    ) -> Result<Self> {
        let paths = ExperimentPaths::new(experiments_path, name);
        if paths.experiment.exists() {
            return Err(ExperimentError::AlreadyExists(paths.experiment));
        }

        let mut configuration = read_configuration(config_path)?;
        if let Some(schema_path) = schema_path {
            validate_configuration(&configuration, schema_path)?;
        }
        if let Value::Object(sections) = &mut configuration {
            sections.insert("_others".to_string(), json!({ "seed": seed }));
        }

        for dir in [&paths.experiment, &paths.checkpoints, &paths.tensorboard, &paths.results] {
            fs::create_dir_all(dir)
                .map_err(|e| ExperimentError::io(format!("creating {}", dir.display()), e))?;
        }
        fs::File::create(&paths.log)
            .map_err(|e| ExperimentError::io(format!("creating {}", paths.log.display()), e))?;
        write_configuration(&paths.configuration, &configuration)?;

        tracing::info!(experiment = name, "Experiment created successfully");
        Ok(Self { name: name.to_string(), paths, configuration })
    }

    /// Open an existing experiment
    pub fn open(experiments_path: &Path, name: &str) -> Result<Self> {
        let paths = ExperimentPaths::new(experiments_path, name);
        if !paths.experiment.is_dir() {
            return Err(ExperimentError::NotFound(paths.experiment));
        }
        let configuration = read_configuration(&paths.configuration)?;

        tracing::debug!(experiment = name, "Experiment loaded");
        Ok(Self { name: name.to_string(), paths, configuration })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn paths(&self) -> &ExperimentPaths {
        &self.paths
    }

    pub fn configuration(&self) -> &Value {
        &self.configuration
    }

    /// Seed stored at creation
    pub fn seed(&self) -> Option<u64> {
        self.configuration.get("_others")?.get("seed")?.as_u64()
    }

    /// Epochs with a stored checkpoint, ascending
    pub fn checkpoints(&self) -> Result<Vec<usize>> {
        let entries = match fs::read_dir(&self.paths.checkpoints) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ExperimentError::io(
                    format!("listing {}", self.paths.checkpoints.display()),
                    e,
                ))
            }
        };

        let mut epochs: Vec<usize> = entries
            .flatten()
            .filter_map(|entry| {
                let file_name = entry.file_name();
                let captures = CHECKPOINT_REGEX.captures(file_name.to_str()?)?;
                captures[1].parse().ok()
            })
            .collect();
        epochs.sort_unstable();
        Ok(epochs)
    }
}

/// Pick the checkpoint to restore
///
/// A requested epoch must have a checkpoint. Without one, the latest
/// checkpoint is used, or `None` to start from scratch.
pub fn resolve_epoch(requested: Option<usize>, available: &[usize]) -> Result<Option<usize>> {
    match requested {
        Some(epoch) if available.contains(&epoch) => Ok(Some(epoch)),
        Some(epoch) => Err(ExperimentError::EpochNotFound(epoch)),
        None => Ok(available.last().copied()),
    }
}

fn read_configuration(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .map_err(|e| ExperimentError::io(format!("reading {}", path.display()), e))?;
    let value: Value = serde_json::from_str(&content).map_err(|e| ExperimentError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    if !value.is_object() {
        return Err(ExperimentError::Config {
            path: path.to_path_buf(),
            message: "expected a JSON object of configuration sections".to_string(),
        });
    }
    Ok(value)
}

/// Check a configuration against a JSON schema file
pub fn validate_configuration(configuration: &Value, schema_path: &Path) -> Result<()> {
    let schema_error = |message: String| ExperimentError::Schema {
        path: schema_path.to_path_buf(),
        message,
    };
    let content = fs::read_to_string(schema_path)
        .map_err(|e| ExperimentError::io(format!("reading {}", schema_path.display()), e))?;
    let schema: Value = serde_json::from_str(&content).map_err(|e| schema_error(e.to_string()))?;
    let validator = jsonschema::validator_for(&schema).map_err(|e| schema_error(e.to_string()))?;

    let violations: Vec<String> = validator
        .iter_errors(configuration)
        .map(|error| error.to_string())
        .collect();
    if !violations.is_empty() {
        return Err(ExperimentError::SchemaViolation {
            schema: schema_path.to_path_buf(),
            violations,
        });
    }
    tracing::debug!(schema = %schema_path.display(), "Configuration validated");
    Ok(())
}

fn write_configuration(path: &Path, configuration: &Value) -> Result<()> {
    let content = serde_json::to_string_pretty(configuration).map_err(|e| ExperimentError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    fs::write(path, content).map_err(|e| ExperimentError::io(format!("writing {}", path.display()), e))
}

/// Section names of a configuration, sorted
pub fn configuration_sections(configuration: &Value) -> Vec<&str> {
    configuration
        .as_object()
        .map(Map::keys)
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect()
}
