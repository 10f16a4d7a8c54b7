//! Experiment error types

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, ExperimentError>;

#[derive(Debug, thiserror::Error)]
pub enum ExperimentError {
    #[error("Experiment directory not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Experiment directory already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Invalid configuration in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("Invalid configuration schema {}: {message}", .path.display())]
    Schema { path: PathBuf, message: String },

    #[error("Configuration does not match schema {}: {}", .schema.display(), .violations.join("; "))]
    SchemaViolation { schema: PathBuf, violations: Vec<String> },

    #[error("Epoch {0} not found")]
    EpochNotFound(usize),

    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ExperimentError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }
}
