//! Loader error types
//!
//! Two severities: [`ValidationError`] is returned for the caller to report,
//! [`FatalError`] is logged by the loader and ends the invocation.

use std::path::PathBuf;

/// Misconfiguration detected before any side effect
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Path given by {argument} does not exist: {}", path.display())]
    InvalidPath { argument: String, path: PathBuf },

    #[error("Device {0} is not valid (expected cpu, cuda or cuda:<index>)")]
    InvalidDevice(String),

    #[error("Device {device} is not available ({available} accelerator(s) detected)")]
    UnavailableDevice { device: String, available: usize },

    #[error("Device argument not valid: duplicated device {0}")]
    DuplicateDevice(String),

    #[error("Invalid choice of devices: CPU and GPU devices cannot be mixed")]
    MixedDevice,

    #[error("Invalid choice of devices: requested {requested} GPUs but only {available} is/are available")]
    InsufficientDevices { requested: usize, available: usize },

    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    #[error("Invalid value for argument {argument}: expected {expected}")]
    InvalidArgument { argument: String, expected: &'static str },
}

/// Command precondition failure; the invocation cannot continue
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FatalError {
    #[error("An experiment with name \"{0}\" already exists.")]
    ExperimentExists(String),

    #[error("Experiment with name \"{0}\" does not exist.")]
    ExperimentNotFound(String),

    #[error("Configuration file path is not correct: {}", .0.display())]
    ConfigNotFound(PathBuf),
}

/// Error returned by [`Execution::load`](super::Execution::load)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fatal(#[from] FatalError),
}

impl LoadError {
    /// Fatal errors have already been reported through the logger
    pub fn is_fatal(&self) -> bool {
        matches!(self, LoadError::Fatal(_))
    }
}
