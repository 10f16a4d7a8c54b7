//! Execution loading and validation
//!
//! An [`Execution`] records which command was invoked and with which
//! arguments. It is built once per process from the raw argument mapping:
//!
//! 1. the command is extracted and default paths/devices are filled in,
//! 2. paths and device specifiers are checked ([`ValidationError`]),
//! 3. command preconditions are checked ([`FatalError`], reported through
//!    the injected [`ExecutionLogger`] before being returned).
//!
//! The loader never ends the process; the binary decides what to do with a
//! [`LoadError`].

mod args;
mod device;
mod error;
mod logger;
mod validator;

#[cfg(test)]
mod proptests;

pub use args::{
    ArgValue, Arguments, RawArguments, BASE_PATH, COMMAND, CONFIG_PATH, CONFIG_SCHEMA_PATH,
    DATA_PATH, DEVICE, EXPERIMENTS_PATH, EXPERIMENT_NAME,
};
pub use device::{
    default_devices, validate_devices, AcceleratorProbe, DeviceSpec, FixedAccelerators,
    SystemAccelerators,
};
pub use error::{FatalError, LoadError, ValidationError};
pub use logger::{ExecutionLogger, TracingLogger};
pub use validator::{normalize, validate_init_args, validate_main_args, validate_pipeline_args};

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Command that creates a new experiment
pub const INIT: &str = "init";

/// Validated command invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Execution {
    command: String,
    arguments: Arguments,
    #[serde(skip)]
    experiments_path: PathBuf,
    #[serde(skip)]
    data_path: PathBuf,
    #[serde(skip)]
    devices: Option<Vec<DeviceSpec>>,
    #[serde(skip)]
    schema_available: bool,
}

impl Execution {
    /// Load and validate the raw arguments of an invocation
    pub fn load(
        raw: RawArguments,
        logger: &dyn ExecutionLogger,
        accelerators: &dyn AcceleratorProbe,
    ) -> Result<Self, LoadError> {
        let mut arguments = raw;
        let command = match arguments.remove(COMMAND) {
            Some(ArgValue::Text(command)) => command,
            Some(ArgValue::List(_)) => {
                return Err(ValidationError::InvalidArgument {
                    argument: COMMAND.to_string(),
                    expected: "a single value",
                }
                .into());
            }
            Some(ArgValue::Null) | None => {
                return Err(ValidationError::MissingArgument(COMMAND.to_string()).into());
            }
        };

        normalize(&mut arguments, accelerators)?;
        let devices = validate_main_args(&arguments, accelerators)?;

        let schema_available = if command == INIT {
            validate_init_args(&arguments, logger)?
        } else {
            validate_pipeline_args(&arguments, logger)?;
            false
        };

        let experiments_path = PathBuf::from(validator::required_text(&arguments, EXPERIMENTS_PATH)?);
        let data_path = PathBuf::from(validator::required_text(&arguments, DATA_PATH)?);

        Ok(Self {
            command,
            arguments,
            experiments_path,
            data_path,
            devices,
            schema_available,
        })
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn is_init(&self) -> bool {
        self.command == INIT
    }

    /// Normalized arguments, `command` excluded
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.arguments.get(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.arguments.text(key)
    }

    pub fn experiments_path(&self) -> &Path {
        &self.experiments_path
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn experiment_name(&self) -> Option<&str> {
        self.arguments.text(EXPERIMENT_NAME)
    }

    /// Validated devices, sorted; `None` when the command takes no devices
    pub fn devices(&self) -> Option<&[DeviceSpec]> {
        self.devices.as_deref()
    }

    /// Whether `init` found a configuration schema to validate against
    pub fn schema_available(&self) -> bool {
        self.schema_available
    }

    /// Raw form of this execution, `command` key included
    pub fn to_raw_arguments(&self) -> RawArguments {
        let mut raw = self.arguments.clone();
        raw.insert_text(COMMAND, self.command.clone());
        raw
    }
}
