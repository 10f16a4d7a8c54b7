//! Normalization and validation steps of the loader

use super::args::{
    ArgValue, Arguments, BASE_PATH, CONFIG_PATH, CONFIG_SCHEMA_PATH, DATA_PATH, DEVICE,
    EXPERIMENTS_PATH, EXPERIMENT_NAME,
};
use super::device::{default_devices, validate_devices, AcceleratorProbe, DeviceSpec};
use super::error::{FatalError, LoadError, ValidationError};
use super::logger::ExecutionLogger;
use std::path::{Path, PathBuf};

const SCHEMA_WARNING: &str =
    "Configuration schema file path is not correct. Configuration will not be validated.";

/// Fill default paths and devices, sort the device list
///
/// Applying it to its own output changes nothing.
pub fn normalize(
    args: &mut Arguments,
    accelerators: &dyn AcceleratorProbe,
) -> Result<(), ValidationError> {
    if args.is_unset(EXPERIMENTS_PATH) {
        let default = base_path(args)?.join("experiments");
        args.insert_text(EXPERIMENTS_PATH, default.display().to_string());
    }
    if args.is_unset(DATA_PATH) {
        let default = base_path(args)?.join("data");
        args.insert_text(DATA_PATH, default.display().to_string());
    }

    if let Some(value) = args.get_mut(DEVICE) {
        *value = match std::mem::replace(value, ArgValue::Null) {
            ArgValue::Null => ArgValue::List(default_devices(accelerators)),
            ArgValue::Text(device) => ArgValue::List(vec![device]),
            ArgValue::List(mut devices) => {
                devices.sort();
                ArgValue::List(devices)
            }
        };
    }
    Ok(())
}

/// Checks shared by every command. Returns the parsed devices when a
/// `device` argument is present.
pub fn validate_main_args(
    args: &Arguments,
    accelerators: &dyn AcceleratorProbe,
) -> Result<Option<Vec<DeviceSpec>>, ValidationError> {
    existing_dir(args, EXPERIMENTS_PATH)?;
    existing_dir(args, DATA_PATH)?;

    match args.get(DEVICE) {
        None => Ok(None),
        Some(ArgValue::List(devices)) => validate_devices(devices, accelerators).map(Some),
        Some(_) => Err(ValidationError::InvalidArgument {
            argument: DEVICE.to_string(),
            expected: "a list of devices",
        }),
    }
}

/// Preconditions of `init`. Returns whether a configuration schema is
/// available for validating the configuration.
pub fn validate_init_args(
    args: &Arguments,
    logger: &dyn ExecutionLogger,
) -> Result<bool, LoadError> {
    let experiments_path = required_path(args, EXPERIMENTS_PATH)?;
    let name = experiment_name(args)?;
    if experiments_path.join(name).exists() {
        return Err(fatal(logger, FatalError::ExperimentExists(name.to_string())));
    }

    let config_path = required_path(args, CONFIG_PATH)?;
    if !config_path.exists() {
        return Err(fatal(logger, FatalError::ConfigNotFound(config_path.to_path_buf())));
    }

    let schema_available = args.path(CONFIG_SCHEMA_PATH).is_some_and(Path::exists);
    if !schema_available {
        logger.warning(SCHEMA_WARNING);
    }
    Ok(schema_available)
}

/// Preconditions of every command other than `init`
pub fn validate_pipeline_args(
    args: &Arguments,
    logger: &dyn ExecutionLogger,
) -> Result<(), LoadError> {
    let experiments_path = required_path(args, EXPERIMENTS_PATH)?;
    let name = experiment_name(args)?;
    if !experiments_path.join(name).exists() {
        return Err(fatal(logger, FatalError::ExperimentNotFound(name.to_string())));
    }
    Ok(())
}

pub(crate) fn required_text<'a>(args: &'a Arguments, key: &str) -> Result<&'a str, ValidationError> {
    match args.get(key) {
        Some(ArgValue::Text(value)) => Ok(value.as_str()),
        Some(ArgValue::List(_)) => Err(ValidationError::InvalidArgument {
            argument: key.to_string(),
            expected: "a single value",
        }),
        Some(ArgValue::Null) | None => Err(ValidationError::MissingArgument(key.to_string())),
    }
}

/// An empty name would resolve to `experiments_path` itself
fn experiment_name(args: &Arguments) -> Result<&str, ValidationError> {
    match required_text(args, EXPERIMENT_NAME)? {
        "" => Err(ValidationError::InvalidArgument {
            argument: EXPERIMENT_NAME.to_string(),
            expected: "a non-empty experiment name",
        }),
        name => Ok(name),
    }
}

fn required_path<'a>(args: &'a Arguments, key: &str) -> Result<&'a Path, ValidationError> {
    required_text(args, key).map(Path::new)
}

fn base_path(args: &Arguments) -> Result<PathBuf, ValidationError> {
    required_path(args, BASE_PATH).map(Path::to_path_buf)
}

fn existing_dir(args: &Arguments, key: &str) -> Result<(), ValidationError> {
    let path = required_path(args, key)?;
    if !path.is_dir() {
        return Err(ValidationError::InvalidPath {
            argument: key.to_string(),
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

fn fatal(logger: &dyn ExecutionLogger, error: FatalError) -> LoadError {
    logger.error(&error.to_string());
    error.into()
}
