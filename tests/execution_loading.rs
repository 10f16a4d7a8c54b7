//! Integration tests for loading executions from the command line

use andamio::cli::{run, Outcome};
use andamio::config::parse_args;
use andamio::execution::{
    DeviceSpec, Execution, ExecutionLogger, FatalError, FixedAccelerators, LoadError,
    ValidationError, DATA_PATH, EXPERIMENTS_PATH,
};
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[derive(Default)]
struct CollectingLogger {
    messages: RefCell<Vec<(&'static str, String)>>,
}

impl ExecutionLogger for CollectingLogger {
    fn error(&self, message: &str) {
        self.messages.borrow_mut().push(("error", message.to_string()));
    }

    fn warning(&self, message: &str) {
        self.messages.borrow_mut().push(("warning", message.to_string()));
    }
}

fn project() -> TempDir {
    let dir = TempDir::new().expect("temp dir should be created");
    fs::create_dir(dir.path().join("experiments")).expect("operation should succeed");
    fs::create_dir(dir.path().join("data")).expect("operation should succeed");
    fs::write(dir.path().join("config.json"), r#"{"model": {"layers": 3}}"#)
        .expect("operation should succeed");
    dir
}

fn argv<'a>(base: &'a str, rest: &[&'a str]) -> Vec<&'a str> {
    let mut argv = vec!["andamio", "--experiment-name", "mnist", "--base-path", base];
    argv.extend_from_slice(rest);
    argv
}

fn load(
    dir: &Path,
    rest: &[&str],
    gpus: usize,
) -> (Result<Execution, LoadError>, CollectingLogger) {
    let base = dir.display().to_string();
    let cli = parse_args(argv(&base, rest)).expect("arguments should parse");
    let logger = CollectingLogger::default();
    let result = Execution::load(cli.to_raw_arguments(), &logger, &FixedAccelerators::new(gpus));
    (result, logger)
}

#[test]
fn test_init_then_train_lifecycle() {
    let dir = project();
    let base = dir.path().display().to_string();
    let config = dir.path().join("config.json").display().to_string();

    let init = parse_args(argv(
        &base,
        &["init", "--config-path", config.as_str(), "--accelerators", "0", "--quiet"],
    ))
    .expect("arguments should parse");
    assert_eq!(run(&init), Outcome::Success);
    assert!(dir.path().join("experiments/mnist/checkpoints").is_dir());

    // A second init must abort: the experiment now exists
    assert_eq!(run(&init), Outcome::Aborted);

    let train = parse_args(argv(&base, &["train", "--accelerators", "0", "--quiet"]))
        .expect("arguments should parse");
    assert_eq!(run(&train), Outcome::Success);
}

#[test]
fn test_train_without_experiment_aborts() {
    let dir = project();
    let (result, logger) = load(dir.path(), &["train"], 0);

    assert_eq!(
        result.unwrap_err(),
        LoadError::Fatal(FatalError::ExperimentNotFound("mnist".to_string()))
    );
    let messages = logger.messages.borrow();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, "error");
}

#[test]
fn test_invalid_device_fails_run() {
    let dir = project();
    fs::create_dir(dir.path().join("experiments/mnist")).expect("operation should succeed");
    let base = dir.path().display().to_string();

    let cli = parse_args(argv(
        &base,
        &["train", "--device", "gpu", "--accelerators", "2", "--quiet"],
    ))
    .expect("arguments should parse");
    match run(&cli) {
        Outcome::Failed(message) => assert!(message.contains("Device gpu is not valid")),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn test_missing_data_directory_is_a_validation_error() {
    let dir = project();
    fs::remove_dir(dir.path().join("data")).expect("operation should succeed");

    let (result, logger) = load(dir.path(), &["info"], 0);
    match result {
        Err(LoadError::Validation(ValidationError::InvalidPath { argument, .. })) => {
            assert_eq!(argument, DATA_PATH)
        }
        other => panic!("unexpected result {other:?}"),
    }
    assert!(logger.messages.borrow().is_empty());
}

#[test]
fn test_init_with_missing_schema_still_loads() {
    let dir = project();
    let config = dir.path().join("config.json").display().to_string();
    let schema = dir.path().join("schema.json").display().to_string();

    let (result, logger) = load(
        dir.path(),
        &["init", "--config-path", config.as_str(), "--config-schema-path", schema.as_str()],
        0,
    );
    let execution = result.expect("execution should load");
    assert!(execution.is_init());
    assert!(!execution.schema_available());
    assert_eq!(
        execution.text(EXPERIMENTS_PATH),
        Some(dir.path().join("experiments").display().to_string().as_str())
    );

    let messages = logger.messages.borrow();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, "warning");
}

#[test]
fn test_devices_sorted_and_parsed() {
    let dir = project();
    fs::create_dir(dir.path().join("experiments/mnist")).expect("operation should succeed");

    let (result, _) = load(dir.path(), &["test", "--epoch", "1", "--device", "cuda:1", "cuda:0"], 4);
    let execution = result.expect("execution should load");
    assert_eq!(
        execution.devices(),
        Some(&[DeviceSpec::CudaIndex(0), DeviceSpec::CudaIndex(1)][..])
    );
}

#[test]
fn test_reloading_normalized_arguments_is_stable() {
    let dir = project();
    fs::create_dir(dir.path().join("experiments/mnist")).expect("operation should succeed");

    let (first, _) = load(dir.path(), &["train"], 2);
    let first = first.expect("execution should load");
    let second = Execution::load(
        first.to_raw_arguments(),
        &CollectingLogger::default(),
        &FixedAccelerators::new(2),
    )
    .expect("execution should load");
    assert_eq!(first, second);
    assert_eq!(second.devices(), Some(&[DeviceSpec::Cuda][..]));
}
