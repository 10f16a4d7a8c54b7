//! Andamio: experiment runner scaffold for ML training pipelines
//!
//! Turns parsed command-line arguments into a validated [`Execution`]
//! (command name plus normalized argument mapping) and manages the on-disk
//! layout of experiments.
//!
//! # Example
//!
//! ```no_run
//! use andamio::execution::{Execution, FixedAccelerators, RawArguments, TracingLogger};
//!
//! let mut raw = RawArguments::new();
//! raw.insert_text("command", "train");
//! raw.insert_text("base_path", "/srv/project");
//! raw.insert_text("experiment_name", "baseline");
//! raw.insert_null("experiments_path");
//! raw.insert_null("data_path");
//! raw.insert_null("device");
//!
//! let execution = Execution::load(raw, &TracingLogger, &FixedAccelerators::new(0))?;
//! assert_eq!(execution.command(), "train");
//! # Ok::<(), andamio::execution::LoadError>(())
//! ```

pub mod cli;
pub mod config;
pub mod execution;
pub mod experiment;

pub use execution::{Execution, LoadError};
