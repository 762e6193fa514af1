//! # codeprep
//!
//! Batch driver for the normalization engine: reads JSON Lines corpus
//! records, normalizes every field on a worker pool and writes the token
//! sequences back out in input order.

pub mod args;
pub mod batch;
pub mod error;
pub mod io;
pub mod logging;
pub mod pipeline;
pub mod record;

pub use args::Cli;
pub use batch::{BatchOptions, BatchRunner, BatchStats};
pub use error::{CliError, CliResult};
pub use pipeline::{CodeOutcome, Pipeline, ProcessedRecord};
pub use record::{CodeField, InputRecord, OutputRecord};
