//! renfiles - rename and file documents by filename pattern
//!
//! This library classifies file names against a fixed, ordered rule catalog,
//! derives a canonical destination name and folder (often from a leading
//! `YYYYMMDD` date), moves the file there and hands labels to an external
//! labeling tool. Every step has a dry-run counterpart that only reports.

pub mod batch;
pub mod catalog;
pub mod classify;
pub mod cli;
pub mod config;
pub mod date;
pub mod error;
pub mod executor;
pub mod labels;
pub mod logging;
pub mod output;
pub mod scan;

pub use batch::{BatchRunner, FileReport, RunOptions, Summary};
pub use classify::{Classification, ClassificationEngine, ClassifyError, Destination};
pub use config::{CompiledFilters, Config, ConfigError};
pub use date::{DatePrecision, LeadingDate, extract_leading_date};
pub use error::Error;
pub use executor::{ExecutionMode, MoveExecutor, MoveOutcome, MoveStatus};
pub use labels::{LabelAssigner, LabelError, NoLabels, TagCommand};
pub use scan::{CandidateFile, scan_source};

pub use cli::{Cli, run_cli};
