//! Run directories: config, logs, report and the sample document.

mod logging;
mod run;

use std::path::PathBuf;

pub use logging::init_run_logging;
pub use run::{RunContext, RunPaths, start_run, write_report};

use thiserror::Error;

/// Failures while laying out or writing a run directory.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot encode {path}: {source}")]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("cannot install log subscriber: {0}")]
    Logging(String),
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
