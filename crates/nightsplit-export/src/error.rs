use std::path::PathBuf;

use thiserror::Error;

use crate::ValidationIssue;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File does not contain valid health data")]
    MissingHealthData,

    #[error("No sleep data found")]
    NoSleepData,

    #[error("No sleep entries found")]
    NoEntries,

    #[error("{} invalid sleep entries", .0.len())]
    InvalidEntries(Vec<ValidationIssue>),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Error, Debug)]
pub enum MarkError {
    #[error("Path has no file name: {0}")]
    NoFileName(PathBuf),

    #[error("Unable to rename {from} to {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
