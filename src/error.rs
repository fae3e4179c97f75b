use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop a run before or after test execution. Per-case
/// failures never surface here; they are recorded in the test result.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("request definition file not found: {}", path.display())]
    InputNotFound { path: PathBuf },
    #[error("failed to read `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("invalid base API address `{url}`: {message}")]
    InvalidBaseUrl { url: String, message: String },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("failed to write report `{}`: {source}", path.display())]
    WriteReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("test worker crashed: {0}")]
    Worker(String),
}
