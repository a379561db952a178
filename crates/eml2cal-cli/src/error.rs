//! Error types for the eml2cal binary.

use thiserror::Error;

/// Errors that can abort a run or fail a single email.
#[derive(Debug, Error)]
pub enum RunError {
    /// The configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The mailbox could not be opened or read.
    #[error("mailbox error: {0}")]
    Mailbox(String),

    /// An external command could not be spawned.
    #[error("failed to spawn `{cmd}`: {source}")]
    Spawn {
        cmd: String,
        #[source]
        source: std::io::Error,
    },

    /// An external command exited with a non-zero status.
    #[error("command `{cmd}` failed with status {code}: {stderr}")]
    Command {
        cmd: String,
        code: i32,
        stderr: String,
    },

    /// The extractor produced output that is not valid JSON.
    #[error("invalid extractor output: {0}")]
    ExtractorOutput(#[from] serde_json::Error),

    /// A reservation could not be converted.
    #[error(transparent)]
    Convert(#[from] eml2cal_core::ConvertError),

    /// A CalDAV operation failed.
    #[error(transparent)]
    Caldav(#[from] eml2cal_caldav::CaldavError),

    /// The summary report could not be sent.
    #[error("failed to send report: {0}")]
    Report(String),

    /// An I/O operation failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias for run operations.
pub type RunResult<T> = Result<T, RunError>;
