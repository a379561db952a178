//! Error types for CalDAV operations.

use thiserror::Error;

/// Errors from talking to the CalDAV server.
#[derive(Debug, Error)]
pub enum CaldavError {
    /// The calendar URL could not be parsed.
    #[error("invalid calendar URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The HTTP client could not be built.
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// A request failed at the transport level.
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server rejected our credentials.
    #[error("authentication failed: invalid credentials")]
    Authentication,

    /// The server returned a status we do not handle.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// A conflict check was requested for an event without a start time.
    #[error("cannot check conflicts for an event without a start time")]
    MissingStart,
}

/// Result alias for CalDAV operations.
pub type CaldavResult<T> = Result<T, CaldavError>;
