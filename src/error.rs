//! Error taxonomy for a page build.
//!
//! Every error is fatal for the current run. Nothing is retried in-process; the
//! next scheduled run starts from scratch and the last written page stays live.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level failure of a page build.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid configuration input. Raised before any network call.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The Product Advertising API call failed.
    #[error("PA-API request failed: {0}")]
    Api(#[from] ApiError),

    /// The rendered output could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}

/// Failure modes of a single SearchItems call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection failure, TLS failure or timeout.
    #[error("network error: {0}")]
    Transport(String),

    /// Non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Body was not a SearchItems response.
    #[error("malformed response body: {0}")]
    Decode(String),

    /// HTTP 200 carrying an `Errors` array (bad signature, throttling, bad tag...).
    #[error("service error: {0}")]
    Service(String),
}

/// Limits how much of a response body ends up in an error message.
pub(crate) fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
