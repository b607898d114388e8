//! Error types for gather cycles.

use thiserror::Error;

use crate::gather::WorkerPanic;

/// A failure of one branch of a gather cycle.
///
/// None of these abort a cycle: the branch rooted at the failing address is
/// skipped and the error is returned alongside whatever was emitted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatherError {
    /// An endpoint or client setting could not be used.
    #[error("invalid configuration for '{target}': {reason}")]
    Config { target: String, reason: String },

    /// HTTP request failed.
    #[error("HTTP request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    /// Connection failed.
    #[error("connection to {url} failed: {reason}")]
    Connection { url: String, reason: String },

    /// Timeout waiting for response.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// The server answered with a non-success status.
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    /// Failed to parse response.
    #[error("failed to parse response from {url}: {reason}")]
    Parse { url: String, reason: String },

    /// The API reported an error in its response envelope.
    #[error("API error from {url}: {message}")]
    Api { url: String, message: String },

    /// A consumer lag response carried no status object.
    #[error("response from {url} has no consumer status")]
    MissingStatus { url: String },

    /// A worker's handler panicked.
    #[error("worker panicked: {0}")]
    WorkerPanic(String),
}

impl From<WorkerPanic> for GatherError {
    fn from(panic: WorkerPanic) -> Self {
        GatherError::WorkerPanic(panic.message)
    }
}

#[cfg(feature = "burrow")]
impl GatherError {
    /// Classify a reqwest failure for the given URL.
    pub(crate) fn from_reqwest(url: &url::Url, err: reqwest::Error) -> Self {
        let url = crate::gather::redacted(url);
        if err.is_timeout() {
            GatherError::Timeout { url }
        } else if err.is_connect() {
            GatherError::Connection {
                url,
                reason: err.to_string(),
            }
        } else if err.is_decode() {
            GatherError::Parse {
                url,
                reason: err.to_string(),
            }
        } else {
            GatherError::Http {
                url,
                reason: err.to_string(),
            }
        }
    }
}
