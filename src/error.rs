//! Error handling for the remote data client
//!
//! Errors stop at the client boundary: everything above it works in
//! tri-state outcomes ([`crate::remote::Fetched`]) or booleans, so this
//! type is only seen by the `remote` module itself and its tests.

use thiserror::Error;

/// Unified error type for remote store operations
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The backend answered with a non-success status
    #[error("request failed with status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, if any could be read
        body: String,
    },

    /// The request exceeded the configured timeout
    #[error("request timed out")]
    Timeout,
}
