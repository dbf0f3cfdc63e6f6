//! Error types for housepix
//!
//! This module provides the error taxonomy for the fetch and download
//! pipeline:
//! - Transport-level failures and explicit service unavailability, which are
//!   absorbed into retries by [`crate::client::RetryingClient`]
//! - Retry exhaustion, the only transport error that escapes to callers
//! - Decode and persist failures, which are reported per page / per image
//!   and never abort the surrounding stage

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for housepix operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for housepix
///
/// Each variant carries enough context to identify the offending page,
/// image, or file in log output.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport-level failure (connection error, timeout, malformed
    /// response). Retryable.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered HTTP 503. Retryable.
    #[error("service unavailable (HTTP 503) from {url}")]
    ServiceUnavailable {
        /// The URL that answered 503
        url: String,
    },

    /// The backoff policy's elapsed-time cap was reached before any attempt
    /// succeeded. Wraps the last underlying error.
    #[error("retries exhausted after {attempts} attempts for {url}: {source}")]
    RetryExhausted {
        /// The URL that was being requested
        url: String,
        /// How many attempts were made against the underlying send primitive
        attempts: u32,
        /// The error from the final attempt
        #[source]
        source: Box<Error>,
    },

    /// A page response body was not a valid listing envelope
    #[error("failed to decode page {page}: {source}")]
    Decode {
        /// The page number whose body failed to decode
        page: u32,
        /// The underlying decode error
        #[source]
        source: reqwest::Error,
    },

    /// An image download completed with a non-success status
    #[error("image download failed with HTTP {status} from {url}")]
    ImageStatus {
        /// The URL of the image
        url: String,
        /// The non-2xx status code received
        status: u16,
    },

    /// Writing a downloaded image to disk failed
    #[error("failed to save image to {path}: {source}")]
    Persist {
        /// The destination path of the failed write
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A page or image URL could not be constructed
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A spawned worker task panicked or was cancelled
    #[error("worker task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "per_page")
        key: Option<String>,
    },
}

impl Error {
    /// Returns true if the error is transient and the request should be
    /// re-issued after a backoff wait.
    ///
    /// Only transport-level failures and explicit HTTP 503 responses are
    /// retryable. Every other response, including other error statuses, is
    /// returned to the caller as-is.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(e) => !e.is_builder() && !e.is_redirect(),
            Error::ServiceUnavailable { .. } => true,
            _ => false,
        }
    }
}
