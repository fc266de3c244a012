//! Error types for bootstrap client operations.

use rdap_bootstrap::{BootstrapError, CacheError};
use thiserror::Error;

/// Errors that can occur while fetching bootstrap registries.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Failed to connect to the bootstrap server.
    #[error("Failed to connect to {url}: {source}")]
    ConnectionFailed {
        /// Request URL.
        url: String,
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// Any other HTTP transport failure.
    #[error("HTTP error: {source}")]
    Http {
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with something other than 200 OK.
    #[error("Server returned non-200 status code {status} for {url}")]
    Status {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// Invalid base URL.
    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        /// URL string.
        url: String,
        /// Underlying error.
        #[source]
        source: url::ParseError,
    },

    /// The downloaded or cached document is not a usable registry.
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    /// The cache could not be read or written.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::ConnectionFailed {
                url: err
                    .url()
                    .map_or_else(|| "unknown".to_string(), ToString::to_string),
                source: err,
            }
        } else {
            Self::Http { source: err }
        }
    }
}
