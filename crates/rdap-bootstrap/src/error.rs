//! Error types for bootstrap registry parsing and caching.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building a bootstrap registry.
///
/// All of these abort construction; a partially built registry is never
/// returned.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The document is not valid JSON or does not have the expected shape.
    #[error("Malformed bootstrap registry: {source}")]
    Json {
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A `services` tuple does not have exactly two elements.
    #[error("Malformed bootstrap registry: services entry {index} has {len} elements, expected 2")]
    MalformedServices {
        /// Position of the tuple in the `services` array.
        index: usize,
        /// Number of elements found.
        len: usize,
    },

    /// The document decoded but produced no usable entries.
    #[error("Bootstrap registry contains no usable entries")]
    NoEntries,

    /// A service override cannot be parsed as a URL.
    #[error("Service override cannot be parsed as a URL: {key}:{url}")]
    InvalidOverrideUrl {
        /// Entry key the override applies to.
        key: String,
        /// Override value.
        url: String,
        /// Underlying error.
        #[source]
        source: url::ParseError,
    },

    /// Unknown registry type name.
    #[error("Unknown registry type '{name}' (expected one of dns, asn, ipv4, ipv6)")]
    UnknownRegistryType {
        /// Name given.
        name: String,
    },
}

impl From<serde_json::Error> for BootstrapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json { source: err }
    }
}

/// Errors returned by [`RegistryCache`](crate::RegistryCache) backends.
///
/// Freshness queries never fail; only loading and saving do.
#[derive(Debug, Error)]
pub enum CacheError {
    /// File I/O error.
    #[error("File I/O error at {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Nothing is stored under this name.
    #[error("File {name} not in cache")]
    NotCached {
        /// Cache key.
        name: String,
    },

    /// The name cannot be used as a cache key.
    #[error("Invalid cache file name: {name:?}")]
    InvalidName {
        /// Cache key.
        name: String,
    },
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
