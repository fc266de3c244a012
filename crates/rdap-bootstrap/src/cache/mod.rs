//! Caching of bootstrap registry files.
//!
//! There are two implementations of [`RegistryCache`]: [`MemoryCache`],
//! private to the process, and [`DiskCache`], a directory that several
//! processes may share.

mod disk;
mod memory;

pub use disk::{CacheConfig, DiskCache};
pub use memory::MemoryCache;

use std::fmt;
use std::time::Duration;

use crate::error::CacheError;

/// Default freshness window for cached files (24 hours).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

/// Freshness of a cached file, computed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileState {
    /// File is not in the cache. Fetch it and [`RegistryCache::save`] it.
    Absent,

    /// File is in the cache, and the latest version has already been
    /// loaded or saved by this instance.
    Good,

    /// File is in the cache, and a newer version than the one this
    /// instance last loaded or saved is available to
    /// [`RegistryCache::load`].
    ///
    /// Only reported by caches shared between processes.
    ShouldReload,

    /// File is in the cache but has expired. It can still be loaded, but
    /// should be fetched again.
    Expired,
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Absent => "absent",
            Self::Good => "good",
            Self::ShouldReload => "should-reload",
            Self::Expired => "expired",
        };
        f.write_str(name)
    }
}

/// A cache of bootstrap registry files, keyed by file name.
///
/// All methods take `&self`; implementations synchronize internally so a
/// cache can be shared between threads.
pub trait RegistryCache: Send + Sync + fmt::Debug {
    /// Returns the cached bytes of `filename`, even if expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is not cached or cannot be read.
    fn load(&self, filename: &str) -> Result<Vec<u8>, CacheError>;

    /// Stores `data` as the current version of `filename`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be written.
    fn save(&self, filename: &str, data: &[u8]) -> Result<(), CacheError>;

    /// Returns the freshness of `filename`.
    fn state(&self, filename: &str) -> FileState;

    /// Sets the freshness window used by subsequent [`state`](Self::state)
    /// calls.
    fn set_timeout(&self, timeout: Duration);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_state_display() {
        assert_eq!(FileState::Absent.to_string(), "absent");
        assert_eq!(FileState::ShouldReload.to_string(), "should-reload");
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(86_400));
    }
}
