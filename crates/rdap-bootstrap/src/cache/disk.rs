//! On-disk registry cache, shareable between processes.
//!
//! Each file is stored under its own name in the cache directory. Writes go
//! to a temporary file in the same directory which is then renamed over the
//! target, so readers in other processes never see a partial file.
//!
//! Every instance remembers the modification time of the version it last
//! loaded or saved. A newer modification time on disk means another process
//! has saved the file since, and [`FileState::ShouldReload`] is reported.

use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use parking_lot::Mutex;

use super::{FileState, RegistryCache, DEFAULT_TIMEOUT};
use crate::error::CacheError;
use crate::logger::{Logger, NoopLogger};

/// Configuration for the disk cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Cache directory (default: `<platform cache dir>/rdap-bootstrap`).
    pub dir: PathBuf,

    /// Time after which a cached file expires (default: 24 hours).
    pub timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: dirs_default_cache_dir(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl CacheConfig {
    /// Creates a new cache configuration with the given directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Default::default()
        }
    }

    /// Sets the expiry timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Default cache directory.
fn dirs_default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rdap-bootstrap")
}

#[derive(Debug)]
struct Bookkeeping {
    timeout: Duration,
    last_loaded: HashMap<String, SystemTime>,
}

/// Registry cache stored in a directory.
#[derive(Debug)]
pub struct DiskCache {
    dir: PathBuf,
    bookkeeping: Mutex<Bookkeeping>,
    logger: Arc<dyn Logger>,
}

impl DiskCache {
    /// Creates a disk cache. The directory is created on the first save.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rdap_bootstrap::{CacheConfig, DiskCache, FileState, RegistryCache};
    ///
    /// let cache = DiskCache::new(CacheConfig::default());
    /// if cache.state("dns.json") == FileState::Absent {
    ///     // fetch dns.json, then cache.save("dns.json", &bytes)
    /// }
    /// ```
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            dir: config.dir,
            bookkeeping: Mutex::new(Bookkeeping {
                timeout: config.timeout,
                last_loaded: HashMap::new(),
            }),
            logger: Arc::new(NoopLogger),
        }
    }

    /// Sets the logger.
    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Returns the cache directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path of a cached file.
    ///
    /// # Errors
    ///
    /// Returns an error if `filename` is empty or is not a plain file name.
    pub fn file_path(&self, filename: &str) -> Result<PathBuf, CacheError> {
        let plain = !filename.is_empty()
            && filename != "."
            && filename != ".."
            && !filename.contains(&['/', '\\'][..]);

        if !plain {
            return Err(CacheError::InvalidName {
                name: filename.to_string(),
            });
        }

        Ok(self.dir.join(filename))
    }

    fn init_dir(&self) -> Result<(), CacheError> {
        match std::fs::metadata(&self.dir) {
            Ok(metadata) if metadata.is_dir() => Ok(()),
            Ok(_) => Err(CacheError::io(
                &self.dir,
                std::io::Error::new(ErrorKind::AlreadyExists, "cache path is not a directory"),
            )),
            Err(e) if e.kind() == ErrorKind::NotFound => std::fs::create_dir_all(&self.dir)
                .map_err(|e| CacheError::io(&self.dir, e)),
            Err(e) => Err(CacheError::io(&self.dir, e)),
        }
    }

    fn remember(&self, filename: &str, modified: SystemTime) {
        self.bookkeeping
            .lock()
            .last_loaded
            .insert(filename.to_string(), modified);
    }
}

fn modified_time(path: &Path) -> std::io::Result<SystemTime> {
    std::fs::metadata(path)?.modified()
}

impl RegistryCache for DiskCache {
    fn load(&self, filename: &str) -> Result<Vec<u8>, CacheError> {
        let path = self.file_path(filename)?;

        // Timestamp before contents, so a concurrent replace shows up as
        // ShouldReload on the next state().
        let modified = match modified_time(&path) {
            Ok(modified) => modified,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CacheError::NotCached {
                    name: filename.to_string(),
                })
            }
            Err(e) => return Err(CacheError::io(path, e)),
        };

        let data = std::fs::read(&path).map_err(|e| CacheError::io(&path, e))?;

        self.remember(filename, modified);
        self.logger.log(format_args!(
            "disk cache: loaded {} ({} bytes)",
            path.display(),
            data.len()
        ));

        Ok(data)
    }

    fn save(&self, filename: &str, data: &[u8]) -> Result<(), CacheError> {
        let path = self.file_path(filename)?;
        self.init_dir()?;

        let mut tmp =
            tempfile::NamedTempFile::new_in(&self.dir).map_err(|e| CacheError::io(&self.dir, e))?;
        // The rename keeps the temp file's timestamp, and the path may already
        // hold another writer's file once persisted.
        let modified = tmp
            .write_all(data)
            .and_then(|()| tmp.as_file().sync_all())
            .and_then(|()| tmp.as_file().metadata()?.modified())
            .map_err(|e| CacheError::io(tmp.path(), e))?;
        tmp.persist(&path)
            .map_err(|e| CacheError::io(&path, e.error))?;

        self.remember(filename, modified);
        self.logger.log(format_args!(
            "disk cache: saved {} ({} bytes)",
            path.display(),
            data.len()
        ));

        Ok(())
    }

    fn state(&self, filename: &str) -> FileState {
        let Ok(path) = self.file_path(filename) else {
            return FileState::Absent;
        };
        let Ok(modified) = modified_time(&path) else {
            return FileState::Absent;
        };

        let bookkeeping = self.bookkeeping.lock();

        // A timestamp in the future (clock skew) counts as fresh.
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        if age > bookkeeping.timeout {
            return FileState::Expired;
        }

        match bookkeeping.last_loaded.get(filename) {
            Some(last_loaded) if modified <= *last_loaded => FileState::Good,
            _ => FileState::ShouldReload,
        }
    }

    fn set_timeout(&self, timeout: Duration) {
        self.bookkeeping.lock().timeout = timeout;
    }
}
