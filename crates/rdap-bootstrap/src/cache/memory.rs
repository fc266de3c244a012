//! In-process registry cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::{FileState, RegistryCache, DEFAULT_TIMEOUT};
use crate::error::CacheError;
use crate::logger::{Logger, NoopLogger};

#[derive(Debug)]
struct CachedFile {
    data: Vec<u8>,
    saved_at: Instant,
}

#[derive(Debug)]
struct Inner {
    timeout: Duration,
    files: HashMap<String, CachedFile>,
}

/// Registry cache held in memory.
///
/// Files expire `timeout` after they were saved.
#[derive(Debug)]
pub struct MemoryCache {
    inner: Mutex<Inner>,
    logger: Arc<dyn Logger>,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCache {
    /// Creates an empty cache with the default 24 hour timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                timeout: DEFAULT_TIMEOUT,
                files: HashMap::new(),
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

    /// Returns the current timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.inner.lock().timeout
    }
}

impl RegistryCache for MemoryCache {
    fn load(&self, filename: &str) -> Result<Vec<u8>, CacheError> {
        let inner = self.inner.lock();
        inner
            .files
            .get(filename)
            .map(|file| file.data.clone())
            .ok_or_else(|| CacheError::NotCached {
                name: filename.to_string(),
            })
    }

    fn save(&self, filename: &str, data: &[u8]) -> Result<(), CacheError> {
        self.inner.lock().files.insert(
            filename.to_string(),
            CachedFile {
                data: data.to_vec(),
                saved_at: Instant::now(),
            },
        );
        self.logger
            .log(format_args!("memory cache: saved {filename} ({} bytes)", data.len()));
        Ok(())
    }

    fn state(&self, filename: &str) -> FileState {
        let inner = self.inner.lock();
        match inner.files.get(filename) {
            None => FileState::Absent,
            Some(file) if file.saved_at.elapsed() > inner.timeout => FileState::Expired,
            Some(_) => FileState::Good,
        }
    }

    fn set_timeout(&self, timeout: Duration) {
        self.inner.lock().timeout = timeout;
    }
}
