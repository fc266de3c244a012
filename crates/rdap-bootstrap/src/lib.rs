//! # RDAP Bootstrap
//!
//! Resolution of domain names, IP addresses and AS numbers to the RDAP
//! servers responsible for them, using the IANA bootstrap registries
//! (RFC 9224).
//!
//! This crate performs no network I/O. It provides:
//!
//! - **Parsing**: [`File`] turns a bootstrap document into a normalized
//!   entry table, with optional service overrides
//! - **Matching**: [`DnsRegistry`] (longest domain suffix with root
//!   fallback), [`NetRegistry`] (longest CIDR prefix) and [`AsnRegistry`]
//!   (range containment), all behind the [`Registry`] trait
//! - **Caching**: [`MemoryCache`] and [`DiskCache`] implement
//!   [`RegistryCache`], whose [`FileState`] tells a caller whether to reuse,
//!   reload or refetch a bootstrap file
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::HashMap;
//! use rdap_bootstrap::{FileState, MemoryCache, Registry, RegistryCache, RegistryType};
//!
//! let cache = MemoryCache::new();
//! let filename = RegistryType::Dns.filename();
//!
//! if cache.state(filename) == FileState::Absent {
//!     // Normally fetched from https://data.iana.org/rdap/dns.json
//!     let fetched = br#"{"services":[[["br"],["https://rdap.registro.br/"]]]}"#;
//!     cache.save(filename, fetched)?;
//! }
//!
//! let registry = RegistryType::Dns.build(&cache.load(filename)?, &HashMap::new())?;
//! let answer = registry.lookup("www.EXAMPLE.br");
//! assert_eq!(answer.entry, "br");
//! assert_eq!(answer.urls[0].as_str(), "https://rdap.registro.br/");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  bytes  ┌──────────────┐  File  ┌──────────────────────┐
//! │ RegistryCache│ ──────▶ │  File::parse │ ─────▶ │ Dns/Net/AsnRegistry  │
//! │ (Memory/Disk)│         │  (overrides) │        │  lookup() -> Answer  │
//! └──────────────┘         └──────────────┘        └──────────────────────┘
//!        ▲ save(fetched bytes)
//!        │
//!   caller (e.g. rdap-bootstrap-client)
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod cache;
mod error;
mod file;
mod logger;
mod registry;


pub use cache::{CacheConfig, DiskCache, FileState, MemoryCache, RegistryCache, DEFAULT_TIMEOUT};
pub use error::{BootstrapError, CacheError};
pub use file::File;
pub use logger::{Logger, LoggerFn, NoopLogger, TracingLogger};
pub use registry::{
    AddressFamily, Answer, AsnRegistry, DnsRegistry, NetRegistry, Registry, RegistryType,
};

#[cfg(test)]
pub(crate) mod testdata {
    use std::path::Path;

    /// Reads a fixture from the crate's `testdata/` directory.
    pub fn load(name: &str) -> Vec<u8> {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("testdata")
            .join(name);
        std::fs::read(&path).unwrap_or_else(|e| panic!("reading {}: {e}", path.display()))
    }
}
