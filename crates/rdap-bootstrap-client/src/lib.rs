//! # RDAP Bootstrap Client
//!
//! Downloads the IANA RDAP bootstrap registries and keeps them fresh.
//!
//! This crate wraps the matching engine in [`rdap_bootstrap`] with an HTTP
//! fetcher. Each registry file is fetched on first use, saved to a
//! [`RegistryCache`](rdap_bootstrap::RegistryCache), reloaded when another
//! process updates a shared cache, and refreshed once it expires.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use rdap_bootstrap::{CacheConfig, DiskCache, RegistryType};
//! use rdap_bootstrap_client::{Client, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cache = DiskCache::new(CacheConfig::default());
//!     let client = Client::new(ClientConfig::default())?.with_cache(Arc::new(cache));
//!
//!     let answer = client.lookup(RegistryType::Ipv4, "192.0.2.1").await?;
//!     println!("{} -> {:?}", answer.entry, answer.urls);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                       Client                         │
//! │  ┌─────────────┐  ┌─────────────┐  ┌──────────────┐  │
//! │  │  reqwest    │  │ RegistryCache│ │  Registries  │  │
//! │  │  (HTTP)     │  │ (Memory/Disk)│ │  (held)      │  │
//! │  └─────────────┘  └─────────────┘  └──────────────┘  │
//! └──────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌──────────────────────────────────────────────────────┐
//! │     https://data.iana.org/rdap/{dns,asn,ipv4,ipv6}   │
//! └──────────────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod client;
mod config;
mod error;

pub use client::Client;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::ClientError;
