//! Queryable bootstrap registries.
//!
//! Each registry owns a parsed [`File`] and builds an immutable lookup
//! index for its identifier space:
//!
//! - [`DnsRegistry`]: longest registered domain suffix, with root fallback
//! - [`NetRegistry`]: longest CIDR prefix containing an IPv4/IPv6 query
//! - [`AsnRegistry`]: AS number range containment
//!
//! An identifier that matches nothing yields an empty [`Answer`], never an
//! error.

mod asn;
mod dns;
mod net;

pub use asn::AsnRegistry;
pub use dns::DnsRegistry;
pub use net::{AddressFamily, NetRegistry};

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::BootstrapError;
use crate::file::File;

/// A bootstrap registry that maps identifiers to RDAP base URLs.
pub trait Registry: Send + Sync + fmt::Debug {
    /// Finds the entry responsible for `query` and its ordered URLs.
    fn lookup(&self, query: &str) -> Answer;

    /// Returns the parsed file this registry was built from.
    fn file(&self) -> &File;
}

/// Result of a registry lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Answer {
    /// The query, as given.
    pub query: String,

    /// The matched entry key; empty when nothing matched (or when the root
    /// entry of a DNS registry matched).
    pub entry: String,

    /// Candidate base URLs in preference order; empty when nothing matched.
    pub urls: Vec<Url>,
}

impl Answer {
    pub(crate) fn new(query: &str, entry: &str, urls: &[Url]) -> Self {
        Self {
            query: query.to_string(),
            entry: entry.to_string(),
            urls: urls.to_vec(),
        }
    }

    pub(crate) fn empty(query: &str) -> Self {
        Self {
            query: query.to_string(),
            ..Self::default()
        }
    }

    /// Returns true if no server is known for the query.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// The published bootstrap registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegistryType {
    /// Domain names (`dns.json`).
    Dns,
    /// Autonomous system numbers (`asn.json`).
    Asn,
    /// IPv4 networks (`ipv4.json`).
    Ipv4,
    /// IPv6 networks (`ipv6.json`).
    Ipv6,
}

impl RegistryType {
    /// All registry types.
    pub const ALL: [Self; 4] = [Self::Dns, Self::Asn, Self::Ipv4, Self::Ipv6];

    /// Returns the registry's published file name, which is also its cache
    /// key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rdap_bootstrap::RegistryType;
    ///
    /// assert_eq!(RegistryType::Ipv6.filename(), "ipv6.json");
    /// ```
    #[must_use]
    pub const fn filename(self) -> &'static str {
        match self {
            Self::Dns => "dns.json",
            Self::Asn => "asn.json",
            Self::Ipv4 => "ipv4.json",
            Self::Ipv6 => "ipv6.json",
        }
    }

    /// Builds the registry of this type from a bootstrap document.
    ///
    /// `overrides` are applied as in [`DnsRegistry::new`].
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be parsed.
    pub fn build(
        self,
        json: &[u8],
        overrides: &HashMap<String, Url>,
    ) -> Result<Box<dyn Registry>, BootstrapError> {
        Ok(match self {
            Self::Dns => Box::new(DnsRegistry::new(json, overrides)?),
            Self::Asn => Box::new(AsnRegistry::new(json, overrides)?),
            Self::Ipv4 => Box::new(NetRegistry::new(AddressFamily::V4, json, overrides)?),
            Self::Ipv6 => Box::new(NetRegistry::new(AddressFamily::V6, json, overrides)?),
        })
    }
}

impl fmt::Display for RegistryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Dns => "dns",
            Self::Asn => "asn",
            Self::Ipv4 => "ipv4",
            Self::Ipv6 => "ipv6",
        };
        f.write_str(name)
    }
}

impl FromStr for RegistryType {
    type Err = BootstrapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dns" => Ok(Self::Dns),
            "asn" => Ok(Self::Asn),
            "ipv4" => Ok(Self::Ipv4),
            "ipv6" => Ok(Self::Ipv6),
            _ => Err(BootstrapError::UnknownRegistryType {
                name: s.to_string(),
            }),
        }
    }
}
