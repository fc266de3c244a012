//! IPv4 and IPv6 network registries.

use std::collections::HashMap;
use std::fmt;
use std::net::IpAddr;

use ipnet::IpNet;
use url::Url;

use super::{Answer, Registry};
use crate::error::BootstrapError;
use crate::file::File;

/// Address family served by a [`NetRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    /// IPv4 (`ipv4.json`).
    V4,
    /// IPv6 (`ipv6.json`).
    V6,
}

impl AddressFamily {
    const fn matches(self, net: &IpNet) -> bool {
        matches!(
            (self, net),
            (Self::V4, IpNet::V4(_)) | (Self::V6, IpNet::V6(_))
        )
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4 => f.write_str("IPv4"),
            Self::V6 => f.write_str("IPv6"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NetEntry {
    net: IpNet,
    key: String,
    urls: Vec<Url>,
}

/// Registry of IP network allocations (`ipv4.json` / `ipv6.json`).
///
/// Entry keys are CIDR blocks. A query (an address, or a network in CIDR
/// notation) matches the most specific block that contains all of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetRegistry {
    family: AddressFamily,
    // Sorted most specific first.
    networks: Vec<NetEntry>,
    file: File,
}

impl NetRegistry {
    /// Builds a network registry for `family` from a bootstrap document.
    ///
    /// Entry keys that are not valid CIDR blocks of `family` are skipped.
    /// `overrides` replace the URLs of the matching entry keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be parsed.
    pub fn new(
        family: AddressFamily,
        json: &[u8],
        overrides: &HashMap<String, Url>,
    ) -> Result<Self, BootstrapError> {
        let file = File::parse(json, &HashMap::new())?;
        Self::from_file(family, file, overrides)
    }

    /// Builds a network registry from an already parsed file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file has no entries.
    pub fn from_file(
        family: AddressFamily,
        mut file: File,
        overrides: &HashMap<String, Url>,
    ) -> Result<Self, BootstrapError> {
        if file.entries.is_empty() {
            return Err(BootstrapError::NoEntries);
        }

        file.apply_overrides(overrides);

        let mut networks: Vec<NetEntry> = file
            .entries
            .iter()
            .filter_map(|(key, urls)| match key.trim().parse::<IpNet>() {
                Ok(net) if family.matches(&net) => Some(NetEntry {
                    net: net.trunc(),
                    key: key.clone(),
                    urls: urls.clone(),
                }),
                _ => {
                    tracing::debug!(%family, entry = %key, "Ignoring invalid network entry");
                    None
                }
            })
            .collect();

        networks.sort_by(|a, b| {
            b.net
                .prefix_len()
                .cmp(&a.net.prefix_len())
                .then_with(|| a.key.cmp(&b.key))
        });

        Ok(Self {
            family,
            networks,
            file,
        })
    }

    /// Returns the address family this registry serves.
    #[must_use]
    pub const fn family(&self) -> AddressFamily {
        self.family
    }

    /// Finds the most specific entry containing `query`.
    ///
    /// Returns `None` if `query` is of the other family or no entry
    /// contains it.
    #[must_use]
    pub fn lookup_net(&self, query: &IpNet) -> Option<(&str, &[Url])> {
        if !self.family.matches(query) {
            return None;
        }

        self.networks
            .iter()
            .find(|entry| entry.net.contains(query))
            .map(|entry| (entry.key.as_str(), entry.urls.as_slice()))
    }
}

impl Registry for NetRegistry {
    fn lookup(&self, query: &str) -> Answer {
        let Some(net) = parse_query(query) else {
            return Answer::empty(query);
        };

        self.lookup_net(&net)
            .map_or_else(|| Answer::empty(query), |(key, urls)| Answer::new(query, key, urls))
    }

    fn file(&self) -> &File {
        &self.file
    }
}

/// Parses an IP address or CIDR network.
fn parse_query(query: &str) -> Option<IpNet> {
    let query = query.trim();
    if query.contains('/') {
        query.parse::<IpNet>().ok().map(|net| net.trunc())
    } else {
        query.parse::<IpAddr>().ok().map(IpNet::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata;

    fn ipv4() -> NetRegistry {
        NetRegistry::new(AddressFamily::V4, &testdata::load("ipv4.json"), &HashMap::new())
            .unwrap()
    }

    fn ipv6() -> NetRegistry {
        NetRegistry::new(AddressFamily::V6, &testdata::load("ipv6.json"), &HashMap::new())
            .unwrap()
    }

    #[test]
    fn test_ipv4_longest_prefix() {
        let registry = ipv4();

        assert_eq!(registry.lookup("10.1.2.3").entry, "10.1.0.0/16");
        assert_eq!(registry.lookup("10.2.0.1").entry, "10.0.0.0/8");
        assert_eq!(registry.lookup("10.1.0.0/24").entry, "10.1.0.0/16");
        assert_eq!(registry.lookup("10.0.0.0/8").entry, "10.0.0.0/8");

        let answer = registry.lookup("41.1.1.1");
        assert_eq!(answer.entry, "41.0.0.0/8");
        assert_eq!(answer.urls.len(), 2);
        assert_eq!(answer.urls[0].as_str(), "https://rdap.afrinic.net/rdap/");
    }

    #[test]
    fn test_ipv4_no_match() {
        let registry = ipv4();

        assert!(registry.lookup("192.0.2.1").is_empty());
        // Wider than every entry.
        assert!(registry.lookup("10.0.0.0/7").is_empty());
        // Wrong family and garbage.
        assert!(registry.lookup("2001:db8::1").is_empty());
        assert!(registry.lookup("not an address").is_empty());
        assert!(registry.lookup("").is_empty());
    }

    #[test]
    fn test_ipv4_skips_invalid_and_foreign_entries() {
        let registry = ipv4();

        assert_eq!(registry.networks.len(), 4);
        // The file still holds every published key.
        assert_eq!(registry.file().entries.len(), 6);
    }

    #[test]
    fn test_ipv6_longest_prefix() {
        let registry = ipv6();

        assert_eq!(registry.lookup("2001:db8:1234::1").entry, "2001:db8:1234::/48");
        assert_eq!(registry.lookup("2001:db8:ffff::1").entry, "2001:db8::/32");
        assert_eq!(registry.lookup("2c0f:f000::/32").entry, "2c00::/12");
        assert!(registry.lookup("2001:db8::/16").is_empty());
        assert!(registry.lookup("10.1.2.3").is_empty());
    }

    #[test]
    fn test_lookup_net_family_mismatch() {
        let registry = ipv6();
        let query: IpNet = "10.0.0.0/8".parse().unwrap();
        assert_eq!(registry.lookup_net(&query), None);
        assert_eq!(registry.family(), AddressFamily::V6);
    }

    #[test]
    fn test_override_replaces_urls() {
        let overrides = HashMap::from([(
            "10.0.0.0/8".to_string(),
            Url::parse("https://rdap.override.example/").unwrap(),
        )]);
        let registry =
            NetRegistry::new(AddressFamily::V4, &testdata::load("ipv4.json"), &overrides).unwrap();

        let answer = registry.lookup("10.200.0.1");
        assert_eq!(answer.urls.len(), 1);
        assert_eq!(answer.urls[0].as_str(), "https://rdap.override.example/");
        assert_eq!(
            registry.lookup("10.1.0.1").urls[0].as_str(),
            "https://rdap.example.net/ten-one/"
        );
    }

    #[test]
    fn test_parse_query() {
        assert_eq!(parse_query("192.0.2.1"), Some("192.0.2.1/32".parse().unwrap()));
        assert_eq!(parse_query("192.0.2.7/24"), Some("192.0.2.0/24".parse().unwrap()));
        assert_eq!(parse_query("::1"), Some("::1/128".parse().unwrap()));
        assert_eq!(parse_query("192.0.2.1/99"), None);
    }
}
