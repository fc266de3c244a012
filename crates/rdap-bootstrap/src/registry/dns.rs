//! Domain name registry.

use std::collections::HashMap;

use url::Url;

use super::{Answer, Registry};
use crate::error::BootstrapError;
use crate::file::File;

/// Registry of domain name delegations (`dns.json`).
///
/// Lookups match the longest registered suffix of the query, falling back
/// to the root entry (`""`) when one is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRegistry {
    dns: HashMap<String, Vec<Url>>,
    file: File,
}

impl DnsRegistry {
    /// Builds a DNS registry from a bootstrap document.
    ///
    /// `overrides` maps entry keys (matched case-insensitively) to a URL
    /// that replaces every URL published for that entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be parsed.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use rdap_bootstrap::{DnsRegistry, Registry};
    ///
    /// let json = br#"{"services":[[["com"],["https://example.com","http://example.com"]]]}"#;
    /// let registry = DnsRegistry::new(json, &HashMap::new())?;
    ///
    /// let answer = registry.lookup("example.com");
    /// assert_eq!(answer.entry, "com");
    /// assert_eq!(answer.urls[0].as_str(), "https://example.com/");
    /// # Ok::<(), rdap_bootstrap::BootstrapError>(())
    /// ```
    pub fn new(json: &[u8], overrides: &HashMap<String, Url>) -> Result<Self, BootstrapError> {
        let file = File::parse(json, &HashMap::new())?;
        Self::from_file(file, overrides)
    }

    /// Builds a DNS registry from an already parsed file.
    ///
    /// `overrides` are applied on top of any string overrides given to
    /// [`File::parse`], so they take precedence.
    ///
    /// # Errors
    ///
    /// Returns an error if the file has no entries.
    pub fn from_file(
        mut file: File,
        overrides: &HashMap<String, Url>,
    ) -> Result<Self, BootstrapError> {
        if file.entries.is_empty() {
            return Err(BootstrapError::NoEntries);
        }

        file.apply_overrides(overrides);

        // Keys differing only by a trailing dot collapse; sorted so the
        // outcome does not depend on hash order.
        let mut names: Vec<(&String, &Vec<Url>)> = file.entries.iter().collect();
        names.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let dns = names
            .into_iter()
            .map(|(name, urls)| (normalize(name), urls.clone()))
            .collect();

        Ok(Self { dns, file })
    }
}

impl Registry for DnsRegistry {
    fn lookup(&self, query: &str) -> Answer {
        let fqdn = normalize(query);
        let mut candidate = fqdn.as_str();

        loop {
            if let Some(urls) = self.dns.get(candidate) {
                return Answer::new(query, candidate, urls);
            }
            if candidate.is_empty() {
                return Answer::empty(query);
            }
            candidate = candidate.split_once('.').map_or("", |(_, parent)| parent);
        }
    }

    fn file(&self) -> &File {
        &self.file
    }
}

/// Lowercases a domain name and removes a single trailing dot.
fn normalize(domain: &str) -> String {
    let lower = domain.to_lowercase();
    match lower.strip_suffix('.') {
        Some(stripped) => stripped.to_string(),
        None => lower,
    }
}
