//! Bootstrap registry file parsing.
//!
//! A bootstrap registry file (`dns.json`, `asn.json`, `ipv4.json`,
//! `ipv6.json`) maps service entries to the RDAP base URLs responsible for
//! them:
//!
//! ```text
//! {
//!   "description": "...",
//!   "publication": "2017-03-15T21:26:24Z",
//!   "version": "1.0",
//!   "services": [
//!     [ ["br"], ["https://rdap.registro.br/"] ],
//!     ...
//!   ]
//! }
//! ```

use std::collections::HashMap;

use serde::Deserialize;
use url::Url;

use crate::error::BootstrapError;

/// A parsed bootstrap registry file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    /// Free-form description from the document.
    pub description: String,

    /// Publication timestamp, as published (not parsed further).
    pub publication: String,

    /// Format version from the document.
    pub version: String,

    /// Map of service entries to RDAP base URLs.
    ///
    /// e.g. in `ipv6.json`, the following mapping:
    /// `"2c00::/12"` => `https://rdap.afrinic.net/rdap/`,
    ///                  `http://rdap.afrinic.net/rdap/`.
    ///
    /// Keys keep the case they were published with. Every list is non-empty
    /// and keeps the published (preference) order.
    pub entries: HashMap<String, Vec<Url>>,

    /// The original document.
    pub json: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    description: String,
    #[serde(default)]
    publication: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    services: Vec<Vec<Vec<String>>>,
}

impl File {
    /// Parses a bootstrap registry document.
    ///
    /// `overrides` maps entry keys (matched case-insensitively) to a URL that
    /// replaces all URLs published for that entry.
    ///
    /// Unparsable service URLs are skipped; a services tuple left with no
    /// URL contributes no entries. When several tuples name the same key,
    /// the last one wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON, a services tuple
    /// does not have exactly two elements, an override cannot be parsed as
    /// a URL, or no entries remain.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use rdap_bootstrap::File;
    ///
    /// let json = br#"{"services":[[["com"],["https://example.com","http://example.com"]]]}"#;
    /// let file = File::parse(json, &HashMap::new())?;
    /// assert_eq!(file.entries["com"].len(), 2);
    /// # Ok::<(), rdap_bootstrap::BootstrapError>(())
    /// ```
    pub fn parse(
        document: &[u8],
        overrides: &HashMap<String, String>,
    ) -> Result<Self, BootstrapError> {
        let doc: Document = serde_json::from_slice(document)?;

        let overrides = fold_keys(overrides);

        let mut entries = HashMap::new();
        // Lowercased key to the spelling stored in `entries`.
        let mut spellings: HashMap<String, String> = HashMap::new();

        for (index, service) in doc.services.into_iter().enumerate() {
            let [keys, raw_urls]: [Vec<String>; 2] = service
                .try_into()
                .map_err(|s: Vec<Vec<String>>| BootstrapError::MalformedServices {
                    index,
                    len: s.len(),
                })?;

            let urls: Vec<Url> = raw_urls
                .iter()
                .filter_map(|raw| match Url::parse(raw) {
                    Ok(url) => Some(url),
                    Err(e) => {
                        tracing::debug!(url = %raw, error = %e, "Ignoring unparsable service URL");
                        None
                    }
                })
                .collect();

            if urls.is_empty() {
                continue;
            }

            for key in keys {
                let folded = key.to_lowercase();
                let key_urls = match overrides.get(&folded) {
                    Some(raw) => {
                        let url = Url::parse(raw).map_err(|source| {
                            BootstrapError::InvalidOverrideUrl {
                                key: key.clone(),
                                url: (*raw).clone(),
                                source,
                            }
                        })?;
                        vec![url]
                    }
                    None => urls.clone(),
                };
                if let Some(previous) = spellings.insert(folded, key.clone()) {
                    entries.remove(&previous);
                }
                entries.insert(key, key_urls);
            }
        }

        if entries.is_empty() {
            return Err(BootstrapError::NoEntries);
        }

        Ok(Self {
            description: doc.description,
            publication: doc.publication,
            version: doc.version,
            entries,
            json: document.to_vec(),
        })
    }

    /// Replaces the URLs of existing entries with already-parsed override
    /// URLs. Keys are matched case-insensitively; overrides for keys the
    /// file does not contain are ignored.
    pub(crate) fn apply_overrides(&mut self, overrides: &HashMap<String, Url>) {
        if overrides.is_empty() {
            return;
        }

        let overrides = fold_keys(overrides);

        for (key, urls) in &mut self.entries {
            if let Some(url) = overrides.get(&key.to_lowercase()) {
                *urls = vec![(*url).clone()];
            }
        }
    }
}

/// Lowercases override keys. When several keys fold to the same one, the
/// greatest original spelling wins.
fn fold_keys<V>(overrides: &HashMap<String, V>) -> HashMap<String, &V> {
    let mut pairs: Vec<(&String, &V)> = overrides.iter().collect();
    pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));

    pairs
        .into_iter()
        .map(|(key, value)| (key.to_lowercase(), value))
        .collect()
}
