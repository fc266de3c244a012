//! Autonomous system number registry.

use std::collections::HashMap;

use url::Url;

use super::{Answer, Registry};
use crate::error::BootstrapError;
use crate::file::File;

#[derive(Debug, Clone, PartialEq, Eq)]
struct AsnRange {
    first: u32,
    last: u32,
    key: String,
    urls: Vec<Url>,
}

impl AsnRange {
    const fn contains(&self, asn: u32) -> bool {
        self.first <= asn && asn <= self.last
    }

    const fn width(&self) -> u32 {
        self.last - self.first
    }
}

/// Registry of AS number allocations (`asn.json`).
///
/// Entry keys are single numbers (`"2043"`) or inclusive ranges
/// (`"1-1876"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsnRegistry {
    ranges: Vec<AsnRange>,
    file: File,
}

impl AsnRegistry {
    /// Builds an ASN registry from a bootstrap document.
    ///
    /// Entry keys that are not valid ranges are skipped. `overrides`
    /// replace the URLs of the matching entry keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be parsed.
    pub fn new(json: &[u8], overrides: &HashMap<String, Url>) -> Result<Self, BootstrapError> {
        let file = File::parse(json, &HashMap::new())?;
        Self::from_file(file, overrides)
    }

    /// Builds an ASN registry from an already parsed file.
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

        let mut ranges: Vec<AsnRange> = file
            .entries
            .iter()
            .filter_map(|(key, urls)| {
                let Some((first, last)) = parse_range(key) else {
                    tracing::debug!(entry = %key, "Ignoring invalid ASN range");
                    return None;
                };
                Some(AsnRange {
                    first,
                    last,
                    key: key.clone(),
                    urls: urls.clone(),
                })
            })
            .collect();

        ranges.sort_by(|a, b| {
            (a.first, a.last, &a.key).cmp(&(b.first, b.last, &b.key))
        });

        Ok(Self { ranges, file })
    }

    /// Finds the entry containing `asn`. When published ranges overlap,
    /// the narrowest one wins.
    #[must_use]
    pub fn lookup_asn(&self, asn: u32) -> Option<(&str, &[Url])> {
        self.ranges
            .iter()
            .take_while(|range| range.first <= asn)
            .filter(|range| range.contains(asn))
            .min_by_key(|range| range.width())
            .map(|range| (range.key.as_str(), range.urls.as_slice()))
    }
}

impl Registry for AsnRegistry {
    fn lookup(&self, query: &str) -> Answer {
        let Some(asn) = parse_asn(query) else {
            return Answer::empty(query);
        };

        self.lookup_asn(asn)
            .map_or_else(|| Answer::empty(query), |(key, urls)| Answer::new(query, key, urls))
    }

    fn file(&self) -> &File {
        &self.file
    }
}

/// Parses `"N"` or `"N-M"`.
fn parse_range(key: &str) -> Option<(u32, u32)> {
    let (first, last) = match key.trim().split_once('-') {
        Some((first, last)) => (first.trim().parse().ok()?, last.trim().parse().ok()?),
        None => {
            let asn = key.trim().parse().ok()?;
            (asn, asn)
        }
    };

    (first <= last).then_some((first, last))
}

/// Parses an AS number, with an optional case-insensitive `AS` prefix.
fn parse_asn(query: &str) -> Option<u32> {
    let query = query.trim();
    let digits = match query.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("as") => &query[2..],
        _ => query,
    };
    digits.parse().ok()
}
