//! Lookup command implementation.
//!
//! Prints the RDAP servers responsible for a domain name, IP address or
//! network, or AS number.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use rdap_bootstrap::{Answer, RegistryType};
use rdap_bootstrap_client::Client;

/// Arguments for the lookup command.
#[derive(Args)]
pub struct LookupArgs {
    /// Registry to search (dns, asn, ipv4, ipv6)
    pub registry: RegistryType,

    /// Domain name, IP address or CIDR network, or AS number
    pub query: String,
}

/// Runs the lookup command.
///
/// # Errors
///
/// Returns an error if:
/// - The registry cannot be downloaded or loaded from the cache
/// - No RDAP server is responsible for the query
pub async fn run(client: &Client, args: &LookupArgs) -> Result<()> {
    info!(registry = %args.registry, query = %args.query, "Looking up RDAP servers");

    let answer = client
        .lookup(args.registry, &args.query)
        .await
        .with_context(|| format!("Failed to look up {:?}", args.query))?;

    if answer.is_empty() {
        anyhow::bail!(
            "No RDAP server found for {:?} in the {} registry",
            args.query,
            args.registry
        );
    }

    for line in render(&answer) {
        println!("{line}");
    }

    Ok(())
}

/// Formats an answer as the matched entry followed by one URL per line.
fn render(answer: &Answer) -> Vec<String> {
    let entry = if answer.entry.is_empty() {
        "(root)"
    } else {
        answer.entry.as_str()
    };

    std::iter::once(format!("Entry: {entry}"))
        .chain(answer.urls.iter().map(ToString::to_string))
        .collect()
}
