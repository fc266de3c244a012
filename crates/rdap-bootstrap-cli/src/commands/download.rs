//! Download command implementation.
//!
//! Fetches bootstrap registry files into the cache.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use rdap_bootstrap::RegistryType;
use rdap_bootstrap_client::Client;

/// Arguments for the download command.
#[derive(Args)]
pub struct DownloadArgs {
    /// Registries to download (default: all)
    pub registries: Vec<RegistryType>,
}

/// Runs the download command.
///
/// # Errors
///
/// Returns an error if any registry cannot be downloaded.
pub async fn run(client: &Client, args: &DownloadArgs) -> Result<()> {
    let registries = selected(&args.registries);
    info!(count = registries.len(), "Downloading bootstrap registries");

    for registry in registries {
        let url = client.file_url(registry)?;
        print!("Downloading {url}... ");

        let downloaded = client
            .download(registry)
            .await
            .with_context(|| format!("Failed to download the {registry} registry"))?;

        println!("✓ {} entries", downloaded.file().entries.len());
    }

    Ok(())
}

/// Returns the requested registries without duplicates, or all of them.
fn selected(requested: &[RegistryType]) -> Vec<RegistryType> {
    if requested.is_empty() {
        return RegistryType::ALL.to_vec();
    }

    let mut registries = requested.to_vec();
    registries.sort_unstable();
    registries.dedup();
    registries
}
