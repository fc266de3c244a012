//! Status command implementation.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tracing::info;

use rdap_bootstrap::{FileState, RegistryType};
use rdap_bootstrap_client::Client;

/// Arguments for the status command.
#[derive(Args)]
pub struct StatusArgs {
    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for status command.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Text,
    /// Pretty-printed JSON array
    Json,
}

/// Cache status of one registry file.
#[derive(Debug, Serialize)]
pub struct RegistryStatus {
    /// Registry name (`dns`, `asn`, `ipv4`, `ipv6`).
    pub registry: String,
    /// Cached file name.
    pub file: String,
    /// Cache state as text.
    pub state: String,
    /// Cache state.
    #[serde(skip)]
    pub file_state: FileState,
}

/// Runs the status command.
///
/// # Errors
///
/// Returns an error if the JSON output cannot be produced.
pub fn run(client: &Client, args: &StatusArgs) -> Result<()> {
    info!("Checking bootstrap registry cache");

    let statuses = collect(client);

    match args.format {
        OutputFormat::Text => print_text_status(&statuses),
        OutputFormat::Json => print_json_status(&statuses)?,
    }

    Ok(())
}

fn collect(client: &Client) -> Vec<RegistryStatus> {
    RegistryType::ALL
        .into_iter()
        .map(|registry| {
            let file_state = client.state(registry);
            RegistryStatus {
                registry: registry.to_string(),
                file: registry.filename().to_string(),
                state: file_state.to_string(),
                file_state,
            }
        })
        .collect()
}

fn print_text_status(statuses: &[RegistryStatus]) {
    println!("RDAP Bootstrap Cache Status");
    println!("===========================");
    println!();

    for status in statuses {
        let icon = match status.file_state {
            FileState::Good => "✓",
            FileState::ShouldReload => "⟳",
            FileState::Expired => "✗",
            FileState::Absent => "-",
        };
        println!("{icon} {:<5} {:<10} [{}]", status.registry, status.file, status.state);
    }

    if statuses.iter().any(|s| s.file_state == FileState::Absent) {
        println!();
        println!("Run 'rdap-bootstrap download' to fetch missing registries.");
    }
}

fn print_json_status(statuses: &[RegistryStatus]) -> Result<()> {
    let json = serde_json::to_string_pretty(statuses)?;
    println!("{json}");
    Ok(())
}
