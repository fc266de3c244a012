//! CLI commands and argument parsing.

pub mod download;
pub mod lookup;
pub mod status;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use url::Url;

use rdap_bootstrap::{CacheConfig, DiskCache, LoggerFn};
use rdap_bootstrap_client::{Client, ClientConfig, DEFAULT_BASE_URL};

/// rdap-bootstrap - Find the RDAP servers for domains, IP networks and AS numbers
#[derive(Parser)]
#[command(name = "rdap-bootstrap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub client: ClientArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Find the RDAP servers for a query
    Lookup(lookup::LookupArgs),

    /// Download bootstrap registries into the cache
    Download(download::DownloadArgs),

    /// Show the cache state of each bootstrap registry
    Status(status::StatusArgs),

    /// Print version information
    Version,
}

/// Options shared by every command that talks to the bootstrap service.
#[derive(Args, Debug, Clone)]
pub struct ClientArgs {
    /// Base URL of the bootstrap registry files
    #[arg(long, global = true, env = "RDAP_BOOTSTRAP_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Directory for cached registry files (default: user cache directory)
    #[arg(long, global = true, env = "RDAP_BOOTSTRAP_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Keep registry files in memory only
    #[arg(long, global = true)]
    pub memory_cache: bool,

    /// Seconds before a cached registry file expires
    #[arg(long, global = true, default_value = "86400")]
    pub cache_timeout: u64,

    /// HTTP request timeout in seconds
    #[arg(long, global = true, default_value = "30")]
    pub timeout: u64,

    /// Replace the RDAP servers of a DNS entry (repeatable)
    #[arg(long = "override", global = true, value_name = "KEY=URL", value_parser = parse_override)]
    pub overrides: Vec<(String, Url)>,

    /// Print bootstrap progress messages to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl ClientArgs {
    /// Builds a bootstrap client from the command-line options.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be created.
    pub fn build(&self) -> Result<Client> {
        let cache_timeout = Duration::from_secs(self.cache_timeout);
        let config = ClientConfig::new(&self.base_url)
            .with_timeout(Duration::from_secs(self.timeout))
            .with_cache_timeout(cache_timeout);

        let mut client = Client::new(config).context("Failed to create bootstrap client")?;

        if !self.memory_cache {
            let cache_config = self
                .cache_dir
                .clone()
                .map_or_else(CacheConfig::default, CacheConfig::new)
                .with_timeout(cache_timeout);
            client = client.with_cache(Arc::new(DiskCache::new(cache_config)));
        }

        if !self.overrides.is_empty() {
            client = client.with_dns_overrides(self.overrides.iter().cloned().collect());
        }

        if self.verbose {
            client = client.with_logger(Arc::new(LoggerFn(|args: fmt::Arguments<'_>| {
                eprintln!("# {args}");
            })));
        }

        Ok(client)
    }
}

/// Parses a `KEY=URL` override.
fn parse_override(s: &str) -> Result<(String, Url), String> {
    let (key, url) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=URL, got {s:?}"))?;

    let url = Url::parse(url).map_err(|e| format!("invalid URL {url:?}: {e}"))?;

    Ok((key.to_string(), url))
}
