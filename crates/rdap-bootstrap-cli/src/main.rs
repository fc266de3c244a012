//! rdap-bootstrap - find the RDAP servers responsible for domains, IPs and AS numbers.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rdap_bootstrap=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Lookup(args) => commands::lookup::run(&cli.client.build()?, &args).await,
        Commands::Download(args) => commands::download::run(&cli.client.build()?, &args).await,
        Commands::Status(args) => commands::status::run(&cli.client.build()?, &args),
        Commands::Version => {
            println!("rdap-bootstrap {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
