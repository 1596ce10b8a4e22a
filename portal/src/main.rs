//! Portal escalation service binary.
//!
//! ```bash
//! # Serve the HTTP API (with an optional periodic sweep)
//! portal serve
//!
//! # One-shot sweep from the command line, summary printed as JSON
//! portal sweep
//!
//! # Populate a fresh data directory with demo users/tickets/rules
//! portal seed
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use portal::config::PortalConfig;
use portal::seed;
use portal::server::{self, AppState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML config file (environment variables otherwise)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Run one escalation sweep and print the summary
    Sweep,
    /// Seed demo data into the data directory
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portal=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => PortalConfig::load(path)?,
        None => PortalConfig::default(),
    };

    match args.command {
        Command::Serve => server::run(config).await,
        Command::Sweep => {
            let state = AppState::open(&config)?;
            let summary = state.sweep.run().await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        Command::Seed => {
            let state = AppState::open(&config)?;
            let seeded = seed::run(&state)?;
            tracing::info!(
                tickets = seeded,
                data_dir = %config.data_dir.display(),
                "demo data seeded"
            );
            Ok(())
        }
    }
}
