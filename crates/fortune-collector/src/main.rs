//! Fortune Collector - one-shot entry point.

use anyhow::Context;
use clap::Parser;
use fortune_collector::{Cli, CollectorConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Logs go to stderr; stdout is reserved for the JSON dump
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = CollectorConfig::from_cli(cli).context("invalid configuration")?;

    let captured_at = fortune_collector::capture_time();
    let stdout = std::io::stdout();
    fortune_collector::collect_once(&config, captured_at, stdout.lock())
        .await
        .context("collection run failed")?;

    Ok(())
}
