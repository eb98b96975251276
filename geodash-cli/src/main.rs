//! GeoDash CLI - WMS imagery URLs, downloads and region statistics.

use clap::Parser;
use geodash_core::config::DashConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "geodash-cli",
    version,
    about = "GeoDash imagery and statistics toolkit"
)]
struct Cli {
    /// JSON config file; omitted fields keep their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: geodash_cmd::Command,
}

// The statistics panel holds `Rc` state, so everything runs on one thread.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => DashConfig::load(path)?,
        None => DashConfig::default(),
    };
    log::debug!("Using WMS endpoint {}", config.wms_endpoint);
    geodash_cmd::run(cli.command, config).await
}
