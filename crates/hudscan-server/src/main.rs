//! HTTP upload service for game HUD value extraction.

mod server;
mod state;

use std::path::PathBuf;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use hudscan_core::models::config::HudscanConfig;

/// Game HUD OCR service - multipart upload, extraction and account state
#[derive(Parser)]
#[command(name = "hudscan-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override bind host
    #[arg(long)]
    host: Option<String>,

    /// Override bind port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = if let Some(path) = &cli.config {
        HudscanConfig::from_file(path)?
    } else {
        HudscanConfig::default()
    };
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    server::start_server(config).await
}
