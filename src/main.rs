//! `hlsplay` CLI - inspect HLS capability and plugin selection

mod cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hlsplay")]
#[command(about = "HLS playback backend selection for video players")]
#[command(version)]
struct Cli {
    /// Configuration file (default: ~/.config/hlsplay/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report how this host would play HLS
    Detect {
        /// Treat the host as playing HLS natively
        #[arg(long)]
        native: bool,

        /// Treat the host as lacking Media Source support
        #[arg(long)]
        no_mse: bool,
    },

    /// Check which format plugin would play a stream descriptor
    Check {
        /// Stream descriptor JSON file
        descriptor: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Detect { native, no_mse } => {
            cmd::cmd_detect(cli.config.as_deref(), native, no_mse).await?;
        }
        Commands::Check { descriptor } => {
            cmd::cmd_check(&descriptor, cli.config.as_deref()).await?;
        }
    }

    Ok(())
}
