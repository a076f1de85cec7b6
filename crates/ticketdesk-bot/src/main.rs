//! ticketdesk bot entry point.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use ticketdesk_bot::TicketDeskBot;
use ticketdesk_common::logging::init_logging;
use ticketdesk_config::ConfigLoader;
use ticketdesk_store::Store;
use tracing::{error, info};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level, overriding the configuration file
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ConfigLoader::load(args.config.as_deref())?;
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    init_logging(&config.logging.to_logging_config())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    info!("Starting ticketdesk bot");

    if let Err(e) = config.validate_for_bot() {
        error!(error = %e, "Refusing to start");
        return Err(e.into());
    }

    let store = Store::open(&config.storage.data_dir)?;
    info!(data_dir = %config.storage.data_dir, "Document store ready");

    if let Err(e) = TicketDeskBot::new(config, store).start().await {
        error!(error = %e, "Bot stopped with an error");
        return Err(e.into());
    }

    info!("ticketdesk bot has shut down");
    Ok(())
}
