//! ticketdesk admin dashboard entry point.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use ticketdesk_common::logging::init_logging;
use ticketdesk_config::ConfigLoader;
use ticketdesk_store::Store;
use ticketdesk_web::auth::ensure_super_admin;
use ticketdesk_web::{router, AdminDb, AppState};
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

    if let Err(e) = config.validate_for_web() {
        error!(error = %e, "Refusing to start");
        return Err(e.into());
    }

    let store = Store::open(&config.storage.data_dir)?;
    let db = AdminDb::connect(&config.web.database_url).await?;
    ensure_super_admin(&db, &config.web.default_admin_password).await?;

    let app = router(AppState::new(db, store));
    let listener = tokio::net::TcpListener::bind(&config.web.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.web.bind_address))?;
    info!(address = %config.web.bind_address, "Admin dashboard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Received shutdown signal, stopping dashboard");
        })
        .await?;

    info!("Admin dashboard has shut down");
    Ok(())
}
