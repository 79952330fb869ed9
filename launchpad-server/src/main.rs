//! Token launchpad server
//!
//! Pins token images and metadata, then hands back launch transactions for
//! the creator's wallet to sign and submit.

use anyhow::Result;
use clap::Parser;
use launchpad_sdk::{RpcLedgerClient, TokenLauncher};
use launchpad_server::{adapters::HttpStorageUploader, api, ServerConfig};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "launchpad-server")]
#[command(about = "Token launchpad backend")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "launchpad.toml")]
    config: String,

    /// Override log level
    #[arg(long)]
    log_level: Option<String>,

    /// Dry run mode (validate config and exit)
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_found = std::path::Path::new(&cli.config).exists();
    let mut config = if config_found {
        ServerConfig::load(&cli.config)?
    } else {
        ServerConfig::default()
    };
    config.apply_env_overrides();

    if let Some(log_level) = cli.log_level {
        config.monitoring.log_level = log_level;
    }

    init_logging(&config)?;
    if !config_found {
        warn!("Config file not found, using defaults: {}", cli.config);
    }

    info!("Starting launchpad server");
    info!("Solana RPC: {}", config.solana.rpc_url);
    info!("Storage endpoint: {}", config.storage.upload_url);
    info!("Storage gateway: {}", config.storage.gateway_url);

    // Validated once, after environment overrides
    config.validate()?;
    info!("Configuration validated successfully");

    if cli.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        return Ok(());
    }

    let uploader = Arc::new(HttpStorageUploader::new(&config.storage)?);
    let ledger = Arc::new(RpcLedgerClient::from_url(config.solana.rpc_url.clone()));
    let launcher = Arc::new(TokenLauncher::new(
        uploader,
        ledger,
        config.launch_config(),
    ));

    let api_server = api::start_server(launcher, &config.api).await?;

    info!("Launchpad started. Press Ctrl+C to shutdown.");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
        _ = api_server => {
            info!("API server finished");
        }
    }

    info!("Shutting down launchpad server");
    Ok(())
}

fn init_logging(config: &ServerConfig) -> Result<()> {
    let log_level = config
        .monitoring
        .log_level
        .parse()
        .unwrap_or(tracing::Level::INFO);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "launchpad_server={},launchpad_sdk={},tower_http=info",
            log_level, log_level
        )
        .into()
    });

    if config.monitoring.structured_logging {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    Ok(())
}
