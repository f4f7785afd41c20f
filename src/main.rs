mod analyzer;
mod api;
mod cache;
mod config;
mod explorer;
mod format;
mod models;
mod source;
mod tokens;

use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stdout)
        .with_target(false)
        .init();

    info!("Ergo wallet analyzer starting...");

    // Load configuration
    let cfg = config::load()?;
    info!("  Explorer URL: {}", cfg.explorer_url);
    info!("  Port: {}", cfg.port);
    info!("  Tx limit: {}", cfg.tx_limit);
    info!("  Cache TTL: {}s", cfg.cache_ttl_secs);

    let client = explorer::ExplorerClient::from_config(&cfg)?;
    let analyzer = Arc::new(analyzer::WalletAnalyzer::with_limit(client, cfg.tx_limit));

    // Spawn API task
    let api_handle = tokio::spawn({
        let cfg = cfg.clone();
        let analyzer = Arc::clone(&analyzer);
        async move { api::serve(cfg, analyzer).await }
    });

    // Graceful shutdown
    tokio::select! {
        res = api_handle => match res {
            Ok(Ok(_)) => info!("API exited cleanly"),
            Ok(Err(e)) => error!("API error: {:?}", e),
            Err(e) => error!("API task panicked: {:?}", e),
        },
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received, stopping...");
        }
    }

    info!("Ergo wallet analyzer stopped.");
    Ok(())
}
