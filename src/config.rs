// src/config.rs
use dotenvy::dotenv;
use eyre::Result;
use std::env;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Config {
    pub explorer_url: String,
    pub port: u16,
    pub tx_limit: usize,
    pub cache_ttl_secs: i64,
    pub cache_capacity: usize,
}

pub fn load() -> Result<Config> {
    dotenv().ok(); // Load from .env file

    // Explorer base URL (default: public Ergo explorer)
    let explorer_url = env::var("EXPLORER_URL")
        .unwrap_or_else(|_| "https://api.ergoplatform.com".to_string());

    // API port (default: 8080)
    let port = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    // Transactions scanned per wallet analysis (default: 50)
    let tx_limit = env::var("TX_LIMIT")
        .unwrap_or_else(|_| "50".to_string())
        .parse()
        .unwrap_or(50);

    // Fetch cache TTL in seconds (default: 5 minutes)
    let cache_ttl_secs = env::var("CACHE_TTL_SECS")
        .unwrap_or_else(|_| "300".to_string())
        .parse()
        .unwrap_or(300);

    // Entries kept per fetch cache (default: 1000)
    let cache_capacity = env::var("CACHE_CAPACITY")
        .unwrap_or_else(|_| "1000".to_string())
        .parse()
        .unwrap_or(1000);

    let cfg = Config {
        explorer_url,
        port,
        tx_limit,
        cache_ttl_secs,
        cache_capacity,
    };

    info!("Loaded config: {:?}", cfg);

    Ok(cfg)
}
