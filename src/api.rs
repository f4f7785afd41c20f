// src/api.rs
use crate::analyzer::WalletAnalyzer;
use crate::config::Config;
use crate::explorer::ExplorerClient;
use axum::{
    extract::{Path, Query},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

#[derive(Deserialize)]
pub struct FormatQuery {
    pub token: String,
    pub amount: u64,
}

/// Thin REST surface over the analyzer. Handlers never fail; errors ride
/// inside the serialized results.
pub async fn serve(cfg: Config, analyzer: Arc<WalletAnalyzer<ExplorerClient>>) -> eyre::Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(|| async { "Wallet analyzer API running" }))
        .route("/wallet/:address", get({
            let analyzer = Arc::clone(&analyzer);
            move |Path(address): Path<String>| {
                let analyzer = Arc::clone(&analyzer);
                async move { Json(analyzer.get_wallet_summary(&address).await) }
            }
        }))
        .route("/format", get({
            let analyzer = Arc::clone(&analyzer);
            move |q: Query<FormatQuery>| {
                let analyzer = Arc::clone(&analyzer);
                async move { Json(analyzer.format_token_amount(&q.token, q.amount).await) }
            }
        }))
        .layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], cfg.port));
    info!("API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
