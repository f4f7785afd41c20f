// src/explorer.rs
use crate::cache::TtlCache;
use crate::config::Config;
use crate::models::{AddressInfo, TokenDetails, TransactionRecord};
use crate::source::{ChainSource, SourceError};
use chrono::Duration;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::info;

#[derive(Debug, Deserialize)]
struct BalanceResponse {
    #[serde(default)]
    assets: Vec<BalanceAsset>,
}

#[derive(Debug, Deserialize)]
struct BalanceAsset {
    id: String,
    #[serde(default)]
    amount: u64,
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default)]
    items: Vec<T>,
}

/// Client for the public Ergo explorer REST API.
///
/// Each fetch family owns its own TTL cache; the caches are never shared with
/// other components. Guards are released before any await.
pub struct ExplorerClient {
    http: Client,
    base_url: String,
    cache_ttl: Duration,
    balances: Mutex<TtlCache<String, BTreeMap<String, u64>>>,
    transactions: Mutex<TtlCache<String, Vec<TransactionRecord>>>,
    addresses: Mutex<TtlCache<String, AddressInfo>>,
}

impl ExplorerClient {
    pub fn new(
        base_url: &str,
        cache_ttl: Duration,
        cache_capacity: usize,
    ) -> Result<Self, SourceError> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;

        Ok(ExplorerClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache_ttl,
            balances: Mutex::new(TtlCache::new(cache_capacity)),
            transactions: Mutex::new(TtlCache::new(cache_capacity)),
            addresses: Mutex::new(TtlCache::new(cache_capacity)),
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self, SourceError> {
        Self::new(
            &cfg.explorer_url,
            Duration::seconds(cfg.cache_ttl_secs),
            cfg.cache_capacity,
        )
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SourceError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        info!("📡 GET {}", url);

        let resp = self.http.get(&url).query(query).send().await?;
        if resp.status() != StatusCode::OK {
            return Err(SourceError::Status(resp.status().as_u16()));
        }

        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| SourceError::Decode(e.to_string()))
    }
}

impl ChainSource for ExplorerClient {
    async fn get_balance(&self, address: &str) -> Result<BTreeMap<String, u64>, SourceError> {
        let key = address.to_string();
        {
            let mut cache = self.balances.lock().unwrap();
            if cache.is_cached(&key) {
                if let Some(hit) = cache.get(&key) {
                    return Ok(hit.clone());
                }
            }
        }

        let data: BalanceResponse = self
            .fetch_json(&format!("api/addresses/{}/balance", address), &[])
            .await?;
        let balance: BTreeMap<String, u64> = data
            .assets
            .into_iter()
            .map(|asset| (asset.id, asset.amount))
            .collect();

        self.balances
            .lock()
            .unwrap()
            .put(key, balance.clone(), self.cache_ttl);
        Ok(balance)
    }

    async fn get_transactions_for_address(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, SourceError> {
        let key = format!("{}:{}", address, limit);
        {
            let mut cache = self.transactions.lock().unwrap();
            if cache.is_cached(&key) {
                if let Some(hit) = cache.get(&key) {
                    return Ok(hit.clone());
                }
            }
        }

        let page: Page<TransactionRecord> = self
            .fetch_json(
                &format!("api/addresses/{}/transactions", address),
                &[("limit", limit.to_string())],
            )
            .await?;

        self.transactions
            .lock()
            .unwrap()
            .put(key, page.items.clone(), self.cache_ttl);
        Ok(page.items)
    }

    async fn get_address_info(&self, address: &str) -> Result<AddressInfo, SourceError> {
        let key = address.to_string();
        {
            let mut cache = self.addresses.lock().unwrap();
            if cache.is_cached(&key) {
                if let Some(hit) = cache.get(&key) {
                    return Ok(hit.clone());
                }
            }
        }

        let info: AddressInfo = self
            .fetch_json(&format!("api/addresses/{}", address), &[])
            .await?;

        self.addresses
            .lock()
            .unwrap()
            .put(key, info.clone(), self.cache_ttl);
        Ok(info)
    }

    // Not cached here: the token resolver memoizes results for good
    async fn get_token_details(&self, token_id: &str) -> Result<TokenDetails, SourceError> {
        self.fetch_json(&format!("api/v1/tokens/{}", token_id), &[])
            .await
    }
}
