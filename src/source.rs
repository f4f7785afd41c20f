// src/source.rs
use crate::models::{AddressInfo, TokenDetails, TransactionRecord};
use std::collections::BTreeMap;
use thiserror::Error;

/// Failures surfaced by a chain data source. These never cross the public
/// analyzer API; they are downgraded to error-shaped results or fallback
/// values at the boundary.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("explorer returned HTTP {0}")]
    Status(u16),

    #[error("unexpected response shape: {0}")]
    Decode(String),

    #[error("token metadata lookups not supported by this source")]
    Unsupported,
}

/// Read-only access to blockchain data for a single address.
///
/// `get_token_details` is an optional capability: sources without a token
/// metadata endpoint keep the default implementation and the resolver falls
/// back to default metadata instead of failing.
pub trait ChainSource {
    /// Current confirmed balance as token id → raw amount in smallest units.
    async fn get_balance(&self, address: &str) -> Result<BTreeMap<String, u64>, SourceError>;

    /// Most recent transactions touching the address, newest first.
    async fn get_transactions_for_address(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, SourceError>;

    /// Address-level metadata (total transaction count).
    async fn get_address_info(&self, address: &str) -> Result<AddressInfo, SourceError>;

    /// Token display metadata. Optional capability.
    async fn get_token_details(&self, token_id: &str) -> Result<TokenDetails, SourceError> {
        let _ = token_id;
        Err(SourceError::Unsupported)
    }
}
