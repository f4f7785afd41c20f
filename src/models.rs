// src/models.rs
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reserved token id for the chain's native unit (amounts in nanoErg).
pub const NATIVE_TOKEN_ID: &str = "nanoErgs";

/// 1 ERG = 10^9 nanoErgs
pub const NATIVE_DECIMALS: u32 = 9;

pub const NATIVE_NAME: &str = "ERG";

/// Display metadata for a token. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenMetadata {
    pub id: String,
    pub name: String,
    pub decimals: u32,
}

/// A raw amount normalized to an exact decimal plus a display string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedAmount {
    pub raw_amount: u64,
    pub decimal_value: Decimal,
    pub display: String,
}

/// One token entry on a transaction leg.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    #[serde(default)]
    pub token_id: String,
    #[serde(default)]
    pub amount: u64,
}

/// One input or output of a transaction. Legs with missing fields are kept
/// with defaults rather than rejected; aggregation treats them as zero.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Leg {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub value: u64,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// A transaction with its full input/output graph, as returned by the
/// explorer. Read-only wire data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub inputs: Vec<Leg>,
    #[serde(default)]
    pub outputs: Vec<Leg>,
}

/// Address-level metadata from the explorer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressInfo {
    #[serde(default, alias = "transactionsCount", alias = "txsCount")]
    pub transactions_count: u64,
}

/// Raw token record from the token metadata endpoint. Both fields are
/// optional on the wire; the resolver applies defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenDetails {
    pub name: Option<String>,
    pub decimals: Option<u32>,
}

/// Directional fund flow for one address over a bounded transaction window.
///
/// `net_native` is incoming minus outgoing native value and may be negative.
/// The same transaction can contribute to both sides when the address appears
/// on both input and output legs (change outputs); that is raw flow, not net
/// transfer, and is deliberately not deduplicated.
#[derive(Debug, Clone, Serialize)]
pub struct FlowAggregate {
    pub address: String,
    pub incoming: BTreeMap<String, u64>,
    pub outgoing: BTreeMap<String, u64>,
    pub net_native: i128,
    pub transactions_analyzed: usize,
    pub error: Option<String>,
}

impl FlowAggregate {
    /// Zero-valued result carrying an error marker. The aggregator never
    /// fails; fetch and validation problems come back in this shape.
    pub fn failed(address: &str, error: impl Into<String>) -> Self {
        FlowAggregate {
            address: address.to_string(),
            incoming: BTreeMap::new(),
            outgoing: BTreeMap::new(),
            net_native: 0,
            transactions_analyzed: 0,
            error: Some(error.into()),
        }
    }
}

/// Composed wallet view: current balance, recent flow, and a deterministic
/// narrative for LLM prompt assembly.
#[derive(Debug, Clone, Serialize)]
pub struct WalletSummary {
    pub address: String,
    pub current_balance: BTreeMap<String, FormattedAmount>,
    pub transaction_count: u64,
    pub incoming: BTreeMap<String, FormattedAmount>,
    pub outgoing: BTreeMap<String, FormattedAmount>,
    pub narrative: String,
    pub error: Option<String>,
}

impl WalletSummary {
    pub fn failed(address: &str, error: impl Into<String>) -> Self {
        let error = error.into();
        WalletSummary {
            address: address.to_string(),
            current_balance: BTreeMap::new(),
            transaction_count: 0,
            incoming: BTreeMap::new(),
            outgoing: BTreeMap::new(),
            narrative: format!("Error: {}", error),
            error: Some(error),
        }
    }
}
