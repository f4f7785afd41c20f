// src/analyzer.rs
use crate::format;
use crate::models::{FlowAggregate, FormattedAmount, WalletSummary, NATIVE_TOKEN_ID};
use crate::source::ChainSource;
use crate::tokens::TokenResolver;
use std::collections::BTreeMap;
use tracing::{error, info};

/// Transactions scanned per flow analysis unless configured otherwise.
pub const DEFAULT_TX_LIMIT: usize = 50;

/// Validate an Ergo address format: 51-60 base58 characters, i.e. the
/// alphanumeric set minus the ambiguous `0OIl`. A checksum is not verified;
/// this gate only keeps garbage away from the network layer.
pub fn is_valid_address(address: &str) -> bool {
    let len = address.len();
    if !(51..=60).contains(&len) {
        return false;
    }
    address
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() && !matches!(b, b'0' | b'O' | b'I' | b'l'))
}

/// Wallet transaction aggregation and token-amount normalization.
///
/// Every public operation returns a well-formed value even under total
/// backend failure; errors ride inside the result, never as `Err`.
pub struct WalletAnalyzer<C> {
    source: C,
    tokens: TokenResolver,
    tx_limit: usize,
}

impl<C: ChainSource> WalletAnalyzer<C> {
    pub fn new(source: C) -> Self {
        Self::with_limit(source, DEFAULT_TX_LIMIT)
    }

    pub fn with_limit(source: C, tx_limit: usize) -> Self {
        WalletAnalyzer {
            source,
            tokens: TokenResolver::new(),
            tx_limit,
        }
    }

    /// Format a raw amount for a token, resolving its metadata first.
    pub async fn format_token_amount(&self, token_id: &str, raw_amount: u64) -> FormattedAmount {
        let meta = self.tokens.resolve(&self.source, token_id).await;
        format::format_with_metadata(&meta, raw_amount)
    }

    /// Walk up to `limit` recent transactions and total the value moving in
    /// and out of `address`, per asset.
    ///
    /// Input legs owned by the address count as outgoing, output legs as
    /// incoming. An address on both sides of one transaction contributes to
    /// both maps; change outputs are raw flow here, not netted out.
    pub async fn analyze_address_transactions(&self, address: &str, limit: usize) -> FlowAggregate {
        if !is_valid_address(address) {
            return FlowAggregate::failed(address, "Invalid address format");
        }

        let transactions = match self.source.get_transactions_for_address(address, limit).await {
            Ok(txs) => txs,
            Err(e) => {
                error!("Transaction fetch failed for {}: {}", address, e);
                return FlowAggregate::failed(address, e.to_string());
            }
        };

        let mut incoming: BTreeMap<String, u64> = BTreeMap::new();
        let mut outgoing: BTreeMap<String, u64> = BTreeMap::new();
        // The native entry is always present, even when no value moved
        incoming.insert(NATIVE_TOKEN_ID.to_string(), 0);
        outgoing.insert(NATIVE_TOKEN_ID.to_string(), 0);

        for tx in &transactions {
            for leg in tx.inputs.iter().filter(|leg| leg.address == address) {
                add_amount(&mut outgoing, NATIVE_TOKEN_ID, leg.value);
                for asset in &leg.assets {
                    add_amount(&mut outgoing, &asset.token_id, asset.amount);
                }
            }
            for leg in tx.outputs.iter().filter(|leg| leg.address == address) {
                add_amount(&mut incoming, NATIVE_TOKEN_ID, leg.value);
                for asset in &leg.assets {
                    add_amount(&mut incoming, &asset.token_id, asset.amount);
                }
            }
        }

        let net_native = incoming[NATIVE_TOKEN_ID] as i128 - outgoing[NATIVE_TOKEN_ID] as i128;

        info!(
            "Analyzed {} transactions for {} (net {} nanoErgs)",
            transactions.len(),
            address,
            net_native
        );

        FlowAggregate {
            address: address.to_string(),
            incoming,
            outgoing,
            net_native,
            transactions_analyzed: transactions.len(),
            error: None,
        }
    }

    /// Compose balance, flow and transaction count into one summary with a
    /// deterministic narrative for LLM prompt assembly.
    pub async fn get_wallet_summary(&self, address: &str) -> WalletSummary {
        if !is_valid_address(address) {
            let msg = format!("Invalid address format: {}", address);
            error!("{}", msg);
            return WalletSummary::failed(address, msg);
        }

        // Independent read-only fetches, joined in one round
        let (balance, flow, info) = tokio::join!(
            self.source.get_balance(address),
            self.analyze_address_transactions(address, self.tx_limit),
            self.source.get_address_info(address),
        );

        // Flow failure with nothing analyzed means there is no story to tell
        if flow.transactions_analyzed == 0 {
            if let Some(err) = &flow.error {
                return WalletSummary::failed(address, err.clone());
            }
        }

        let balance = match balance {
            Ok(balance) => balance,
            Err(e) => {
                error!("Balance fetch failed for {}: {}", address, e);
                return WalletSummary::failed(address, e.to_string());
            }
        };

        let transaction_count = match info {
            Ok(info) => info.transactions_count,
            Err(e) => {
                error!("Address info fetch failed for {}: {}", address, e);
                return WalletSummary::failed(address, e.to_string());
            }
        };

        let current_balance = self.format_entries(&balance).await;
        let incoming = self.format_entries(&flow.incoming).await;
        let outgoing = self.format_entries(&flow.outgoing).await;

        let narrative = render_narrative(
            address,
            transaction_count,
            &current_balance,
            &incoming,
            &outgoing,
        );

        WalletSummary {
            address: address.to_string(),
            current_balance,
            transaction_count,
            incoming,
            outgoing,
            narrative,
            error: None,
        }
    }

    async fn format_entries(
        &self,
        raw: &BTreeMap<String, u64>,
    ) -> BTreeMap<String, FormattedAmount> {
        let mut formatted = BTreeMap::new();
        for (token_id, amount) in raw {
            formatted.insert(
                token_id.clone(),
                self.format_token_amount(token_id, *amount).await,
            );
        }
        formatted
    }
}

fn add_amount(totals: &mut BTreeMap<String, u64>, token_id: &str, amount: u64) {
    let entry = totals.entry(token_id.to_string()).or_insert(0);
    *entry = entry.saturating_add(amount);
}

/// Fixed narrative template. Map iteration order is stable (native unit
/// first, then lexicographic token ids), so identical fetch results render
/// byte-identical text.
fn render_narrative(
    address: &str,
    transaction_count: u64,
    balance: &BTreeMap<String, FormattedAmount>,
    incoming: &BTreeMap<String, FormattedAmount>,
    outgoing: &BTreeMap<String, FormattedAmount>,
) -> String {
    let mut lines = vec![
        format!("Wallet Address: {}", address),
        format!("Total Transactions: {}", transaction_count),
        "\nCurrent Balance:".to_string(),
    ];

    for (token_id, amount) in native_first(balance) {
        if token_id == NATIVE_TOKEN_ID {
            lines.push(format!("  • {} (native currency)", amount.display));
        } else {
            lines.push(format!("  • {}", amount.display));
        }
    }

    lines.push("\nTransaction Analysis (recent transactions):".to_string());

    if !incoming.is_empty() {
        lines.push("\nIncoming:".to_string());
        for (_, amount) in native_first(incoming) {
            lines.push(format!("  • {} received", amount.display));
        }
    }

    if !outgoing.is_empty() {
        lines.push("\nOutgoing:".to_string());
        for (_, amount) in native_first(outgoing) {
            lines.push(format!("  • {} sent", amount.display));
        }
    }

    lines.join("\n")
}

fn native_first(
    map: &BTreeMap<String, FormattedAmount>,
) -> impl Iterator<Item = (&String, &FormattedAmount)> {
    map.iter()
        .filter(|(id, _)| id.as_str() == NATIVE_TOKEN_ID)
        .chain(map.iter().filter(|(id, _)| id.as_str() != NATIVE_TOKEN_ID))
}
