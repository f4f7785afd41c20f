// src/format.rs
use crate::models::{FormattedAmount, TokenMetadata};
use rust_decimal::Decimal;
use tracing::warn;

/// Convert a raw amount in smallest units to an exact decimal plus a display
/// string like `"1 ERG"` or `"0.001 TestToken"`.
///
/// Division by 10^decimals is exact (no floats), so the raw amount always
/// round-trips: `round(decimal_value * 10^decimals) == raw_amount`.
///
/// Never fails: if the token's claimed precision cannot be represented, the
/// value degrades to the raw integer labelled with the truncated token id.
pub fn format_with_metadata(meta: &TokenMetadata, raw_amount: u64) -> FormattedAmount {
    match Decimal::try_from_i128_with_scale(raw_amount as i128, meta.decimals) {
        Ok(value) => {
            // normalize() drops trailing zeros, so whole numbers render
            // without a decimal point
            let value = value.normalize();
            FormattedAmount {
                raw_amount,
                decimal_value: value,
                display: format!("{} {}", value, meta.name),
            }
        }
        Err(e) => {
            warn!(
                "Cannot scale {} by 10^{} for token {}: {}",
                raw_amount, meta.decimals, meta.id, e
            );
            let label: String = meta.id.chars().take(8).collect();
            FormattedAmount {
                raw_amount,
                decimal_value: Decimal::from(raw_amount),
                display: format!("{} {}", raw_amount, label),
            }
        }
    }
}
