// src/tokens.rs
use crate::models::{TokenMetadata, NATIVE_DECIMALS, NATIVE_NAME, NATIVE_TOKEN_ID};
use crate::source::ChainSource;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::error;

/// Resolves token ids to display metadata, memoized for the analyzer's
/// lifetime. Token decimals never change, so the memo has no TTL and no
/// capacity bound, unlike the fetch caches.
#[derive(Default)]
pub struct TokenResolver {
    memo: Mutex<HashMap<String, TokenMetadata>>,
}

impl TokenResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolution always succeeds from the caller's perspective: the native
    /// unit is built in, and lookup failures degrade to a default record
    /// (0 decimals, truncated id as name) which is memoized like a hit.
    pub async fn resolve<C: ChainSource>(&self, source: &C, token_id: &str) -> TokenMetadata {
        if token_id == NATIVE_TOKEN_ID {
            return TokenMetadata {
                id: token_id.to_string(),
                name: NATIVE_NAME.to_string(),
                decimals: NATIVE_DECIMALS,
            };
        }

        // Guard is dropped before the fetch; a concurrent resolve of the same
        // id may race to insert, which is benign (values are idempotent).
        if let Some(meta) = self.memo.lock().unwrap().get(token_id) {
            return meta.clone();
        }

        let meta = match source.get_token_details(token_id).await {
            Ok(details) => TokenMetadata {
                id: token_id.to_string(),
                name: details.name.unwrap_or_else(|| "Unknown".to_string()),
                decimals: details.decimals.unwrap_or(0),
            },
            Err(e) => {
                error!("Token lookup failed for {}: {}", token_id, e);
                fallback_metadata(token_id)
            }
        };

        self.memo
            .lock()
            .unwrap()
            .insert(token_id.to_string(), meta.clone());
        meta
    }
}

/// Default record used when metadata cannot be fetched.
pub fn fallback_metadata(token_id: &str) -> TokenMetadata {
    TokenMetadata {
        id: token_id.to_string(),
        name: token_id.chars().take(8).collect(),
        decimals: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AddressInfo, TokenDetails, TransactionRecord};
    use crate::source::SourceError;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Source that serves one token record and counts lookups.
    struct CountingSource {
        details: Result<TokenDetails, ()>,
        lookups: AtomicUsize,
    }

    impl CountingSource {
        fn new(details: Result<TokenDetails, ()>) -> Self {
            CountingSource {
                details,
                lookups: AtomicUsize::new(0),
            }
        }
    }

    impl ChainSource for CountingSource {
        async fn get_balance(&self, _: &str) -> Result<BTreeMap<String, u64>, SourceError> {
            unreachable!("resolver never fetches balances")
        }

        async fn get_transactions_for_address(
            &self,
            _: &str,
            _: usize,
        ) -> Result<Vec<TransactionRecord>, SourceError> {
            unreachable!("resolver never fetches transactions")
        }

        async fn get_address_info(&self, _: &str) -> Result<AddressInfo, SourceError> {
            unreachable!("resolver never fetches address info")
        }

        async fn get_token_details(&self, _: &str) -> Result<TokenDetails, SourceError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            match &self.details {
                Ok(d) => Ok(d.clone()),
                Err(()) => Err(SourceError::Status(500)),
            }
        }
    }

    /// Source without the token metadata capability at all.
    struct BareSource;

    impl ChainSource for BareSource {
        async fn get_balance(&self, _: &str) -> Result<BTreeMap<String, u64>, SourceError> {
            Ok(BTreeMap::new())
        }

        async fn get_transactions_for_address(
            &self,
            _: &str,
            _: usize,
        ) -> Result<Vec<TransactionRecord>, SourceError> {
            Ok(Vec::new())
        }

        async fn get_address_info(&self, _: &str) -> Result<AddressInfo, SourceError> {
            Ok(AddressInfo::default())
        }
    }

    #[tokio::test]
    async fn native_unit_resolves_without_lookup() {
        let source = CountingSource::new(Err(()));
        let resolver = TokenResolver::new();

        let meta = resolver.resolve(&source, NATIVE_TOKEN_ID).await;

        assert_eq!(meta.name, "ERG");
        assert_eq!(meta.decimals, 9);
        assert_eq!(source.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn lookup_failure_falls_back_to_default_record() {
        let source = CountingSource::new(Err(()));
        let resolver = TokenResolver::new();

        let meta = resolver
            .resolve(&source, "abcdefghijklmnopqrstuvwxyz")
            .await;

        assert_eq!(meta.name, "abcdefgh");
        assert_eq!(meta.decimals, 0);
    }

    #[tokio::test]
    async fn missing_capability_falls_back_to_default_record() {
        let resolver = TokenResolver::new();

        let meta = resolver.resolve(&BareSource, "sometoken123").await;

        assert_eq!(meta.name, "sometoke");
        assert_eq!(meta.decimals, 0);
    }

    #[tokio::test]
    async fn resolution_is_memoized() {
        let source = CountingSource::new(Ok(TokenDetails {
            name: Some("Test Token".to_string()),
            decimals: Some(6),
        }));
        let resolver = TokenResolver::new();

        let first = resolver.resolve(&source, "tokenId1").await;
        let second = resolver.resolve(&source, "tokenId1").await;

        assert_eq!(first, second);
        assert_eq!(first.name, "Test Token");
        assert_eq!(first.decimals, 6);
        assert_eq!(source.lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_wire_fields_use_defaults() {
        let source = CountingSource::new(Ok(TokenDetails {
            name: None,
            decimals: None,
        }));
        let resolver = TokenResolver::new();

        let meta = resolver.resolve(&source, "tokenId1").await;

        assert_eq!(meta.name, "Unknown");
        assert_eq!(meta.decimals, 0);
    }

    #[tokio::test]
    async fn fallback_is_memoized_too() {
        let source = CountingSource::new(Err(()));
        let resolver = TokenResolver::new();

        resolver.resolve(&source, "tokenId1").await;
        resolver.resolve(&source, "tokenId1").await;

        assert_eq!(source.lookups.load(Ordering::SeqCst), 1);
    }
}
