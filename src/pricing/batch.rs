use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::address::{address_key, hex_to_base58, normalize_evm_address};
use crate::entity::{Chain, PriceQuote, ProviderScope, TokenAddresses};
use crate::pricing::cache::{CacheLookup, PriceCache};
use crate::pricing::config::DEFAULT_BATCH_SIZE;
use crate::pricing::provider::BatchPriceSource;

/// Prices many tokens through the generic provider's batch endpoint
pub struct BatchResolver {
    cache: Arc<PriceCache>,
    source: Arc<dyn BatchPriceSource>,
    batch_size: usize,
}

/// A token after address normalization
struct PendingToken {
    evm_key: Option<String>,
    solana_key: Option<String>,
    mint: Option<String>,
}

impl BatchResolver {
    /// `batch_size` is clamped to the provider ceiling
    pub fn new(
        cache: Arc<PriceCache>,
        source: Arc<dyn BatchPriceSource>,
        batch_size: usize,
    ) -> Self {
        Self {
            cache,
            source,
            batch_size: batch_size.clamp(1, DEFAULT_BATCH_SIZE),
        }
    }

    /// Quotes for every token that has a price on either chain.
    ///
    /// Base is tried first. Tokens without a Base price that carry a Solana
    /// address are retried on Solana. A quote is returned under the token's
    /// EVM key and under its Solana address as given by the caller.
    pub async fn update_prices(&self, tokens: &[TokenAddresses]) -> HashMap<String, PriceQuote> {
        let pending: Vec<PendingToken> = tokens.iter().map(normalize_token).collect();
        info!("Updating prices for {} tokens", pending.len());

        let evm_addresses = unique(pending.iter().filter_map(|t| t.evm_key.clone()));
        let base_quotes = self.resolve_chain(Chain::Base, evm_addresses).await;

        let mut results = HashMap::new();
        let mut unresolved = Vec::new();
        for token in pending {
            let quote = token
                .evm_key
                .as_ref()
                .and_then(|key| base_quotes.get(key))
                .cloned();
            match quote {
                Some(quote) => {
                    self.share_with_other_chain(Chain::Base, &token, &quote);
                    insert_under_both_keys(&mut results, &token, quote);
                }
                None if token.mint.is_some() => unresolved.push(token),
                None => {}
            }
        }

        if !unresolved.is_empty() {
            debug!("Retrying {} tokens on Solana", unresolved.len());
            let mints = unique(unresolved.iter().filter_map(|t| t.mint.clone()));
            let solana_quotes = self.resolve_chain(Chain::Solana, mints).await;

            for token in unresolved {
                let quote = token
                    .mint
                    .as_ref()
                    .and_then(|mint| solana_quotes.get(mint))
                    .cloned();
                if let Some(quote) = quote {
                    self.share_with_other_chain(Chain::Solana, &token, &quote);
                    insert_under_both_keys(&mut results, &token, quote);
                }
            }
        }

        info!("Resolved {} price entries", results.len());
        results
    }

    /// Store a quote produced on `chain` under the other chain's generic scope
    /// as well, so a single lookup of the paired address is served from cache
    fn share_with_other_chain(&self, chain: Chain, token: &PendingToken, quote: &PriceQuote) {
        let (other, address) = match chain {
            Chain::Base => (Chain::Solana, token.mint.as_ref()),
            Chain::Solana => (Chain::Base, token.evm_key.as_ref()),
        };
        if let Some(address) = address {
            self.cache
                .set(ProviderScope::generic(other), address, Some(quote.clone()));
        }
    }

    /// Cache first, then the batch endpoint for whatever is left. Results are
    /// keyed by [`address_key`].
    async fn resolve_chain(
        &self,
        chain: Chain,
        addresses: Vec<String>,
    ) -> HashMap<String, PriceQuote> {
        let scope = ProviderScope::generic(chain);
        let mut quotes = HashMap::new();
        let mut to_fetch = Vec::new();

        for address in addresses {
            match self.cache.get(scope, &address) {
                CacheLookup::Hit(quote) => {
                    quotes.insert(address, quote);
                }
                CacheLookup::Negative => {}
                CacheLookup::Absent => to_fetch.push(address),
            }
        }

        debug!(
            "{}: {} cached, {} to fetch",
            chain,
            quotes.len(),
            to_fetch.len()
        );

        for (index, batch) in to_fetch.chunks(self.batch_size).enumerate() {
            match self.source.fetch_batch(chain, batch).await {
                Ok(mut fetched) => {
                    for address in batch {
                        let quote = fetched.remove(address);
                        self.cache.set(scope, address, quote.clone());
                        if let Some(quote) = quote {
                            quotes.insert(address.clone(), quote);
                        }
                    }
                }
                Err(e) => {
                    // not cached: the next request retries these addresses
                    warn!(
                        "{} batch {} ({} addresses) failed: {}",
                        chain,
                        index + 1,
                        batch.len(),
                        e
                    );
                }
            }
        }

        quotes
    }
}

fn normalize_token(token: &TokenAddresses) -> PendingToken {
    let evm_key = normalize_evm_address(&token.evm_address);
    if evm_key.is_none() && !token.evm_address.trim().is_empty() {
        warn!("Skipping invalid EVM address {}", token.evm_address);
    }

    let solana = token
        .solana_address
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    PendingToken {
        evm_key,
        solana_key: solana.map(address_key),
        mint: solana.and_then(hex_to_base58),
    }
}

fn insert_under_both_keys(
    results: &mut HashMap<String, PriceQuote>,
    token: &PendingToken,
    quote: PriceQuote,
) {
    if let Some(key) = &token.solana_key {
        results.insert(key.clone(), quote.clone());
    }
    if let Some(key) = &token.evm_key {
        results.insert(key.clone(), quote);
    }
}

/// Deduplicate while keeping first-seen order
fn unique(addresses: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    addresses.filter(|a| seen.insert(a.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::AddressPair;
    use crate::pricing::cache::ManualClock;
    use crate::pricing::provider::{PriceProvider, ProviderError, ProviderOutcome};
    use crate::pricing::resolver::PriceResolver;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;
    use std::time::Duration;

    const MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
    const MINT_HEX: &str = "0xc6fa7af3bedbad3a3d65f36aabc97431b1bbe4c2d2f6e0e47ca60203452f5d61";

    /// Prices every address at 1.0 except those in `unknown`; fails the
    /// calls whose 1-based index is in `fail_calls`
    #[derive(Default)]
    struct MockSource {
        calls: Mutex<Vec<(Chain, usize)>>,
        fail_calls: Vec<usize>,
        unknown: HashSet<String>,
    }

    impl MockSource {
        fn calls(&self) -> Vec<(Chain, usize)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BatchPriceSource for MockSource {
        async fn fetch_batch(
            &self,
            chain: Chain,
            addresses: &[String],
        ) -> Result<HashMap<String, PriceQuote>, ProviderError> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                calls.push((chain, addresses.len()));
                calls.len()
            };
            if self.fail_calls.contains(&call) {
                return Err(ProviderError::Status(429));
            }

            Ok(addresses
                .iter()
                .filter(|a| !self.unknown.contains(*a))
                .map(|a| (a.clone(), PriceQuote::new(1.0, Some(10.0), Utc::now()).unwrap()))
                .collect())
        }
    }

    fn evm(n: usize) -> String {
        format!("0x{:040x}", n)
    }

    fn resolver(source: Arc<MockSource>) -> (BatchResolver, Arc<PriceCache>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = Arc::new(PriceCache::new(Duration::from_secs(60), clock));
        (BatchResolver::new(cache.clone(), source, 100), cache)
    }

    #[tokio::test]
    async fn test_batches_of_one_hundred() {
        let source = Arc::new(MockSource::default());
        let (resolver, _) = resolver(source.clone());
        let tokens: Vec<_> = (1..=150).map(|n| TokenAddresses::new(evm(n), None)).collect();

        let results = resolver.update_prices(&tokens).await;

        assert_eq!(source.calls(), vec![(Chain::Base, 100), (Chain::Base, 50)]);
        assert_eq!(results.len(), 150);
    }

    #[tokio::test]
    async fn test_failed_batch_does_not_abort_the_rest() {
        let source = Arc::new(MockSource {
            fail_calls: vec![1],
            ..Default::default()
        });
        let (resolver, cache) = resolver(source.clone());
        let tokens: Vec<_> = (1..=150).map(|n| TokenAddresses::new(evm(n), None)).collect();

        let results = resolver.update_prices(&tokens).await;

        assert_eq!(source.calls().len(), 2);
        assert_eq!(results.len(), 50);
        assert!(results.contains_key(&evm(150)));
        assert!(!results.contains_key(&evm(1)));
        // failed addresses stay uncached
        assert_eq!(cache.get(ProviderScope::CoinGeckoBase, &evm(1)), CacheLookup::Absent);
    }

    #[tokio::test]
    async fn test_cached_addresses_are_not_refetched() {
        let source = Arc::new(MockSource::default());
        let (resolver, _) = resolver(source.clone());
        let tokens = vec![TokenAddresses::new(evm(1), None)];

        resolver.update_prices(&tokens).await;
        let results = resolver.update_prices(&tokens).await;

        assert_eq!(source.calls().len(), 1);
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicates_and_case_collapse() {
        let source = Arc::new(MockSource::default());
        let (resolver, _) = resolver(source.clone());
        let tokens = vec![
            TokenAddresses::new("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913", None),
            TokenAddresses::new("0x833589fcd6edb6e08f4c7c32d4f71b54bda02913", None),
        ];

        let results = resolver.update_prices(&tokens).await;

        assert_eq!(source.calls(), vec![(Chain::Base, 1)]);
        assert!(results.contains_key("0x833589fcd6edb6e08f4c7c32d4f71b54bda02913"));
    }

    #[tokio::test]
    async fn test_solana_retry_for_unpriced_tokens() {
        let source = Arc::new(MockSource {
            unknown: [evm(1)].into_iter().collect(),
            ..Default::default()
        });
        let (resolver, cache) = resolver(source.clone());
        let tokens = vec![
            TokenAddresses::new(evm(1), Some(MINT_HEX.to_string())),
            TokenAddresses::new(evm(2), None),
        ];

        let results = resolver.update_prices(&tokens).await;

        assert_eq!(
            source.calls(),
            vec![(Chain::Base, 2), (Chain::Solana, 1)]
        );
        // keyed by both the EVM address and the caller's Solana spelling
        assert!(results.contains_key(&evm(1)));
        assert!(results.contains_key(MINT_HEX));
        assert!(matches!(
            cache.get(ProviderScope::CoinGeckoSolana, MINT),
            CacheLookup::Hit(_)
        ));
        // the Solana quote also answers later lookups of the EVM address
        assert!(matches!(
            cache.get(ProviderScope::CoinGeckoBase, &evm(1)),
            CacheLookup::Hit(_)
        ));
    }

    #[tokio::test]
    async fn test_priced_on_base_skips_solana() {
        let source = Arc::new(MockSource::default());
        let (resolver, _) = resolver(source.clone());
        let tokens = vec![TokenAddresses::new(evm(7), Some(MINT.to_string()))];

        let results = resolver.update_prices(&tokens).await;

        assert_eq!(source.calls(), vec![(Chain::Base, 1)]);
        assert!(results.contains_key(MINT));
    }

    /// Per-address provider that only counts calls
    struct CountingProvider {
        scope: ProviderScope,
        configured: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PriceProvider for CountingProvider {
        fn scope(&self) -> ProviderScope {
            self.scope
        }

        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn fetch_price(&self, _address: &str) -> ProviderOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            ProviderOutcome::NoPrice
        }
    }

    fn counting(scope: ProviderScope, configured: bool) -> Arc<CountingProvider> {
        Arc::new(CountingProvider {
            scope,
            configured,
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_base_batch_quote_serves_later_solana_lookup() {
        let source = Arc::new(MockSource::default());
        let (batch, cache) = resolver(source.clone());
        let evm_address = "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913";

        let results = batch
            .update_prices(&[TokenAddresses::new(evm_address, Some(MINT.to_string()))])
            .await;
        assert_eq!(source.calls(), vec![(Chain::Base, 1)]);

        let gecko_base = counting(ProviderScope::CoinGeckoBase, true);
        let helius = counting(ProviderScope::HeliusSolana, false);
        let gecko_solana = counting(ProviderScope::CoinGeckoSolana, true);
        let base_providers: Vec<Arc<dyn PriceProvider>> = vec![gecko_base.clone()];
        let solana_providers: Vec<Arc<dyn PriceProvider>> =
            vec![helius.clone(), gecko_solana.clone()];
        let resolver = PriceResolver::new(cache.clone(), base_providers, solana_providers);

        let pair = AddressPair::new(Some(evm_address), Some(MINT)).unwrap();
        let prices = resolver.resolve_both_chains(&pair).await;

        assert_eq!(gecko_base.calls.load(Ordering::SeqCst), 0);
        assert_eq!(helius.calls.load(Ordering::SeqCst), 0);
        assert_eq!(gecko_solana.calls.load(Ordering::SeqCst), 0);
        assert_eq!(prices.solana.as_ref(), results.get(MINT));
        // provider-specific scopes are left alone
        assert_eq!(cache.get(ProviderScope::HeliusSolana, MINT), CacheLookup::Absent);
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_calls() {
        let source = Arc::new(MockSource::default());
        let (resolver, _) = resolver(source.clone());

        assert!(resolver.update_prices(&[]).await.is_empty());
        assert!(source.calls().is_empty());
    }
}
