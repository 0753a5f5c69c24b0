//! # Price resolver
//!
//! Resolves a token's price on Base and on Solana independently. Each chain
//! has an ordered list of providers that are tried until one produces a
//! quote. Every attempt goes through the [`PriceCache`] under the
//! provider's own scope, so failures are remembered for the TTL window.

use chrono::Utc;
use log::{debug, info, warn};
use std::sync::Arc;

use crate::address::{classify_address, AddressKind};
use crate::entity::{
    AddressPair, Chain, ChainPricePair, DirectionHint, PriceError, PriceQuote, SelectedPrice,
};
use crate::indexer::TokenRegistry;
use crate::pricing::cache::{CacheLookup, PriceCache};
use crate::pricing::provider::{PriceProvider, ProviderOutcome};

/// Price for a single address together with the pair it was resolved through
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPrice {
    pub pair: AddressPair,
    pub price: SelectedPrice,
}

pub struct PriceResolver {
    cache: Arc<PriceCache>,
    base_providers: Vec<Arc<dyn PriceProvider>>,
    solana_providers: Vec<Arc<dyn PriceProvider>>,
    registry: Option<Arc<dyn TokenRegistry>>,
}

impl PriceResolver {
    /// `base_providers` and `solana_providers` are tried in the given order
    pub fn new(
        cache: Arc<PriceCache>,
        base_providers: Vec<Arc<dyn PriceProvider>>,
        solana_providers: Vec<Arc<dyn PriceProvider>>,
    ) -> Self {
        Self {
            cache,
            base_providers,
            solana_providers,
            registry: None,
        }
    }

    pub fn with_registry(mut self, registry: Arc<dyn TokenRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn cache(&self) -> &Arc<PriceCache> {
        &self.cache
    }

    /// One provider attempt, served from the cache when possible
    async fn lookup(&self, provider: &dyn PriceProvider, address: &str) -> Option<PriceQuote> {
        let scope = provider.scope();

        if !provider.is_configured() {
            debug!("Skipping {} for {}: not configured", scope, address);
            return None;
        }

        match self.cache.get(scope, address) {
            CacheLookup::Hit(quote) => {
                debug!("Cache hit {}:{}", scope, address);
                return Some(quote);
            }
            CacheLookup::Negative => {
                debug!("Cached miss {}:{}", scope, address);
                return None;
            }
            CacheLookup::Absent => {}
        }

        let quote = match provider.fetch_price(address).await {
            ProviderOutcome::Quote(quote) => Some(quote),
            ProviderOutcome::NoPrice => {
                debug!("{} has no price for {}", scope, address);
                None
            }
            ProviderOutcome::Failed(e) => {
                warn!("{} failed for {}: {}", scope, address, e);
                None
            }
        };

        self.cache.set(scope, address, quote.clone());
        quote
    }

    async fn resolve_chain(
        &self,
        chain: Chain,
        providers: &[Arc<dyn PriceProvider>],
        address: &str,
    ) -> Option<PriceQuote> {
        for provider in providers {
            if let Some(quote) = self.lookup(provider.as_ref(), address).await {
                return Some(quote);
            }
        }

        debug!("No {} price for {}", chain, address);
        None
    }

    /// Resolve both chains concurrently. The Solana side runs only when the
    /// pair has a Solana address, and neither side falls back to the other.
    pub async fn resolve_both_chains(&self, pair: &AddressPair) -> ChainPricePair {
        let base = async {
            match pair.evm_address() {
                Some(address) => {
                    self.resolve_chain(Chain::Base, &self.base_providers, address)
                        .await
                }
                None => None,
            }
        };

        let solana = async {
            match pair.solana_mint() {
                Some(mint) => {
                    self.resolve_chain(Chain::Solana, &self.solana_providers, &mint)
                        .await
                }
                None => {
                    if let Some(address) = pair.solana_address() {
                        warn!("Cannot convert Solana address {} to a mint", address);
                    }
                    None
                }
            }
        };

        let (base, solana) = tokio::join!(base, solana);
        ChainPricePair::new(base, solana)
    }

    /// Dual-chain prices for an EVM address and an optional Solana address.
    ///
    /// Without a Solana address the registry, when configured, is asked for
    /// the paired mint. A failed lookup only costs the Solana side.
    pub async fn get_prices_both_chains(
        &self,
        evm_address: &str,
        solana_address: Option<&str>,
    ) -> Result<ChainPricePair, PriceError> {
        let solana_address = match solana_address.map(str::trim).filter(|s| !s.is_empty()) {
            Some(address) => Some(address.to_string()),
            None => self.paired_mint(evm_address).await,
        };

        let pair = AddressPair::new(Some(evm_address), solana_address.as_deref())?;
        info!(
            "Resolving prices for {} (solana: {})",
            evm_address,
            pair.solana_address().unwrap_or("none")
        );

        Ok(self.resolve_both_chains(&pair).await)
    }

    async fn paired_mint(&self, evm_address: &str) -> Option<String> {
        let registry = self.registry.as_ref()?;

        match registry.find_by_evm_address(evm_address).await {
            Ok(Some(token)) => token.solana_mint_address,
            Ok(None) => {
                debug!("Indexer has no record for {}", evm_address);
                None
            }
            Err(e) => {
                warn!("Indexer lookup for {} failed: {}", evm_address, e);
                None
            }
        }
    }

    /// Resolve both chains of a known pair and collapse them into one price
    pub async fn resolve_preferred(
        &self,
        pair: &AddressPair,
        hint: DirectionHint,
    ) -> SelectedPrice {
        self.resolve_both_chains(pair).await.select(hint, Utc::now())
    }

    /// Single price for an EVM and/or Solana address, preferring the chain
    /// named by `hint`. A missing mint is completed through the registry
    /// first, as in [`Self::get_prices_both_chains`].
    pub async fn get_preferred_price(
        &self,
        evm_address: Option<&str>,
        solana_address: Option<&str>,
        hint: DirectionHint,
    ) -> Result<SelectedPrice, PriceError> {
        match evm_address.map(str::trim).filter(|s| !s.is_empty()) {
            Some(evm_address) => Ok(self
                .get_prices_both_chains(evm_address, solana_address)
                .await?
                .select(hint, Utc::now())),
            None => {
                let pair = AddressPair::new(None, solana_address)?;
                Ok(self.resolve_preferred(&pair, hint).await)
            }
        }
    }

    /// Price for a lone address of either chain. The paired address comes
    /// from the token registry; the input's own chain is preferred.
    pub async fn resolve_single(&self, address: &str) -> Result<ResolvedPrice, PriceError> {
        let address = address.trim();
        let kind = classify_address(address).ok_or_else(|| {
            PriceError::InvalidAddressFormat(format!(
                "{} is neither an EVM nor a Solana address",
                address
            ))
        })?;

        let registry = self
            .registry
            .as_ref()
            .ok_or_else(|| PriceError::ConfigurationMissing("ENVIO_API_URL".to_string()))?;

        let token = match kind {
            AddressKind::Solana => registry.find_by_solana_mint(address).await?,
            AddressKind::Evm => registry.find_by_evm_address(address).await?,
        }
        .ok_or_else(|| PriceError::NotFound(address.to_string()))?;

        // a Solana input stands in for a record without a mint
        let solana = match kind {
            AddressKind::Solana => token.solana_mint_address.as_deref().or(Some(address)),
            AddressKind::Evm => token.solana_mint_address.as_deref(),
        };
        let pair = AddressPair::new(Some(&token.address), solana)?;
        let hint = match kind {
            AddressKind::Solana => DirectionHint::SourceIsSolana,
            AddressKind::Evm => DirectionHint::SourceIsEvm,
        };

        info!("Resolving {} as {:?}", address, hint);
        let price = self.resolve_preferred(&pair, hint).await;

        Ok(ResolvedPrice { pair, price })
    }
}
