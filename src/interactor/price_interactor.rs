use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::entity::{
    ChainPricePair, DirectionHint, PriceError, PriceQuote, SelectedPrice, TokenAddresses,
};
use crate::pricing::{BatchResolver, PriceResolver, ResolvedPrice};

#[async_trait]
pub trait PriceInteractor: Send + Sync {
    /// Price for one address of either chain
    async fn get_price(&self, address: &str) -> Result<ResolvedPrice, PriceError>;

    async fn get_prices_both_chains(
        &self,
        evm_address: &str,
        solana_address: Option<&str>,
    ) -> Result<ChainPricePair, PriceError>;

    /// Single price for a known pair, preferring the chain named by `hint`
    async fn get_preferred_price(
        &self,
        evm_address: Option<&str>,
        solana_address: Option<&str>,
        hint: DirectionHint,
    ) -> Result<SelectedPrice, PriceError>;

    async fn update_prices(&self, tokens: &[TokenAddresses]) -> HashMap<String, PriceQuote>;
}

pub struct PriceInteractorImpl {
    resolver: Arc<PriceResolver>,
    batch_resolver: Arc<BatchResolver>,
}

impl PriceInteractorImpl {
    pub fn new(resolver: Arc<PriceResolver>, batch_resolver: Arc<BatchResolver>) -> Self {
        Self {
            resolver,
            batch_resolver,
        }
    }
}

#[async_trait]
impl PriceInteractor for PriceInteractorImpl {
    async fn get_price(&self, address: &str) -> Result<ResolvedPrice, PriceError> {
        self.resolver.resolve_single(address).await
    }

    async fn get_prices_both_chains(
        &self,
        evm_address: &str,
        solana_address: Option<&str>,
    ) -> Result<ChainPricePair, PriceError> {
        self.resolver
            .get_prices_both_chains(evm_address, solana_address)
            .await
    }

    async fn get_preferred_price(
        &self,
        evm_address: Option<&str>,
        solana_address: Option<&str>,
        hint: DirectionHint,
    ) -> Result<SelectedPrice, PriceError> {
        self.resolver
            .get_preferred_price(evm_address, solana_address, hint)
            .await
    }

    async fn update_prices(&self, tokens: &[TokenAddresses]) -> HashMap<String, PriceQuote> {
        self.batch_resolver.update_prices(tokens).await
    }
}
