use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::address::address_key;
use crate::entity::{
    BridgeDirection, BridgeTransaction, BridgedToken, PriceError, TokenAddresses,
    TokenTransactionsPage,
};
use crate::indexer::queries::sort_by_market_cap;
use crate::indexer::BridgeIndexer;
use crate::pricing::BatchResolver;

#[async_trait]
pub trait BridgeInteractor: Send + Sync {
    async fn latest_transactions(
        &self,
        limit: u32,
        direction: Option<BridgeDirection>,
    ) -> Result<Vec<BridgeTransaction>, PriceError>;

    async fn token_transactions(
        &self,
        token_address: &str,
        page: u32,
        limit: u32,
    ) -> Result<TokenTransactionsPage, PriceError>;

    /// Top tokens with live prices, ordered by live market cap
    async fn top_tokens_with_prices(
        &self,
        limit: u32,
        direction: Option<BridgeDirection>,
    ) -> Result<Vec<BridgedToken>, PriceError>;
}

pub struct BridgeInteractorImpl {
    indexer: Option<Arc<dyn BridgeIndexer>>,
    batch_resolver: Arc<BatchResolver>,
}

impl BridgeInteractorImpl {
    /// Without an indexer every call fails with `ConfigurationMissing`
    pub fn new(
        indexer: Option<Arc<dyn BridgeIndexer>>,
        batch_resolver: Arc<BatchResolver>,
    ) -> Self {
        Self {
            indexer,
            batch_resolver,
        }
    }

    fn indexer(&self) -> Result<&Arc<dyn BridgeIndexer>, PriceError> {
        self.indexer
            .as_ref()
            .ok_or_else(|| PriceError::ConfigurationMissing("ENVIO_API_URL".to_string()))
    }
}

#[async_trait]
impl BridgeInteractor for BridgeInteractorImpl {
    async fn latest_transactions(
        &self,
        limit: u32,
        direction: Option<BridgeDirection>,
    ) -> Result<Vec<BridgeTransaction>, PriceError> {
        self.indexer()?.latest_transactions(limit, direction).await
    }

    async fn token_transactions(
        &self,
        token_address: &str,
        page: u32,
        limit: u32,
    ) -> Result<TokenTransactionsPage, PriceError> {
        self.indexer()?
            .token_transactions(token_address, page, limit)
            .await
    }

    async fn top_tokens_with_prices(
        &self,
        limit: u32,
        direction: Option<BridgeDirection>,
    ) -> Result<Vec<BridgedToken>, PriceError> {
        let mut tokens = self.indexer()?.top_tokens(limit, direction).await?;

        let requests: Vec<TokenAddresses> = tokens
            .iter()
            .map(|t| TokenAddresses::new(t.address.clone(), t.solana_mint_address.clone()))
            .collect();
        let prices = self.batch_resolver.update_prices(&requests).await;
        info!(
            "Fetched {} live price entries for {} top tokens",
            prices.len(),
            tokens.len()
        );

        // indexer values stay when there is no live quote
        for token in tokens.iter_mut() {
            if let Some(quote) = prices.get(&address_key(&token.address)) {
                token.price_usd = Some(quote.price_usd());
                if let Some(cap) = quote.market_cap_usd() {
                    token.market_cap_usd = Some(cap);
                }
            }
        }

        sort_by_market_cap(&mut tokens);
        Ok(tokens)
    }
}
