use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;

use crate::address::address_key;
use crate::entity::{Chain, PriceQuote, ProviderScope};
use crate::pricing::models::CoinGeckoTokenPrices;
use crate::pricing::provider::{
    check_status, BatchPriceSource, PriceProvider, ProviderError, ProviderOutcome,
};
use crate::pricing::PricingConfig;

/// Клиент CoinGecko `simple/token_price`, общий для обеих сетей
pub struct CoinGeckoClient {
    http_client: Client,
    api_url: String,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    pub fn new(http_client: Client, config: &PricingConfig) -> Self {
        Self {
            http_client,
            api_url: config.coingecko_api_url.clone(),
            api_key: config.coingecko_api_key.clone(),
        }
    }

    /// Query parameters for one request; the demo key rides along when configured
    fn query_params(&self, addresses: &[String]) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("contract_addresses", addresses.join(",")),
            ("vs_currencies", "usd".to_string()),
            ("include_market_cap", "true".to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("x_cg_demo_api_key", key.clone()));
        }
        params
    }

    pub async fn get_token_prices(
        &self,
        chain: Chain,
        addresses: &[String],
    ) -> Result<CoinGeckoTokenPrices, ProviderError> {
        let url = format!("{}/simple/token_price/{}", self.api_url, chain.platform_id());

        let response = self
            .http_client
            .get(&url)
            .query(&self.query_params(addresses))
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.without_url()))?;

        check_status(response)?
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.without_url().to_string()))
    }
}

/// Convert a `simple/token_price` body into quotes keyed by [`address_key`].
/// Entries without a usable USD price are skipped.
pub fn quotes_from_response(
    prices: CoinGeckoTokenPrices,
    at: DateTime<Utc>,
) -> HashMap<String, PriceQuote> {
    prices
        .into_iter()
        .filter_map(|(address, price)| {
            let quote = PriceQuote::new(price.usd?, price.usd_market_cap, at)?;
            Some((address_key(&address), quote))
        })
        .collect()
}

#[async_trait]
impl BatchPriceSource for CoinGeckoClient {
    async fn fetch_batch(
        &self,
        chain: Chain,
        addresses: &[String],
    ) -> Result<HashMap<String, PriceQuote>, ProviderError> {
        if addresses.is_empty() {
            return Ok(HashMap::new());
        }

        let prices = self.get_token_prices(chain, addresses).await?;
        debug!(
            "CoinGecko returned {} of {} {} prices",
            prices.len(),
            addresses.len(),
            chain
        );

        Ok(quotes_from_response(prices, Utc::now()))
    }
}

/// CoinGecko as the per-address fallback provider of one chain
pub struct CoinGeckoPriceProvider {
    client: Arc<CoinGeckoClient>,
    chain: Chain,
}

impl CoinGeckoPriceProvider {
    pub fn new(client: Arc<CoinGeckoClient>, chain: Chain) -> Self {
        Self { client, chain }
    }
}

#[async_trait]
impl PriceProvider for CoinGeckoPriceProvider {
    fn scope(&self) -> ProviderScope {
        ProviderScope::generic(self.chain)
    }

    async fn fetch_price(&self, address: &str) -> ProviderOutcome {
        let addresses = [address.to_string()];
        match self.client.fetch_batch(self.chain, &addresses).await {
            Ok(mut quotes) => match quotes.remove(&address_key(address)) {
                Some(quote) => ProviderOutcome::Quote(quote),
                None => ProviderOutcome::NoPrice,
            },
            Err(e) => {
                warn!("CoinGecko {} lookup failed for {}: {}", self.chain, address, e);
                ProviderOutcome::Failed(e)
            }
        }
    }
}
