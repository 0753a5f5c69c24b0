use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use reqwest::Client;

use crate::entity::{PriceQuote, ProviderScope};
use crate::pricing::models::{
    parse_raw_amount, scale_by_decimals, AlchemyPrice, AlchemyPricesResponse,
    AlchemyTokenMetadata, JsonRpcRequest, JsonRpcResponse,
};
use crate::pricing::provider::{check_status, PriceProvider, ProviderError, ProviderOutcome};
use crate::pricing::PricingConfig;

/// ERC-20 tokens without a `decimals` entry are assumed to use the common default
const DEFAULT_EVM_DECIMALS: u32 = 18;

/// Base-chain prices from Alchemy: token metadata first, then a price lookup by symbol
///
/// The API key is a path segment, so transport errors are stripped of their URL.
pub struct AlchemyPriceProvider {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl AlchemyPriceProvider {
    pub fn new(http_client: Client, config: &PricingConfig) -> Self {
        Self {
            http_client,
            base_url: config.alchemy_base_url.clone(),
            api_key: config.alchemy_api_key.clone(),
        }
    }

    async fn get_token_metadata(
        &self,
        api_key: &str,
        address: &str,
    ) -> Result<Option<AlchemyTokenMetadata>, ProviderError> {
        let url = format!("{}/{}", self.base_url, api_key);
        let request = JsonRpcRequest::new("1", "alchemy_getTokenMetadata", [address]);

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.without_url()))?;
        let body: JsonRpcResponse<AlchemyTokenMetadata> = check_status(response)?
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.without_url().to_string()))?;

        if let Some(error) = body.error {
            return Err(ProviderError::Rpc(error.message));
        }

        Ok(body.result)
    }

    async fn get_price_by_symbol(
        &self,
        api_key: &str,
        symbol: &str,
    ) -> Result<Option<AlchemyPrice>, ProviderError> {
        let url = format!("{}/{}/prices", self.base_url, api_key);

        let response = self
            .http_client
            .get(&url)
            .query(&[("symbol", symbol)])
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.without_url()))?;
        let body: AlchemyPricesResponse = check_status(response)?
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.without_url().to_string()))?;

        if let Some(error) = body.error {
            return Err(ProviderError::Rpc(error.to_string()));
        }

        Ok(body.prices.into_iter().find(|p| {
            p.symbol
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case(symbol))
        }))
    }

    async fn fetch(&self, address: &str) -> Result<Option<PriceQuote>, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredentials)?;

        let Some(metadata) = self.get_token_metadata(api_key, address).await? else {
            return Ok(None);
        };
        let Some(symbol) = metadata.symbol.as_deref().filter(|s| !s.is_empty()) else {
            debug!("Alchemy has no symbol for {}", address);
            return Ok(None);
        };

        let Some(price) = self.get_price_by_symbol(api_key, symbol).await? else {
            debug!("Alchemy has no price for symbol {}", symbol);
            return Ok(None);
        };

        Ok(quote_from_alchemy(&metadata, &price, Utc::now()))
    }
}

/// Build a quote from metadata and a price entry. Market cap comes from the
/// price entry when present, otherwise from total supply.
pub fn quote_from_alchemy(
    metadata: &AlchemyTokenMetadata,
    price: &AlchemyPrice,
    at: DateTime<Utc>,
) -> Option<PriceQuote> {
    let price_usd = price.price.filter(|p| *p > 0.0)?;

    let market_cap_usd = price.market_cap.filter(|cap| *cap > 0.0).or_else(|| {
        let raw_supply = metadata.total_supply.as_deref().and_then(parse_raw_amount)?;
        let decimals = metadata
            .decimals
            .filter(|d| *d > 0)
            .unwrap_or(DEFAULT_EVM_DECIMALS);
        Some(scale_by_decimals(raw_supply, decimals) * price_usd)
    });

    PriceQuote::new(price_usd, market_cap_usd, at)
}

#[async_trait]
impl PriceProvider for AlchemyPriceProvider {
    fn scope(&self) -> ProviderScope {
        ProviderScope::AlchemyBase
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch_price(&self, address: &str) -> ProviderOutcome {
        let outcome = ProviderOutcome::from(self.fetch(address).await);
        if let ProviderOutcome::Failed(e) = &outcome {
            warn!("Alchemy price lookup failed for {}: {}", address, e);
        }
        outcome
    }
}
