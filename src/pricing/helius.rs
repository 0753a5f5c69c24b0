use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::entity::{PriceQuote, ProviderScope};
use crate::pricing::models::{
    scale_by_decimals, DisplayOptions, GetAssetParams, HeliusAsset, HeliusTokenInfo,
    JsonRpcRequest, JsonRpcResponse, TokenSupplyResult,
};
use crate::pricing::provider::{check_status, PriceProvider, ProviderError, ProviderOutcome};
use crate::pricing::PricingConfig;
use crate::utils::redact;

/// Solana prices from the Helius DAS `getAsset` method
pub struct HeliusPriceProvider {
    http_client: Client,
    rpc_url: String,
    api_key: Option<String>,
}

impl HeliusPriceProvider {
    pub fn new(http_client: Client, config: &PricingConfig) -> Self {
        Self {
            http_client,
            rpc_url: config.helius_rpc_url.clone(),
            api_key: config.helius_api_key.clone(),
        }
    }

    async fn call<P, T>(
        &self,
        api_key: &str,
        method: &'static str,
        params: P,
    ) -> Result<Option<T>, ProviderError>
    where
        P: Serialize + Send,
        T: DeserializeOwned,
    {
        let url = format!("{}/?api-key={}", self.rpc_url, api_key);
        let request = JsonRpcRequest::new("1", method, params);
        debug!("Helius {} via {}", method, redact(&url, Some(api_key)));

        // the key is part of the URL, keep it out of error messages
        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.without_url()))?;
        let body: JsonRpcResponse<T> = check_status(response)?
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.without_url().to_string()))?;

        if let Some(error) = body.error {
            return Err(ProviderError::Rpc(error.message));
        }

        Ok(body.result)
    }

    async fn get_asset(
        &self,
        api_key: &str,
        mint: &str,
    ) -> Result<Option<HeliusAsset>, ProviderError> {
        let params = GetAssetParams {
            id: mint,
            display_options: DisplayOptions {
                show_fungible: true,
            },
        };
        self.call(api_key, "getAsset", params).await
    }

    /// Circulating supply in whole tokens
    async fn get_token_supply(
        &self,
        api_key: &str,
        mint: &str,
    ) -> Result<Option<f64>, ProviderError> {
        let result: Option<TokenSupplyResult> =
            self.call(api_key, "getTokenSupply", [mint]).await?;

        Ok(result
            .and_then(|r| r.value)
            .and_then(|value| value.ui_supply()))
    }

    async fn fetch(&self, mint: &str) -> Result<Option<PriceQuote>, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredentials)?;

        let Some(token_info) = self
            .get_asset(api_key, mint)
            .await?
            .and_then(|asset| asset.token_info)
        else {
            debug!("Helius has no token info for {}", mint);
            return Ok(None);
        };

        let Some(price) = price_per_token(&token_info) else {
            debug!("Helius has no price for {}", mint);
            return Ok(None);
        };

        let supply = match asset_supply(&token_info) {
            Some(supply) => Some(supply),
            None => match self.get_token_supply(api_key, mint).await {
                Ok(supply) => supply,
                Err(e) => {
                    debug!("getTokenSupply failed for {}: {}", mint, e);
                    None
                }
            },
        };

        Ok(quote_from_helius(price, supply, Utc::now()))
    }
}

fn price_per_token(token_info: &HeliusTokenInfo) -> Option<f64> {
    token_info
        .price_info
        .as_ref()
        .and_then(|info| info.price_per_token)
        .filter(|price| *price > 0.0)
}

/// Supply from the asset itself; needs both the raw amount and the decimals
fn asset_supply(token_info: &HeliusTokenInfo) -> Option<f64> {
    let raw = token_info.supply?;
    let decimals = token_info.decimals?;
    Some(scale_by_decimals(raw, decimals))
}

pub fn quote_from_helius(price: f64, supply: Option<f64>, at: DateTime<Utc>) -> Option<PriceQuote> {
    let market_cap = supply.filter(|s| *s > 0.0).map(|s| s * price);
    PriceQuote::new(price, market_cap, at)
}

#[async_trait]
impl PriceProvider for HeliusPriceProvider {
    fn scope(&self) -> ProviderScope {
        ProviderScope::HeliusSolana
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch_price(&self, mint: &str) -> ProviderOutcome {
        let outcome = ProviderOutcome::from(self.fetch(mint).await);
        if let ProviderOutcome::Failed(e) = &outcome {
            warn!("Helius price lookup failed for {}: {}", mint, e);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_info(json: &str) -> HeliusTokenInfo {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_asset_supply_needs_decimals() {
        let info = token_info(r#"{"supply": 5000000, "decimals": 6}"#);
        assert_eq!(asset_supply(&info), Some(5.0));

        let info = token_info(r#"{"supply": 5000000}"#);
        assert_eq!(asset_supply(&info), None);
    }

    #[test]
    fn test_price_per_token_ignores_zero() {
        let info = token_info(r#"{"price_info": {"price_per_token": 0}}"#);
        assert_eq!(price_per_token(&info), None);

        let info = token_info(r#"{"price_info": {"price_per_token": "1.25", "currency": "USDC"}}"#);
        assert_eq!(price_per_token(&info), Some(1.25));
    }

    #[test]
    fn test_quote_market_cap_from_supply() {
        let quote = quote_from_helius(2.0, Some(1_000.0), Utc::now()).unwrap();
        assert_eq!(quote.market_cap_usd(), Some(2_000.0));

        let quote = quote_from_helius(2.0, None, Utc::now()).unwrap();
        assert_eq!(quote.market_cap_usd(), None);
    }

    #[tokio::test]
    async fn test_missing_key_is_unconfigured() {
        let provider = HeliusPriceProvider::new(Client::new(), &PricingConfig::default());

        assert!(!provider.is_configured());
        assert!(matches!(
            provider
                .fetch_price("So11111111111111111111111111111111111111112")
                .await,
            ProviderOutcome::Failed(ProviderError::MissingCredentials)
        ));
    }
}
