// src/pricing/models.rs
use crate::utils::optional_string_or_float;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub const JSONRPC_VERSION: &str = "2.0";

// JSON-RPC envelope shared by Alchemy and Helius
#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<P: Serialize> {
    pub jsonrpc: &'static str,
    pub id: &'static str,
    pub method: &'static str,
    pub params: P,
}

impl<P: Serialize> JsonRpcRequest<P> {
    pub fn new(id: &'static str, method: &'static str, params: P) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method,
            params,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
}

// Alchemy
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlchemyTokenMetadata {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<u32>,
    pub total_supply: Option<String>,
    pub logo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AlchemyPricesResponse {
    #[serde(default)]
    pub prices: Vec<AlchemyPrice>,
    pub error: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlchemyPrice {
    pub symbol: Option<String>,
    #[serde(default, with = "optional_string_or_float")]
    pub price: Option<f64>,
    #[serde(default, with = "optional_string_or_float")]
    pub market_cap: Option<f64>,
}

// CoinGecko `simple/token_price/{platform}`: keyed by contract address
pub type CoinGeckoTokenPrices = HashMap<String, CoinGeckoTokenPrice>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoinGeckoTokenPrice {
    #[serde(default, with = "optional_string_or_float")]
    pub usd: Option<f64>,
    #[serde(default, with = "optional_string_or_float")]
    pub usd_market_cap: Option<f64>,
}

// Helius DAS `getAsset`
#[derive(Debug, Serialize)]
pub struct GetAssetParams<'a> {
    pub id: &'a str,
    #[serde(rename = "displayOptions")]
    pub display_options: DisplayOptions,
}

#[derive(Debug, Serialize)]
pub struct DisplayOptions {
    #[serde(rename = "showFungible")]
    pub show_fungible: bool,
}

#[derive(Debug, Deserialize)]
pub struct HeliusAsset {
    pub token_info: Option<HeliusTokenInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeliusTokenInfo {
    pub symbol: Option<String>,
    #[serde(default, with = "optional_string_or_float")]
    pub supply: Option<f64>,
    pub decimals: Option<u32>,
    pub price_info: Option<HeliusPriceInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeliusPriceInfo {
    #[serde(default, with = "optional_string_or_float")]
    pub price_per_token: Option<f64>,
    pub currency: Option<String>,
}

// Solana RPC `getTokenSupply`
#[derive(Debug, Deserialize)]
pub struct TokenSupplyResult {
    pub value: Option<TokenSupplyValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSupplyValue {
    pub ui_amount: Option<f64>,
    pub amount: Option<String>,
    pub decimals: Option<u32>,
}

impl TokenSupplyValue {
    /// Human-readable supply, preferring the node's own decimal adjustment
    pub fn ui_supply(&self) -> Option<f64> {
        if let Some(ui_amount) = self.ui_amount {
            return Some(ui_amount);
        }

        let raw = self.amount.as_deref().and_then(parse_raw_amount)?;
        Some(scale_by_decimals(raw, self.decimals.unwrap_or(0)))
    }
}

/// Parse an integer token amount sent as a decimal or `0x` hex string
pub fn parse_raw_amount(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(hex) = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        if hex.is_empty() {
            return None;
        }
        // Folding digit by digit keeps supplies wider than u128 representable
        return hex.chars().try_fold(0f64, |acc, c| {
            c.to_digit(16).map(|digit| acc * 16.0 + f64::from(digit))
        });
    }

    value
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
}

/// Convert a raw on-chain amount into whole tokens
pub fn scale_by_decimals(raw: f64, decimals: u32) -> f64 {
    raw / 10f64.powi(decimals as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_raw_amount() {
        assert_eq!(parse_raw_amount("1000000"), Some(1_000_000.0));
        assert_eq!(parse_raw_amount("0x0f4240"), Some(1_000_000.0));
        assert_eq!(parse_raw_amount("0x"), None);
        assert_eq!(parse_raw_amount("abc"), None);
        assert_eq!(parse_raw_amount("-5"), None);
        assert_eq!(parse_raw_amount(""), None);
    }

    #[test]
    fn test_scale_by_decimals() {
        assert_eq!(scale_by_decimals(1_500_000.0, 6), 1.5);
        assert_eq!(scale_by_decimals(42.0, 0), 42.0);
    }

    #[test]
    fn test_token_supply_prefers_ui_amount() {
        let value: TokenSupplyValue =
            serde_json::from_str(r#"{"uiAmount": 12.5, "amount": "999", "decimals": 2}"#).unwrap();
        assert_eq!(value.ui_supply(), Some(12.5));

        let value: TokenSupplyValue =
            serde_json::from_str(r#"{"uiAmount": null, "amount": "1250", "decimals": 2}"#)
                .unwrap();
        assert_eq!(value.ui_supply(), Some(12.5));
    }

    #[test]
    fn test_get_asset_request_shape() {
        let request = JsonRpcRequest::new(
            "1",
            "getAsset",
            GetAssetParams {
                id: "So11111111111111111111111111111111111111112",
                display_options: DisplayOptions {
                    show_fungible: true,
                },
            },
        );
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["method"], "getAsset");
        assert_eq!(json["params"]["displayOptions"]["showFungible"], true);
    }

    #[test]
    fn test_helius_asset_with_string_supply() {
        let asset: HeliusAsset = serde_json::from_str(
            r#"{"token_info": {"symbol": "TKN", "supply": "1000000000", "decimals": 6,
                "price_info": {"price_per_token": 0.5, "currency": "USDC"}}}"#,
        )
        .unwrap();
        let info = asset.token_info.unwrap();

        assert_eq!(info.supply, Some(1_000_000_000.0));
        assert_eq!(info.price_info.unwrap().price_per_token, Some(0.5));
    }
}
