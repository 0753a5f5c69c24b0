use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_ALCHEMY_BASE_URL: &str = "https://base-mainnet.g.alchemy.com/v2";
pub const DEFAULT_COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_HELIUS_RPC_URL: &str = "https://mainnet.helius-rpc.com";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
/// Largest number of contract addresses the generic provider accepts per call
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Application configuration
#[derive(Debug, Clone)]
pub struct PricingConfig {
    /// Key for the EVM metadata+price provider; the provider is skipped without it
    pub alchemy_api_key: Option<String>,

    /// Alchemy endpoint for Base mainnet
    pub alchemy_base_url: String,

    /// Optional key for the generic provider, raises its rate limits
    pub coingecko_api_key: Option<String>,

    /// Generic provider base URL
    pub coingecko_api_url: String,

    /// Key for the Solana asset provider; the provider is skipped without it
    pub helius_api_key: Option<String>,

    /// Helius DAS/RPC endpoint
    pub helius_rpc_url: String,

    /// Indexer GraphQL endpoint
    pub envio_api_url: Option<String>,

    /// Freshness window for cached prices
    pub cache_ttl: Duration,

    /// Upper bound on every upstream HTTP call
    pub request_timeout: Duration,

    /// Addresses per batched price call
    pub batch_size: usize,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            alchemy_api_key: None,
            alchemy_base_url: DEFAULT_ALCHEMY_BASE_URL.to_string(),
            coingecko_api_key: None,
            coingecko_api_url: DEFAULT_COINGECKO_API_URL.to_string(),
            helius_api_key: None,
            helius_rpc_url: DEFAULT_HELIUS_RPC_URL.to_string(),
            envio_api_url: None,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Flat view of every recognised setting, as the `config` crate sees it
#[derive(Debug, Default, Deserialize)]
pub struct RawSettings {
    pub alchemy_api_key: Option<String>,
    pub alchemy_base_url: Option<String>,
    pub coingecko_api_key: Option<String>,
    pub coin_gecko_api_key: Option<String>,
    pub coingecko_api_url: Option<String>,
    pub helius_api_key: Option<String>,
    pub helius_rpc_url: Option<String>,
    pub envio_api_url: Option<String>,
    pub next_public_envio_api_url: Option<String>,
    pub price_cache_ttl_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub price_batch_size: Option<usize>,
}

impl PricingConfig {
    /// Load configuration from an optional `bridge-prices.toml` and the environment.
    /// Environment variables win over the file.
    pub fn from_env() -> Result<Self> {
        let raw = config::Config::builder()
            .add_source(config::File::with_name("bridge-prices").required(false))
            .add_source(config::Environment::default())
            .build()
            .context("Failed to read configuration sources")?
            .try_deserialize::<RawSettings>()
            .context("Failed to parse configuration")?;

        Ok(Self::from_settings(raw))
    }

    pub fn from_settings(raw: RawSettings) -> Self {
        let defaults = Self::default();

        Self {
            alchemy_api_key: non_empty(raw.alchemy_api_key),
            alchemy_base_url: non_empty_url(raw.alchemy_base_url)
                .unwrap_or(defaults.alchemy_base_url),
            coingecko_api_key: non_empty(raw.coin_gecko_api_key)
                .or_else(|| non_empty(raw.coingecko_api_key)),
            coingecko_api_url: non_empty_url(raw.coingecko_api_url)
                .unwrap_or(defaults.coingecko_api_url),
            helius_api_key: non_empty(raw.helius_api_key),
            helius_rpc_url: non_empty_url(raw.helius_rpc_url).unwrap_or(defaults.helius_rpc_url),
            envio_api_url: non_empty_url(raw.envio_api_url)
                .or_else(|| non_empty_url(raw.next_public_envio_api_url)),
            cache_ttl: raw
                .price_cache_ttl_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            request_timeout: raw
                .request_timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            batch_size: raw
                .price_batch_size
                .filter(|size| (1..=DEFAULT_BATCH_SIZE).contains(size))
                .unwrap_or(defaults.batch_size),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn non_empty_url(value: Option<String>) -> Option<String> {
    non_empty(value).map(|v| v.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PricingConfig::from_settings(RawSettings::default());

        assert_eq!(config.alchemy_api_key, None);
        assert_eq!(config.coingecko_api_url, DEFAULT_COINGECKO_API_URL);
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.batch_size, 100);
    }

    #[test]
    fn test_blank_keys_are_treated_as_missing() {
        let config = PricingConfig::from_settings(RawSettings {
            alchemy_api_key: Some("   ".to_string()),
            helius_api_key: Some(String::new()),
            ..RawSettings::default()
        });

        assert_eq!(config.alchemy_api_key, None);
        assert_eq!(config.helius_api_key, None);
    }

    #[test]
    fn test_aliases() {
        let config = PricingConfig::from_settings(RawSettings {
            coingecko_api_key: Some("fallback".to_string()),
            coin_gecko_api_key: Some("primary".to_string()),
            next_public_envio_api_url: Some("https://indexer.example/v1/graphql/".to_string()),
            ..RawSettings::default()
        });

        assert_eq!(config.coingecko_api_key.as_deref(), Some("primary"));
        assert_eq!(
            config.envio_api_url.as_deref(),
            Some("https://indexer.example/v1/graphql")
        );
    }

    #[test]
    fn test_batch_size_is_capped_by_provider_ceiling() {
        let config = PricingConfig::from_settings(RawSettings {
            price_batch_size: Some(500),
            request_timeout_secs: Some(0),
            ..RawSettings::default()
        });

        assert_eq!(config.batch_size, 100);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_zero_cache_ttl_falls_back_to_default() {
        let config = PricingConfig::from_settings(RawSettings {
            price_cache_ttl_secs: Some(0),
            ..RawSettings::default()
        });

        assert_eq!(config.cache_ttl, Duration::from_secs(DEFAULT_CACHE_TTL_SECS));
    }
}
