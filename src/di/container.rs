use anyhow::{Context, Result};
use log::{info, warn};
use std::sync::Arc;

use crate::entity::Chain;
use crate::indexer::{BridgeIndexer, EnvioClient, TokenRegistry};
use crate::interactor::bridge_interactor::BridgeInteractorImpl;
use crate::interactor::price_interactor::PriceInteractorImpl;
use crate::pricing::provider::build_http_client;
use crate::pricing::{
    AlchemyPriceProvider, BatchPriceSource, BatchResolver, CoinGeckoClient,
    CoinGeckoPriceProvider, HeliusPriceProvider, PriceCache, PriceProvider, PriceResolver,
    PricingConfig,
};

/// ServiceContainer provides access to core application dependencies
pub struct ServiceContainer {
    // Shared state
    cache: Arc<PriceCache>,

    // Resolvers
    resolver: Arc<PriceResolver>,
    batch_resolver: Arc<BatchResolver>,

    // Interactors
    price_interactor: Arc<PriceInteractorImpl>,
    bridge_interactor: Arc<BridgeInteractorImpl>,

    // Configuration
    config: PricingConfig,
}

impl ServiceContainer {
    /// Wire providers, cache, resolvers and interactors from configuration
    pub fn new(config: PricingConfig) -> Result<Self> {
        let http_client =
            build_http_client(config.request_timeout).context("Failed to build HTTP client")?;

        let cache = Arc::new(PriceCache::with_ttl(config.cache_ttl));

        // Providers, in fallback order per chain
        let coingecko = Arc::new(CoinGeckoClient::new(http_client.clone(), &config));
        let base_providers: Vec<Arc<dyn PriceProvider>> = vec![
            Arc::new(AlchemyPriceProvider::new(http_client.clone(), &config)),
            Arc::new(CoinGeckoPriceProvider::new(coingecko.clone(), Chain::Base)),
        ];
        let solana_providers: Vec<Arc<dyn PriceProvider>> = vec![
            Arc::new(HeliusPriceProvider::new(http_client.clone(), &config)),
            Arc::new(CoinGeckoPriceProvider::new(coingecko.clone(), Chain::Solana)),
        ];

        if config.alchemy_api_key.is_none() {
            warn!("ALCHEMY_API_KEY is not set, Base prices come from CoinGecko only");
        }
        if config.helius_api_key.is_none() {
            warn!("HELIUS_API_KEY is not set, Solana prices come from CoinGecko only");
        }

        let envio = config
            .envio_api_url
            .as_ref()
            .map(|url| Arc::new(EnvioClient::new(http_client.clone(), url.clone())));

        let mut resolver = PriceResolver::new(cache.clone(), base_providers, solana_providers);
        let indexer: Option<Arc<dyn BridgeIndexer>> = match envio {
            Some(envio) => {
                info!("Using bridge indexer at {}", envio.api_url());
                let registry: Arc<dyn TokenRegistry> = envio.clone();
                resolver = resolver.with_registry(registry);
                Some(envio as Arc<dyn BridgeIndexer>)
            }
            None => {
                warn!("ENVIO_API_URL is not set, address lookups and bridge history are disabled");
                None
            }
        };
        let resolver = Arc::new(resolver);

        let batch_source: Arc<dyn BatchPriceSource> = coingecko;
        let batch_resolver = Arc::new(BatchResolver::new(
            cache.clone(),
            batch_source,
            config.batch_size,
        ));

        let price_interactor = Arc::new(PriceInteractorImpl::new(
            resolver.clone(),
            batch_resolver.clone(),
        ));
        let bridge_interactor = Arc::new(BridgeInteractorImpl::new(
            indexer,
            batch_resolver.clone(),
        ));

        Ok(Self {
            cache,
            resolver,
            batch_resolver,
            price_interactor,
            bridge_interactor,
            config,
        })
    }

    pub fn cache(&self) -> Arc<PriceCache> {
        self.cache.clone()
    }

    pub fn resolver(&self) -> Arc<PriceResolver> {
        self.resolver.clone()
    }

    pub fn batch_resolver(&self) -> Arc<BatchResolver> {
        self.batch_resolver.clone()
    }

    pub fn price_interactor(&self) -> Arc<PriceInteractorImpl> {
        self.price_interactor.clone()
    }

    pub fn bridge_interactor(&self) -> Arc<BridgeInteractorImpl> {
        self.bridge_interactor.clone()
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }
}
