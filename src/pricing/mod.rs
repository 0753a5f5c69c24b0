// src/pricing/mod.rs
pub mod alchemy;
pub mod batch;
pub mod cache;
pub mod coingecko;
pub mod config;
pub mod helius;
pub mod models;
pub mod provider;
pub mod resolver;

pub use alchemy::AlchemyPriceProvider;
pub use batch::BatchResolver;
pub use cache::{CacheLookup, Clock, ManualClock, PriceCache, SystemClock};
pub use coingecko::{CoinGeckoClient, CoinGeckoPriceProvider};
pub use config::PricingConfig;
pub use helius::HeliusPriceProvider;
pub use provider::{BatchPriceSource, PriceProvider, ProviderError, ProviderOutcome};
pub use resolver::{PriceResolver, ResolvedPrice};
