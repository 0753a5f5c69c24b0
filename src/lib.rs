//! Price resolution for tokens bridged between Base and Solana.
//!
//! Prices come from several upstream providers per chain, tried in order,
//! and are cached for a short TTL so repeated lookups stay cheap.
pub mod address;
pub mod commands;
pub mod di;
pub mod entity;
pub mod indexer;
pub mod interactor;
pub mod presenter;
pub mod pricing;
pub mod utils;
pub mod view;

// Re-export commonly used items
pub use di::ServiceContainer;
pub use entity::*;
pub use pricing::{BatchResolver, PriceResolver, PricingConfig};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
