use crate::entity::{Chain, DirectionHint, PriceQuote};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Independent results for both chains; neither side borrows from the other.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChainPricePair {
    pub base: Option<PriceQuote>,
    pub solana: Option<PriceQuote>,
}

impl ChainPricePair {
    pub fn new(base: Option<PriceQuote>, solana: Option<PriceQuote>) -> Self {
        Self { base, solana }
    }

    /// Collapse both sides into one price, preferring the chain named by `hint`
    pub fn select(&self, hint: DirectionHint, at: DateTime<Utc>) -> SelectedPrice {
        let base = self.base.as_ref().map(PriceFields::from);
        let solana = self.solana.as_ref().map(PriceFields::from);

        if hint.prefers_solana() {
            SelectedPrice::select((Chain::Solana, solana), (Chain::Base, base), at)
        } else {
            SelectedPrice::select((Chain::Base, base), (Chain::Solana, solana), at)
        }
    }
}

/// The two fields that selection works on, each independently optional
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceFields {
    pub price_usd: Option<f64>,
    pub market_cap_usd: Option<f64>,
}

impl From<&PriceQuote> for PriceFields {
    fn from(quote: &PriceQuote) -> Self {
        Self {
            price_usd: Some(quote.price_usd()),
            market_cap_usd: quote.market_cap_usd(),
        }
    }
}

/// Single price handed to dashboard callers.
///
/// Price and market cap fall back field by field: the preferred chain's
/// market cap may be paired with the other chain's price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedPrice {
    #[serde(rename = "priceUSD")]
    pub price_usd: Option<f64>,
    #[serde(rename = "marketCapUSD")]
    pub market_cap_usd: Option<f64>,
    #[serde(rename = "lastUpdated", with = "chrono::serde::ts_milliseconds")]
    pub last_updated: DateTime<Utc>,
    #[serde(skip)]
    pub price_source: Option<Chain>,
}

impl SelectedPrice {
    pub fn select(
        preferred: (Chain, Option<PriceFields>),
        fallback: (Chain, Option<PriceFields>),
        at: DateTime<Utc>,
    ) -> Self {
        let (preferred_chain, preferred) = preferred;
        let (fallback_chain, fallback) = fallback;

        let preferred_price = preferred.and_then(|fields| fields.price_usd);
        let fallback_price = fallback.and_then(|fields| fields.price_usd);

        let (price_usd, price_source) = match (preferred_price, fallback_price) {
            (Some(price), _) => (Some(price), Some(preferred_chain)),
            (None, Some(price)) => (Some(price), Some(fallback_chain)),
            (None, None) => (None, None),
        };

        let market_cap_usd = preferred
            .and_then(|fields| fields.market_cap_usd)
            .or_else(|| fallback.and_then(|fields| fields.market_cap_usd));

        Self {
            price_usd,
            market_cap_usd,
            last_updated: at,
            price_source,
        }
    }

    pub fn is_available(&self) -> bool {
        self.price_usd.is_some() || self.market_cap_usd.is_some()
    }
}
