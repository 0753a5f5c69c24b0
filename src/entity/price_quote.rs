use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A successful price observation from one upstream provider.
///
/// Quotes are never mutated; a newer observation replaces the old one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    #[serde(rename = "priceUSD")]
    price_usd: f64,
    #[serde(rename = "marketCapUSD")]
    market_cap_usd: Option<f64>,
    #[serde(rename = "lastUpdated", with = "chrono::serde::ts_milliseconds")]
    observed_at: DateTime<Utc>,
}

impl PriceQuote {
    /// Returns `None` unless the price is a positive finite number.
    /// A negative or non-finite market cap is dropped rather than rejecting the quote.
    pub fn new(
        price_usd: f64,
        market_cap_usd: Option<f64>,
        observed_at: DateTime<Utc>,
    ) -> Option<Self> {
        if !price_usd.is_finite() || price_usd <= 0.0 {
            return None;
        }

        let market_cap_usd = market_cap_usd.filter(|cap| cap.is_finite() && *cap >= 0.0);

        Some(Self {
            price_usd,
            market_cap_usd,
            observed_at,
        })
    }

    pub fn price_usd(&self) -> f64 {
        self.price_usd
    }

    pub fn market_cap_usd(&self) -> Option<f64> {
        self.market_cap_usd
    }

    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_price() {
        assert!(PriceQuote::new(0.0, Some(10.0), Utc::now()).is_none());
        assert!(PriceQuote::new(-1.5, None, Utc::now()).is_none());
        assert!(PriceQuote::new(f64::NAN, None, Utc::now()).is_none());
    }

    #[test]
    fn test_drops_invalid_market_cap() {
        let quote = PriceQuote::new(1.25, Some(-3.0), Utc::now()).unwrap();
        assert_eq!(quote.price_usd(), 1.25);
        assert_eq!(quote.market_cap_usd(), None);
    }

    #[test]
    fn test_serializes_with_dashboard_field_names() {
        let at = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let quote = PriceQuote::new(2.0, Some(50.0), at).unwrap();
        let json = serde_json::to_value(&quote).unwrap();

        assert_eq!(json["priceUSD"], 2.0);
        assert_eq!(json["marketCapUSD"], 50.0);
        assert_eq!(json["lastUpdated"], 1_700_000_000_000i64);
    }
}
