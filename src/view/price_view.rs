use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::entity::{ChainPricePair, PriceError, PriceQuote, SelectedPrice};
use crate::utils::{format_usd, shorten_address};
use crate::view::console::Console;

pub const PRICE_UNAVAILABLE: &str = "price unavailable";

#[async_trait]
pub trait PriceView: Send + Sync {
    async fn display_loading(&self, subject: &str) -> Result<()>;
    async fn display_price(&self, address: &str, price: &SelectedPrice) -> Result<()>;
    async fn display_chain_prices(&self, address: &str, prices: &ChainPricePair) -> Result<()>;
    async fn display_batch(&self, prices: &HashMap<String, PriceQuote>) -> Result<()>;
    async fn display_error(&self, error: &PriceError) -> Result<()>;
}

pub struct ConsolePriceView {
    console: Arc<Console>,
}

impl ConsolePriceView {
    pub fn new(console: Arc<Console>) -> Self {
        Self { console }
    }
}

fn quote_line(label: &str, quote: Option<&PriceQuote>) -> String {
    match quote {
        Some(quote) => {
            let market_cap = quote
                .market_cap_usd()
                .map(format_usd)
                .unwrap_or_else(|| "n/a".to_string());
            format!(
                "{:<8}{} (market cap {})",
                label,
                format_usd(quote.price_usd()),
                market_cap
            )
        }
        None => format!("{:<8}{}", label, PRICE_UNAVAILABLE),
    }
}

#[async_trait]
impl PriceView for ConsolePriceView {
    async fn display_loading(&self, subject: &str) -> Result<()> {
        if self.console.is_json() {
            return Ok(());
        }
        self.console
            .line(format!("Getting price for {}...", shorten_address(subject)))
    }

    async fn display_price(&self, address: &str, price: &SelectedPrice) -> Result<()> {
        if self.console.is_json() {
            return if price.is_available() {
                self.console.json(price)
            } else {
                self.console
                    .json(&json!({ "address": address, "error": PRICE_UNAVAILABLE }))
            };
        }

        if !price.is_available() {
            return self
                .console
                .line(format!("{}: {}", shorten_address(address), PRICE_UNAVAILABLE));
        }

        let source = price
            .price_source
            .map(|chain| format!(" via {}", chain))
            .unwrap_or_default();
        self.console
            .line(format!("Price for {}{}", shorten_address(address), source))?;
        self.console.line(format!(
            "  Price:      {}",
            price
                .price_usd
                .map(format_usd)
                .unwrap_or_else(|| PRICE_UNAVAILABLE.to_string())
        ))?;
        self.console.line(format!(
            "  Market cap: {}",
            price
                .market_cap_usd
                .map(format_usd)
                .unwrap_or_else(|| "n/a".to_string())
        ))
    }

    async fn display_chain_prices(&self, address: &str, prices: &ChainPricePair) -> Result<()> {
        if self.console.is_json() {
            return self.console.json(prices);
        }

        self.console
            .line(format!("Prices for {}", shorten_address(address)))?;
        self.console
            .line(format!("  {}", quote_line("Base:", prices.base.as_ref())))?;
        self.console
            .line(format!("  {}", quote_line("Solana:", prices.solana.as_ref())))
    }

    async fn display_batch(&self, prices: &HashMap<String, PriceQuote>) -> Result<()> {
        // sorted for stable output
        let sorted: BTreeMap<_, _> = prices.iter().collect();

        if self.console.is_json() {
            return self.console.json(&sorted);
        }

        if sorted.is_empty() {
            return self.console.line("No prices resolved");
        }
        for (address, quote) in sorted {
            self.console
                .line(quote_line(&format!("{}:", shorten_address(address)), Some(quote)))?;
        }
        Ok(())
    }

    async fn display_error(&self, error: &PriceError) -> Result<()> {
        if self.console.is_json() {
            return self.console.json(&json!({
                "error": error.to_string(),
                "status": error.status_code(),
                "retryable": error.is_retryable(),
            }));
        }

        self.console.line(format!("❌ {}", error))
    }
}
