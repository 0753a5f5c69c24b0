use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use crate::entity::{BridgeTransaction, BridgedToken, PriceError, TokenTransactionsPage};
use crate::utils::{format_usd, shorten_address};
use crate::view::console::Console;
use crate::view::price_view::PRICE_UNAVAILABLE;

#[async_trait]
pub trait BridgeView: Send + Sync {
    async fn display_transactions(&self, transactions: &[BridgeTransaction]) -> Result<()>;
    async fn display_token_page(&self, page: &TokenTransactionsPage) -> Result<()>;
    async fn display_top_tokens(&self, tokens: &[BridgedToken]) -> Result<()>;
    async fn display_error(&self, error: &PriceError) -> Result<()>;
}

pub struct ConsoleBridgeView {
    console: Arc<Console>,
}

impl ConsoleBridgeView {
    pub fn new(console: Arc<Console>) -> Self {
        Self { console }
    }
}

fn transaction_line(tx: &BridgeTransaction) -> String {
    let when = tx
        .timestamp()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| tx.block_timestamp.clone());
    let symbol = tx.token_symbol.as_deref().unwrap_or("UNK");
    let amount = tx.amount_formatted.as_deref().unwrap_or(&tx.amount);

    format!(
        "{}  {:<15} {} {}  {} -> {}  {}",
        when,
        tx.direction.to_string(),
        amount,
        symbol,
        shorten_address(&tx.from_address),
        shorten_address(&tx.to_address),
        shorten_address(&tx.transaction_hash)
    )
}

fn token_line(rank: usize, token: &BridgedToken) -> String {
    let price = token
        .price_usd
        .map(format_usd)
        .unwrap_or_else(|| PRICE_UNAVAILABLE.to_string());
    let market_cap = token
        .market_cap_usd
        .map(format_usd)
        .unwrap_or_else(|| "n/a".to_string());

    format!(
        "{:>3}. {:<10} {}  price {}  mcap {}  bridges {}/{}",
        rank,
        token.display_name(),
        shorten_address(&token.address),
        price,
        market_cap,
        token.bridge_count_to_solana,
        token.bridge_count_from_solana
    )
}

#[async_trait]
impl BridgeView for ConsoleBridgeView {
    async fn display_transactions(&self, transactions: &[BridgeTransaction]) -> Result<()> {
        if self.console.is_json() {
            return self.console.json(transactions);
        }

        if transactions.is_empty() {
            return self.console.line("No bridge transactions found");
        }
        for tx in transactions {
            self.console.line(transaction_line(tx))?;
        }
        Ok(())
    }

    async fn display_token_page(&self, page: &TokenTransactionsPage) -> Result<()> {
        if self.console.is_json() {
            return self.console.json(page);
        }

        if let Some(token) = &page.token {
            self.console.line(format!(
                "{} ({})  to Solana: {}  from Solana: {}",
                token.display_name(),
                token.address,
                token.total_bridged_to_solana,
                token.total_bridged_from_solana
            ))?;
        }
        for tx in &page.data {
            self.console.line(transaction_line(tx))?;
        }
        self.console.line(format!(
            "Page {}/{} ({} transactions)",
            page.pagination.page, page.pagination.total_pages, page.pagination.total
        ))
    }

    async fn display_top_tokens(&self, tokens: &[BridgedToken]) -> Result<()> {
        if self.console.is_json() {
            return self.console.json(tokens);
        }

        if tokens.is_empty() {
            return self.console.line("No bridged tokens found");
        }
        for (index, token) in tokens.iter().enumerate() {
            self.console.line(token_line(index + 1, token))?;
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
