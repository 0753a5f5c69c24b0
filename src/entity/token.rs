use crate::entity::BridgeDirection;
use crate::utils::optional_string_or_float;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate bridge record for one token, as kept by the indexer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgedToken {
    #[serde(default)]
    pub id: String,
    pub address: String,
    #[serde(default)]
    pub solana_mint_address: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub decimals: Option<u8>,
    #[serde(default)]
    pub total_bridged_to_solana: String,
    #[serde(default)]
    pub total_bridged_from_solana: String,
    #[serde(default)]
    pub bridge_count_to_solana: u64,
    #[serde(default)]
    pub bridge_count_from_solana: u64,
    #[serde(default)]
    pub last_bridge_time: String,
    #[serde(rename = "marketCapUSD", default, with = "optional_string_or_float")]
    pub market_cap_usd: Option<f64>,
    #[serde(rename = "priceUSD", default, with = "optional_string_or_float")]
    pub price_usd: Option<f64>,
}

impl BridgedToken {
    pub fn display_name(&self) -> &str {
        self.symbol
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(&self.address)
    }
}

/// A single bridge transfer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeTransaction {
    pub id: String,
    pub transaction_hash: String,
    #[serde(default)]
    pub block_number: Option<String>,
    pub block_timestamp: String,
    pub token_address: String,
    #[serde(default)]
    pub token_name: Option<String>,
    #[serde(default)]
    pub token_symbol: Option<String>,
    #[serde(default)]
    pub decimals: Option<u8>,
    pub direction: BridgeDirection,
    pub amount: String,
    #[serde(default)]
    pub amount_formatted: Option<String>,
    pub from_address: String,
    pub to_address: String,
}

impl BridgeTransaction {
    /// Block time; the indexer reports unix seconds as a string
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.block_timestamp
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(u64::from(limit))
        };

        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// One page of a token's bridge history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenTransactionsPage {
    pub data: Vec<BridgeTransaction>,
    pub pagination: Pagination,
    pub token: Option<BridgedToken>,
}
