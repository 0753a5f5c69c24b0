use async_trait::async_trait;
use log::{error, info, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::address::{
    base58_to_bytes32, hex_to_base58, is_base58_address, normalize_evm_address,
};
use crate::entity::{
    BridgeDirection, BridgeTransaction, BridgedToken, Pagination, PriceError,
    TokenTransactionsPage,
};
use crate::indexer::models::{
    GraphQlRequest, GraphQlResponse, TokenData, TransactionData, TransactionIds,
};
use crate::indexer::queries;

/// Top-token queries over-fetch so that re-sorting by market cap still fills the page
const TOP_TOKENS_OVERFETCH: u32 = 5;

/// Lookup of a token's paired address on the other chain
#[async_trait]
pub trait TokenRegistry: Send + Sync {
    async fn find_by_evm_address(
        &self,
        address: &str,
    ) -> Result<Option<BridgedToken>, PriceError>;

    /// `mint` may be base58 or bytes32 hex
    async fn find_by_solana_mint(&self, mint: &str) -> Result<Option<BridgedToken>, PriceError>;
}

/// Bridge activity queries
#[async_trait]
pub trait BridgeIndexer: Send + Sync {
    /// Most recent transfers, newest first
    async fn latest_transactions(
        &self,
        limit: u32,
        direction: Option<BridgeDirection>,
    ) -> Result<Vec<BridgeTransaction>, PriceError>;

    /// One page of a token's transfers together with the token record
    async fn token_transactions(
        &self,
        token_address: &str,
        page: u32,
        limit: u32,
    ) -> Result<TokenTransactionsPage, PriceError>;

    /// Tokens with bridge activity, highest indexer market cap first
    async fn top_tokens(
        &self,
        limit: u32,
        direction: Option<BridgeDirection>,
    ) -> Result<Vec<BridgedToken>, PriceError>;
}

/// Client for the Envio bridge indexer
pub struct EnvioClient {
    http_client: Client,
    api_url: String,
}

impl EnvioClient {
    pub fn new(http_client: Client, api_url: impl Into<String>) -> Self {
        Self {
            http_client,
            api_url: api_url.into(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, PriceError> {
        let request = GraphQlRequest { query, variables };

        let response = self
            .http_client
            .post(&self.api_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Envio request failed: {}", e);
                PriceError::Upstream(format!("indexer request failed: {}", e))
            })?;

        if !response.status().is_success() {
            error!("Envio API error: {}", response.status());
            return Err(PriceError::Upstream(format!(
                "indexer returned {}",
                response.status()
            )));
        }

        let body: GraphQlResponse<T> = response
            .json()
            .await
            .map_err(|e| PriceError::Upstream(format!("malformed indexer response: {}", e)))?;

        parse_graphql(body)
    }

    async fn first_token(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<Option<BridgedToken>, PriceError> {
        let data: TokenData = self.query(query, variables).await?;
        Ok(data.tokens.into_iter().next())
    }
}

/// Unwrap a GraphQL envelope; an `errors` array wins over partial data
pub fn parse_graphql<T>(body: GraphQlResponse<T>) -> Result<T, PriceError> {
    if let Some(errors) = body.errors.filter(|errors| !errors.is_empty()) {
        let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
        warn!("Envio GraphQL errors: {:?}", messages);
        return Err(PriceError::Upstream(format!(
            "GraphQL errors: {}",
            messages.join("; ")
        )));
    }

    body.data
        .ok_or_else(|| PriceError::Upstream("indexer response has no data".to_string()))
}

/// Every spelling of a mint the indexer may have stored
pub fn mint_spellings(mint: &str) -> Vec<String> {
    let mint = mint.trim();
    let mut spellings = vec![mint.to_string()];

    if is_base58_address(mint) {
        if let Some(hex) = base58_to_bytes32(mint) {
            spellings.push(hex);
        }
    } else {
        spellings.push(mint.to_ascii_lowercase());
        if let Some(base58) = hex_to_base58(mint) {
            spellings.push(base58);
        }
    }

    spellings.dedup();
    spellings
}

#[async_trait]
impl BridgeIndexer for EnvioClient {
    async fn latest_transactions(
        &self,
        limit: u32,
        direction: Option<BridgeDirection>,
    ) -> Result<Vec<BridgeTransaction>, PriceError> {
        info!("Fetching {} latest bridge transactions", limit);

        let query = queries::latest_transactions_query(direction);
        let data: TransactionData = self.query(&query, json!({ "limit": limit })).await?;

        Ok(data.transactions)
    }

    async fn token_transactions(
        &self,
        token_address: &str,
        page: u32,
        limit: u32,
    ) -> Result<TokenTransactionsPage, PriceError> {
        let token_address = normalize_evm_address(token_address).ok_or_else(|| {
            PriceError::InvalidAddressFormat(format!("{} is not an EVM address", token_address))
        })?;
        let page = page.max(1);
        let offset = (page - 1).saturating_mul(limit);

        info!(
            "Fetching bridge history for {} (page {}, limit {})",
            token_address, page, limit
        );

        let token_query = queries::token_by_address_query();
        let transactions_query = queries::token_transactions_query();

        let (token, ids, transactions) = tokio::try_join!(
            self.first_token(&token_query, json!({ "tokenAddress": token_address })),
            self.query::<TransactionIds>(
                queries::token_transaction_count_query(),
                json!({ "tokenAddress": token_address }),
            ),
            self.query::<TransactionData>(
                &transactions_query,
                json!({ "tokenAddress": token_address, "limit": limit, "offset": offset }),
            ),
        )?;

        Ok(TokenTransactionsPage {
            data: transactions.transactions,
            pagination: Pagination::new(page, limit, ids.transactions.len() as u64),
            token,
        })
    }

    async fn top_tokens(
        &self,
        limit: u32,
        direction: Option<BridgeDirection>,
    ) -> Result<Vec<BridgedToken>, PriceError> {
        info!("Fetching top {} bridged tokens", limit);

        let query = queries::top_tokens_query(direction);
        let fetch_limit = limit.saturating_mul(TOP_TOKENS_OVERFETCH);
        let data: TokenData = self.query(&query, json!({ "limit": fetch_limit })).await?;

        let mut tokens = data.tokens;
        queries::sort_by_market_cap(&mut tokens);
        tokens.truncate(limit as usize);

        Ok(tokens)
    }
}

#[async_trait]
impl TokenRegistry for EnvioClient {
    async fn find_by_evm_address(
        &self,
        address: &str,
    ) -> Result<Option<BridgedToken>, PriceError> {
        let address = normalize_evm_address(address).ok_or_else(|| {
            PriceError::InvalidAddressFormat(format!("{} is not an EVM address", address))
        })?;
        info!("Looking up token {} in the indexer", address);

        self.first_token(
            &queries::token_by_address_query(),
            json!({ "tokenAddress": address }),
        )
        .await
    }

    async fn find_by_solana_mint(&self, mint: &str) -> Result<Option<BridgedToken>, PriceError> {
        info!("Looking up Solana mint {} in the indexer", mint);

        self.first_token(
            &queries::token_by_solana_mint_query(),
            json!({ "mints": mint_spellings(mint) }),
        )
        .await
    }
}
