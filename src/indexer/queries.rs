//! GraphQL documents sent to the indexer.
//!
//! Direction filters are GraphQL enum literals and can't be passed as
//! variables of type `String`, so they are spliced into the document.

use crate::entity::{BridgeDirection, BridgedToken};
use std::cmp::Ordering;

const TOKEN_FIELDS: &str = "
        id
        address
        name
        symbol
        decimals
        solanaMintAddress
        totalBridgedToSolana
        totalBridgedFromSolana
        bridgeCountToSolana
        bridgeCountFromSolana
        lastBridgeTime
        marketCapUSD
        priceUSD";

const TRANSACTION_FIELDS: &str = "
        id
        transactionHash
        blockNumber
        blockTimestamp
        tokenAddress
        tokenName
        tokenSymbol
        decimals
        direction
        amount
        amountFormatted
        fromAddress
        toAddress";

pub fn token_by_address_query() -> String {
    format!(
        "query GetTokenByBase($tokenAddress: String!) {{
      Token(where: {{ address: {{ _eq: $tokenAddress }} }}, limit: 1) {{{}
      }}
    }}",
        TOKEN_FIELDS
    )
}

/// Matches any of the given mint spellings (base58 and bytes32 hex)
pub fn token_by_solana_mint_query() -> String {
    format!(
        "query GetTokenBySolana($mints: [String!]!) {{
      Token(where: {{ solanaMintAddress: {{ _in: $mints }} }}, limit: 1) {{{}
      }}
    }}",
        TOKEN_FIELDS
    )
}

pub fn latest_transactions_query(direction: Option<BridgeDirection>) -> String {
    let where_clause = direction
        .map(|d| format!("\n        where: {{ direction: {{ _eq: {} }} }}", d.as_graphql()))
        .unwrap_or_default();

    format!(
        "query GetLatestBridgeTransactions($limit: Int!) {{
      BridgeTransaction(
        order_by: {{ blockTimestamp: desc }}
        limit: $limit{}
      ) {{{}
      }}
    }}",
        where_clause, TRANSACTION_FIELDS
    )
}

pub fn token_transactions_query() -> String {
    format!(
        "query GetTokenBridgeTransactions($tokenAddress: String!, $limit: Int!, $offset: Int!) {{
      BridgeTransaction(
        where: {{ tokenAddress: {{ _eq: $tokenAddress }} }}
        order_by: {{ blockTimestamp: desc }}
        limit: $limit
        offset: $offset
      ) {{{}
      }}
    }}",
        TRANSACTION_FIELDS
    )
}

pub fn token_transaction_count_query() -> &'static str {
    "query GetTokenBridgeTransactionCount($tokenAddress: String!) {
      BridgeTransaction(where: { tokenAddress: { _eq: $tokenAddress } }) {
        id
      }
    }"
}

/// Tokens with bridge activity in the given direction, or in either direction
pub fn top_tokens_query(direction: Option<BridgeDirection>) -> String {
    let where_clause = match direction {
        Some(BridgeDirection::SolanaToBase) => {
            "where: { totalBridgedFromSolana: { _gt: \"0\" } }".to_string()
        }
        Some(BridgeDirection::BaseToSolana) => {
            "where: { totalBridgedToSolana: { _gt: \"0\" } }".to_string()
        }
        None => "where: { _or: [{ totalBridgedToSolana: { _gt: \"0\" } }, { totalBridgedFromSolana: { _gt: \"0\" } }] }".to_string(),
    };

    format!(
        "query GetTopBridgedTokens($limit: Int!) {{
      Token(
        {}
        limit: $limit
      ) {{{}
      }}
    }}",
        where_clause, TOKEN_FIELDS
    )
}

/// Descending by market cap; tokens without one go last
pub fn compare_market_cap(a: Option<f64>, b: Option<f64>) -> Ordering {
    let key = |cap: Option<f64>| cap.filter(|c| !c.is_nan()).unwrap_or(f64::NEG_INFINITY);
    key(b).total_cmp(&key(a))
}

pub fn sort_by_market_cap(tokens: &mut [BridgedToken]) {
    tokens.sort_by(|a, b| compare_market_cap(a.market_cap_usd, b.market_cap_usd));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(address: &str, market_cap_usd: Option<f64>) -> BridgedToken {
        serde_json::from_value(serde_json::json!({
            "address": address,
            "marketCapUSD": market_cap_usd,
        }))
        .unwrap()
    }

    #[test]
    fn test_latest_query_direction_filter() {
        let query = latest_transactions_query(Some(BridgeDirection::SolanaToBase));
        assert!(query.contains("direction: { _eq: SOLANA_TO_BASE }"));

        let query = latest_transactions_query(None);
        assert!(!query.contains("direction: {"));
        assert!(query.contains("order_by: { blockTimestamp: desc }"));
    }

    #[test]
    fn test_top_tokens_query_filters() {
        assert!(top_tokens_query(Some(BridgeDirection::BaseToSolana))
            .contains("totalBridgedToSolana: { _gt: \"0\" }"));
        assert!(top_tokens_query(None).contains("_or:"));
    }

    #[test]
    fn test_sort_puts_missing_market_caps_last() {
        let mut tokens = vec![
            token("0x1", None),
            token("0x2", Some(10.0)),
            token("0x3", Some(f64::NAN)),
            token("0x4", Some(500.0)),
        ];

        sort_by_market_cap(&mut tokens);

        let order: Vec<_> = tokens.iter().map(|t| t.address.as_str()).collect();
        assert_eq!(&order[..2], &["0x4", "0x2"]);
    }
}
