// src/indexer/models.rs
use crate::entity::{BridgeTransaction, BridgedToken};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: Value,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenData {
    #[serde(rename = "Token", default)]
    pub tokens: Vec<BridgedToken>,
}

#[derive(Debug, Deserialize)]
pub struct TransactionData {
    #[serde(rename = "BridgeTransaction", default)]
    pub transactions: Vec<BridgeTransaction>,
}

/// Result of a count query; the indexer has no aggregate, so ids are counted
#[derive(Debug, Deserialize)]
pub struct TransactionIds {
    #[serde(rename = "BridgeTransaction", default)]
    pub transactions: Vec<IdRow>,
}

#[derive(Debug, Deserialize)]
pub struct IdRow {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_errors_deserialize() {
        let response: GraphQlResponse<TokenData> = serde_json::from_str(
            r#"{"data": null, "errors": [{"message": "field 'foo' not found"}]}"#,
        )
        .unwrap();

        assert!(response.data.is_none());
        assert_eq!(response.errors.unwrap()[0].message, "field 'foo' not found");
    }

    #[test]
    fn test_transaction_data_deserialize() {
        let response: GraphQlResponse<TransactionData> = serde_json::from_str(
            r#"{"data": {"BridgeTransaction": [{
                "id": "tx-1",
                "transactionHash": "0xhash",
                "blockTimestamp": "1700000000",
                "tokenAddress": "0xabc",
                "direction": "BASE_TO_SOLANA",
                "amount": "1000",
                "fromAddress": "0xfrom",
                "toAddress": "So1ana"
            }]}}"#,
        )
        .unwrap();

        let transactions = response.data.unwrap().transactions;
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].transaction_hash, "0xhash");
    }
}
