use crate::entity::{Chain, PriceQuote, ProviderScope};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

/// Why a provider call produced no quote
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("API key not configured")]
    MissingCredentials,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Typed result of one provider call.
///
/// Callers outside the pricing module only ever see `Option<PriceQuote>`;
/// the split between `NoPrice` and `Failed` exists for logging and tests.
#[derive(Debug)]
pub enum ProviderOutcome {
    Quote(PriceQuote),
    /// The provider answered but has no usable price for the address
    NoPrice,
    Failed(ProviderError),
}

impl ProviderOutcome {
    pub fn into_quote(self) -> Option<PriceQuote> {
        match self {
            Self::Quote(quote) => Some(quote),
            Self::NoPrice | Self::Failed(_) => None,
        }
    }
}

impl From<Result<Option<PriceQuote>, ProviderError>> for ProviderOutcome {
    fn from(result: Result<Option<PriceQuote>, ProviderError>) -> Self {
        match result {
            Ok(Some(quote)) => Self::Quote(quote),
            Ok(None) => Self::NoPrice,
            Err(e) => Self::Failed(e),
        }
    }
}

/// A single upstream price source for one chain
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Cache namespace this provider writes to
    fn scope(&self) -> ProviderScope;

    /// Providers that need credentials report `false` when they have none,
    /// letting the resolver skip them without a network call
    fn is_configured(&self) -> bool {
        true
    }

    /// Fetch a quote; never panics and never returns an error type
    async fn fetch_price(&self, address: &str) -> ProviderOutcome;
}

/// Upstream source that prices many addresses per call
#[async_trait]
pub trait BatchPriceSource: Send + Sync {
    /// Quotes keyed by [`crate::address::address_key`]. Addresses the
    /// provider does not know are absent from the map.
    async fn fetch_batch(
        &self,
        chain: Chain,
        addresses: &[String],
    ) -> Result<HashMap<String, PriceQuote>, ProviderError>;
}

/// HTTP client shared by all providers, with the per-call timeout applied
pub fn build_http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder().timeout(timeout).build()
}

/// Turn a non-2xx response into `ProviderError::Status`
pub(crate) fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(ProviderError::Status(response.status().as_u16()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_outcome_collapses_to_option() {
        let quote = PriceQuote::new(1.0, None, Utc::now()).unwrap();
        assert!(ProviderOutcome::Quote(quote).into_quote().is_some());
        assert!(ProviderOutcome::NoPrice.into_quote().is_none());
        assert!(ProviderOutcome::Failed(ProviderError::Status(500))
            .into_quote()
            .is_none());
    }

    #[test]
    fn test_outcome_from_result() {
        let outcome = ProviderOutcome::from(Ok(None));
        assert!(matches!(outcome, ProviderOutcome::NoPrice));

        let outcome = ProviderOutcome::from(Err(ProviderError::MissingCredentials));
        assert!(matches!(
            outcome,
            ProviderOutcome::Failed(ProviderError::MissingCredentials)
        ));
    }
}
