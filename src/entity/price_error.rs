/// Errors that cross the resolver boundary.
///
/// Upstream provider failures never show up here: they are absorbed into
/// negative cache entries. Only configuration, input and registry problems
/// are surfaced to the caller.
#[derive(Debug, thiserror::Error)]
pub enum PriceError {
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    #[error("Invalid address format: {0}")]
    InvalidAddressFormat(String),

    #[error("Token not found: {0}")]
    NotFound(String),

    #[error("Upstream unavailable: {0}")]
    Upstream(String),
}

impl PriceError {
    /// Whether retrying the same request later may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }

    /// HTTP-equivalent status for transport layers
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ConfigurationMissing(_) => 503,
            Self::InvalidAddressFormat(_) => 400,
            Self::NotFound(_) => 404,
            Self::Upstream(_) => 502,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_distinguish_error_kinds() {
        assert_eq!(
            PriceError::ConfigurationMissing("ENVIO_API_URL".into()).status_code(),
            503
        );
        assert_eq!(
            PriceError::InvalidAddressFormat("xyz".into()).status_code(),
            400
        );
        assert_eq!(PriceError::NotFound("0xabc".into()).status_code(), 404);
        assert_eq!(PriceError::Upstream("timeout".into()).status_code(), 502);
    }

    #[test]
    fn test_only_upstream_is_retryable() {
        assert!(PriceError::Upstream("503".into()).is_retryable());
        assert!(!PriceError::NotFound("0xabc".into()).is_retryable());
        assert!(!PriceError::ConfigurationMissing("key".into()).is_retryable());
    }
}
