use serde::{Deserialize, Serialize};
use std::fmt;

/// The two chains a bridged token lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Base,
    Solana,
}

impl Chain {
    /// Platform identifier used by the generic price provider
    pub const fn platform_id(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Solana => "solana",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.platform_id())
    }
}

/// Cache namespace for one provider on one chain.
///
/// Two providers may disagree on the price of the same address, so every
/// provider/chain combination gets its own scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderScope {
    AlchemyBase,
    CoinGeckoBase,
    HeliusSolana,
    CoinGeckoSolana,
}

impl ProviderScope {
    pub const fn chain(&self) -> Chain {
        match self {
            Self::AlchemyBase | Self::CoinGeckoBase => Chain::Base,
            Self::HeliusSolana | Self::CoinGeckoSolana => Chain::Solana,
        }
    }

    /// Scope of the generic provider for a chain
    pub const fn generic(chain: Chain) -> Self {
        match chain {
            Chain::Base => Self::CoinGeckoBase,
            Chain::Solana => Self::CoinGeckoSolana,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AlchemyBase => "base-alchemy",
            Self::CoinGeckoBase => "base",
            Self::HeliusSolana => "solana-helius",
            Self::CoinGeckoSolana => "solana",
        }
    }
}

impl fmt::Display for ProviderScope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
