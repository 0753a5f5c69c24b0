use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which chain's price to prefer when a caller wants a single number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DirectionHint {
    SourceIsSolana,
    SourceIsEvm,
    #[default]
    None,
}

impl DirectionHint {
    /// Solana is preferred only when the bridge source is Solana
    pub fn prefers_solana(&self) -> bool {
        matches!(self, Self::SourceIsSolana)
    }
}

impl From<BridgeDirection> for DirectionHint {
    fn from(direction: BridgeDirection) -> Self {
        match direction {
            BridgeDirection::SolanaToBase => Self::SourceIsSolana,
            BridgeDirection::BaseToSolana => Self::SourceIsEvm,
        }
    }
}

/// Direction of a bridge transfer as recorded by the indexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BridgeDirection {
    SolanaToBase,
    BaseToSolana,
}

impl BridgeDirection {
    /// GraphQL enum literal
    pub const fn as_graphql(&self) -> &'static str {
        match self {
            Self::SolanaToBase => "SOLANA_TO_BASE",
            Self::BaseToSolana => "BASE_TO_SOLANA",
        }
    }
}

impl FromStr for BridgeDirection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solana-to-base" | "solana_to_base" => Ok(Self::SolanaToBase),
            "base-to-solana" | "base_to_solana" => Ok(Self::BaseToSolana),
            _ => Err(anyhow!("Parse BridgeDirection error: Invalid value '{}'", s)),
        }
    }
}

impl fmt::Display for BridgeDirection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::SolanaToBase => write!(f, "solana-to-base"),
            Self::BaseToSolana => write!(f, "base-to-solana"),
        }
    }
}
