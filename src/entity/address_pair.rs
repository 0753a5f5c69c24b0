use crate::address::{hex_to_base58, is_base58_address, is_hex_string, normalize_evm_address};
use crate::entity::PriceError;
use serde::{Deserialize, Serialize};

/// A token's addresses on both chains; at least one side is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressPair {
    evm_address: Option<String>,
    solana_address: Option<String>,
}

impl AddressPair {
    /// Validates both sides. The Solana side may be base58 or a `bytes32` hex value.
    pub fn new(evm_address: Option<&str>, solana_address: Option<&str>) -> Result<Self, PriceError> {
        let evm_address = match evm_address.map(str::trim).filter(|s| !s.is_empty()) {
            Some(address) => Some(normalize_evm_address(address).ok_or_else(|| {
                PriceError::InvalidAddressFormat(format!("{} is not an EVM address", address))
            })?),
            None => None,
        };

        let solana_address = match solana_address.map(str::trim).filter(|s| !s.is_empty()) {
            Some(address) if is_base58_address(address) || is_hex_string(address) => {
                Some(address.to_string())
            }
            Some(address) => {
                return Err(PriceError::InvalidAddressFormat(format!(
                    "{} is neither a base58 mint nor a bytes32 value",
                    address
                )))
            }
            None => None,
        };

        if evm_address.is_none() && solana_address.is_none() {
            return Err(PriceError::InvalidAddressFormat(
                "at least one address is required".to_string(),
            ));
        }

        Ok(Self {
            evm_address,
            solana_address,
        })
    }

    pub fn evm_address(&self) -> Option<&str> {
        self.evm_address.as_deref()
    }

    /// Solana address as supplied by the caller
    pub fn solana_address(&self) -> Option<&str> {
        self.solana_address.as_deref()
    }

    /// Solana address in base58, if the supplied value converts
    pub fn solana_mint(&self) -> Option<String> {
        self.solana_address.as_deref().and_then(hex_to_base58)
    }
}

/// One entry of a batch price request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAddresses {
    #[serde(rename = "baseAddress")]
    pub evm_address: String,
    #[serde(rename = "solanaAddress", default)]
    pub solana_address: Option<String>,
}

impl TokenAddresses {
    pub fn new(evm_address: impl Into<String>, solana_address: Option<String>) -> Self {
        Self {
            evm_address: evm_address.into(),
            solana_address,
        }
    }
}
