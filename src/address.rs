//! Address codec for the two chains.
//!
//! EVM-side contracts store a Solana mint as a `bytes32` value, so the same
//! token shows up either as a base58 string or as a zero-padded 32-byte hex
//! string. Every function here is total: failures come back as `None`/`false`.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

/// Width of a Solana public key
pub const SOLANA_ADDRESS_BYTES: usize = 32;

lazy_static! {
    static ref EVM_ADDRESS_RE: Regex = Regex::new(r"^(0x|0X)?[0-9a-fA-F]{40}$").unwrap();
    static ref HEX_RE: Regex = Regex::new(r"^(0x|0X)?[0-9a-fA-F]+$").unwrap();
}

/// Shape of an arbitrary address string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    Solana,
    Evm,
}

/// True iff `address` is 32-44 characters of valid base58 decoding to exactly 32 bytes
pub fn is_base58_address(address: &str) -> bool {
    if address.len() < 32 || address.len() > 44 {
        return false;
    }

    match bs58::decode(address).into_vec() {
        Ok(bytes) => bytes.len() == SOLANA_ADDRESS_BYTES,
        Err(_) => false,
    }
}

/// True for a 20-byte hex address, with or without `0x`
pub fn is_evm_address(address: &str) -> bool {
    EVM_ADDRESS_RE.is_match(address)
}

/// True for a non-empty hex string, with or without `0x`
pub fn is_hex_string(value: &str) -> bool {
    HEX_RE.is_match(value)
}

/// Classify an address. Base58 wins over EVM so that a valid mint is never
/// mistaken for a hex value.
pub fn classify_address(address: &str) -> Option<AddressKind> {
    if is_base58_address(address) {
        Some(AddressKind::Solana)
    } else if is_evm_address(address) {
        Some(AddressKind::Evm)
    } else {
        None
    }
}

/// Lower-cased, `0x`-prefixed form of an EVM address
pub fn normalize_evm_address(address: &str) -> Option<String> {
    if !is_evm_address(address) {
        return None;
    }

    let hex = strip_hex_prefix(address);
    Some(format!("0x{}", hex.to_ascii_lowercase()))
}

/// Key under which an address is cached: base58 is case-sensitive and kept
/// verbatim, anything else is lower-cased.
pub fn address_key(address: &str) -> String {
    let trimmed = address.trim();
    if is_base58_address(trimmed) {
        trimmed.to_string()
    } else {
        trimmed.to_ascii_lowercase()
    }
}

/// Convert a `bytes32` hex value (or an already-encoded mint) to base58.
///
/// Values wider than 32 bytes keep their last 32 bytes; shorter values are
/// zero-padded at the front.
pub fn hex_to_base58(value: &str) -> Option<String> {
    if is_base58_address(value) {
        return Some(value.to_string());
    }

    let hex = strip_hex_prefix(value);
    if hex.is_empty() {
        debug!("Refusing to convert empty hex value to base58");
        return None;
    }

    let padded = if hex.len() % 2 == 0 {
        hex.to_string()
    } else {
        format!("0{}", hex)
    };

    let bytes = match hex::decode(&padded) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Failed to decode hex value {}: {}", value, e);
            return None;
        }
    };

    let mut word = [0u8; SOLANA_ADDRESS_BYTES];
    if bytes.len() >= SOLANA_ADDRESS_BYTES {
        word.copy_from_slice(&bytes[bytes.len() - SOLANA_ADDRESS_BYTES..]);
    } else {
        word[SOLANA_ADDRESS_BYTES - bytes.len()..].copy_from_slice(&bytes);
    }

    Some(bs58::encode(word).into_string())
}

/// Convert a base58 mint to its `0x`-prefixed, 64-character `bytes32` form
pub fn base58_to_bytes32(value: &str) -> Option<String> {
    let bytes = match bs58::decode(value).into_vec() {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Failed to decode base58 value {}: {}", value, e);
            return None;
        }
    };

    if bytes.len() != SOLANA_ADDRESS_BYTES {
        debug!(
            "Solana address length is {}, expected {}",
            bytes.len(),
            SOLANA_ADDRESS_BYTES
        );
        return None;
    }

    Some(format!("0x{:0>64}", hex::encode(bytes)))
}

fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
    const USDC_MINT_HEX: &str =
        "0xc6fa7af3bedbad3a3d65f36aabc97431b1bbe4c2d2f6e0e47ca60203452f5d61";
    const WSOL_MINT: &str = "So11111111111111111111111111111111111111112";
    const USDC_BASE: &str = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913";

    #[test]
    fn test_is_base58_address() {
        assert!(is_base58_address(USDC_MINT));
        assert!(is_base58_address(WSOL_MINT));
        assert!(is_base58_address("11111111111111111111111111111111"));
    }

    #[test]
    fn test_is_base58_address_rejects_wrong_shapes() {
        assert!(!is_base58_address(USDC_BASE));
        assert!(!is_base58_address("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"));
        assert!(!is_base58_address("EPjFWdd5AufqSSqeM2qN"));
        // right length, but only 28 bytes once decoded
        assert!(!is_base58_address("1111111111112q2Gg8TH19xwTZeyUCme313nZsTQ"));
        assert!(!is_base58_address("0OIl0OIl0OIl0OIl0OIl0OIl0OIl0OIl"));
    }

    #[test]
    fn test_hex_to_base58_known_mint() {
        assert_eq!(hex_to_base58(USDC_MINT_HEX).as_deref(), Some(USDC_MINT));
        assert_eq!(
            hex_to_base58(USDC_MINT_HEX.trim_start_matches("0x")).as_deref(),
            Some(USDC_MINT)
        );
    }

    #[test]
    fn test_hex_to_base58_is_idempotent_on_base58() {
        assert_eq!(hex_to_base58(USDC_MINT).as_deref(), Some(USDC_MINT));
        assert_eq!(hex_to_base58(WSOL_MINT).as_deref(), Some(WSOL_MINT));
    }

    #[test]
    fn test_hex_to_base58_truncates_wide_values_from_the_front() {
        let wide = format!("0x00ff{}", USDC_MINT_HEX.trim_start_matches("0x"));
        assert_eq!(hex_to_base58(&wide).as_deref(), Some(USDC_MINT));
    }

    #[test]
    fn test_hex_to_base58_left_pads_short_values() {
        assert_eq!(
            hex_to_base58("0x1").as_deref(),
            Some("11111111111111111111111111111112")
        );
        // a 20-byte EVM address lands in the low 20 bytes
        assert_eq!(
            hex_to_base58(USDC_BASE).as_deref(),
            Some("1111111111112q2Gg8TH19xwTZeyUCme313nZsTQ")
        );
    }

    #[test]
    fn test_hex_to_base58_rejects_garbage() {
        assert_eq!(hex_to_base58("0xzz"), None);
        assert_eq!(hex_to_base58("0x"), None);
        assert_eq!(hex_to_base58("not an address"), None);
    }

    #[test]
    fn test_base58_to_bytes32() {
        assert_eq!(base58_to_bytes32(USDC_MINT).as_deref(), Some(USDC_MINT_HEX));
        assert_eq!(
            base58_to_bytes32("11111111111111111111111111111111").as_deref(),
            Some("0x0000000000000000000000000000000000000000000000000000000000000000")
        );
        assert_eq!(base58_to_bytes32("2q2Gg8TH19xwTZeyUCme313nZsTQ"), None);
        assert_eq!(base58_to_bytes32("0OIl"), None);
    }

    #[test]
    fn test_round_trip() {
        for mint in [USDC_MINT, WSOL_MINT, "11111111111111111111111111111112"] {
            let hex = base58_to_bytes32(mint).unwrap();
            assert_eq!(hex_to_base58(&hex).as_deref(), Some(mint));
        }

        let hex = base58_to_bytes32(&hex_to_base58(USDC_MINT_HEX).unwrap()).unwrap();
        assert_eq!(hex, USDC_MINT_HEX);
    }

    #[test]
    fn test_classify_address() {
        assert_eq!(classify_address(USDC_MINT), Some(AddressKind::Solana));
        assert_eq!(classify_address(USDC_BASE), Some(AddressKind::Evm));
        assert_eq!(
            classify_address("833589fcd6edb6e08f4c7c32d4f71b54bda02913"),
            Some(AddressKind::Evm)
        );
        assert_eq!(classify_address("0x1234"), None);
        assert_eq!(classify_address(""), None);
    }

    #[test]
    fn test_normalize_evm_address() {
        assert_eq!(
            normalize_evm_address(USDC_BASE).as_deref(),
            Some("0x833589fcd6edb6e08f4c7c32d4f71b54bda02913")
        );
        assert_eq!(normalize_evm_address(USDC_MINT), None);
    }

    #[test]
    fn test_address_key_keeps_base58_case() {
        assert_eq!(address_key(USDC_MINT), USDC_MINT);
        assert_eq!(
            address_key(USDC_BASE),
            "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913"
        );
    }
}
