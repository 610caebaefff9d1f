//! # Hex Encoding/Decoding Utilities
//!
//! Thin wrappers around the `hex` crate used for key parsing, logging and
//! test frame construction. Whitespace is tolerated on decode so keys can be
//! pasted straight from meter-operator portals.

use crate::error::MeterError;

/// Encode bytes to a lowercase hex string.
pub fn encode_hex(data: &[u8]) -> String {
    hex::encode(data)
}

/// Decode a hex string to bytes.
///
/// Accepts both upper and lower case; whitespace is stripped first.
pub fn decode_hex(hex_str: &str) -> Result<Vec<u8>, MeterError> {
    let cleaned: String = hex_str.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() || cleaned.len() % 2 != 0 {
        return Err(MeterError::InvalidHexString);
    }
    hex::decode(&cleaned).map_err(|_| MeterError::InvalidHexString)
}

/// Helper for creating test data from hex strings.
///
/// Panics on invalid hex (intended for test code only).
pub fn hex_to_bytes(hex_str: &str) -> Vec<u8> {
    decode_hex(hex_str).expect("Invalid hex in test data")
}
