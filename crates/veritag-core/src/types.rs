//! Strong type definitions for veritag.
//!
//! All identifiers are newtypes to prevent misuse at compile time. Every
//! binary identifier serializes as a `0x`-prefixed lowercase hex string,
//! matching the scannable payload format.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::crypto::keccak256;

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s)
}

/// A 20-byte identity, derived from a secp256k1 public key as the last
/// 20 bytes of Keccak-256 over the uncompressed point (without the 0x04
/// prefix tag).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Convert to a `0x`-prefixed lowercase hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse from a hex string. The `0x` prefix is optional.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(strip_hex_prefix(s))?;
        if bytes.len() != 20 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// The zero address. Not a valid identity; used as a sentinel.
    pub const ZERO: Self = Self([0u8; 20]);

    /// True unless this is the zero sentinel.
    pub fn is_valid_identity(&self) -> bool {
        *self != Self::ZERO
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A 32-byte item identifier, computed as
/// Keccak-256(manufacturer address || unique_id).
///
/// Stable across ownership transfers: the manufacturer and the
/// manufacturer-assigned unique id never change for a registered item.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(pub [u8; 32]);

impl ItemId {
    /// Derive the identifier for an item.
    pub fn derive(manufacturer: &Address, unique_id: &str) -> Self {
        let mut input = Vec::with_capacity(20 + unique_id.len());
        input.extend_from_slice(&manufacturer.0);
        input.extend_from_slice(unique_id.as_bytes());
        Self(keccak256(&input))
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to a `0x`-prefixed hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse from a hex string. The `0x` prefix is optional.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(strip_hex_prefix(s))?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", &hex::encode(self.0)[..16])
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &hex::encode(self.0)[..16])
    }
}

impl AsRef<[u8]> for ItemId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for ItemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A 32-byte one-time ownership-transfer token.
///
/// Opaque: minted from CSPRNG entropy and never interpreted. The only
/// local validation is well-formedness (exactly 32 bytes / 64 hex
/// chars), applied before any submission.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransferCode(pub [u8; 32]);

impl TransferCode {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to a `0x`-prefixed hex string, the out-of-band form shown
    /// to the holder.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse and validate a token handed in out-of-band. The `0x` prefix
    /// is optional; anything that is not exactly 64 hex chars is rejected.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(strip_hex_prefix(s))?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for TransferCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never log full codes.
        write!(f, "TransferCode({}…)", &hex::encode(self.0)[..8])
    }
}

impl AsRef<[u8]> for TransferCode {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for TransferCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TransferCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_hex_roundtrip() {
        let addr = Address::from_bytes([0x42; 20]);
        let hex = addr.to_hex();
        assert!(hex.starts_with("0x"));
        assert_eq!(Address::from_hex(&hex).unwrap(), addr);
        // Prefix is optional on parse.
        assert_eq!(Address::from_hex(&hex[2..]).unwrap(), addr);
    }

    #[test]
    fn test_address_bad_length_rejected() {
        assert!(Address::from_hex("0x1234").is_err());
        assert!(Address::from_hex("not hex at all").is_err());
    }

    #[test]
    fn test_zero_address_is_not_an_identity() {
        assert!(!Address::ZERO.is_valid_identity());
        assert!(Address::from_bytes([0x01; 20]).is_valid_identity());
    }

    #[test]
    fn test_item_id_derivation_deterministic() {
        let mfr = Address::from_bytes([0xaa; 20]);
        let a = ItemId::derive(&mfr, "W-1");
        let b = ItemId::derive(&mfr, "W-1");
        assert_eq!(a, b);

        let c = ItemId::derive(&mfr, "W-2");
        assert_ne!(a, c);

        let other = Address::from_bytes([0xbb; 20]);
        assert_ne!(a, ItemId::derive(&other, "W-1"));
    }

    #[test]
    fn test_transfer_code_well_formedness() {
        let code = TransferCode::from_bytes([0xcd; 32]);
        let hex = code.to_hex();
        assert_eq!(hex.len(), 66);
        assert_eq!(TransferCode::from_hex(&hex).unwrap(), code);

        // Truncated or over-long tokens are rejected locally.
        assert!(TransferCode::from_hex(&hex[..64]).is_err());
        assert!(TransferCode::from_hex(&format!("{hex}ff")).is_err());
    }

    #[test]
    fn test_address_json_is_hex_string() {
        let addr = Address::from_bytes([0xab; 20]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", addr.to_hex()));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
