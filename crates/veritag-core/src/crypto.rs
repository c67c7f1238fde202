//! Cryptographic primitives: Keccak-256 hashing and secp256k1 recoverable
//! signatures.
//!
//! The protocol hinges on public-key recovery: a verifier derives the
//! signing identity from `(digest, signature)` alone, with no key
//! distribution step. That fixes the curve (secp256k1) and the hash
//! (Keccak-256), and the identity form (20-byte address).

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt;

use crate::error::{CryptoError, SignerError};
use crate::types::Address;

/// Compute the Keccak-256 digest of the given data.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// A 32-byte Keccak-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Keccak256Hash(pub [u8; 32]);

impl Keccak256Hash {
    /// Hash the given data.
    pub fn hash(data: &[u8]) -> Self {
        Self(keccak256(data))
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
        let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for Keccak256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keccak256({})", &hex::encode(self.0)[..16])
    }
}

impl AsRef<[u8]> for Keccak256Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Keccak256Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Keccak256Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Keccak256Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A 65-byte recoverable ECDSA signature in `r || s || v` wire form.
///
/// `v` is stored as 27 or 28; the parser also accepts the bare recovery
/// ids 0 and 1 and normalizes them.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecoverableSignature([u8; 65]);

impl RecoverableSignature {
    /// Parse from 65 raw bytes, validating the recovery byte.
    pub fn from_bytes(mut bytes: [u8; 65]) -> Result<Self, CryptoError> {
        match bytes[64] {
            0 | 1 => bytes[64] += 27,
            27 | 28 => {}
            v => {
                return Err(CryptoError::MalformedSignature(format!(
                    "recovery byte {v} out of range"
                )))
            }
        }
        Ok(Self(bytes))
    }

    /// Parse from a byte slice, validating length and recovery byte.
    pub fn from_slice(slice: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; 65] = slice.try_into().map_err(|_| {
            CryptoError::MalformedSignature(format!("expected 65 bytes, got {}", slice.len()))
        })?;
        Self::from_bytes(bytes)
    }

    /// Get the raw `r || s || v` bytes.
    pub const fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    /// The `r` component.
    pub fn r(&self) -> &[u8] {
        &self.0[..32]
    }

    /// The `s` component.
    pub fn s(&self) -> &[u8] {
        &self.0[32..64]
    }

    /// The recovery byte (27 or 28).
    pub fn v(&self) -> u8 {
        self.0[64]
    }

    /// Convert to a `0x`-prefixed hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse from a hex string. The `0x` prefix is optional.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
        let bytes = hex::decode(s)
            .map_err(|e| CryptoError::MalformedSignature(format!("invalid hex: {e}")))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}…)", &hex::encode(self.0)[..16])
    }
}

impl AsRef<[u8]> for RecoverableSignature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for RecoverableSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RecoverableSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Derive the 20-byte address of a verifying key.
pub fn address_of(verifying_key: &VerifyingKey) -> Address {
    let point = verifying_key.to_encoded_point(false);
    // Skip the 0x04 uncompressed-point tag.
    let digest = keccak256(&point.as_bytes()[1..]);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&digest[12..]);
    Address(addr)
}

/// Recover the address that signed `digest`, from the signature alone.
pub fn recover_address(
    digest: &Keccak256Hash,
    signature: &RecoverableSignature,
) -> Result<Address, CryptoError> {
    let recovery_id = RecoveryId::from_byte(signature.v() - 27)
        .ok_or_else(|| CryptoError::MalformedSignature("bad recovery id".into()))?;
    let sig = Signature::from_slice(&signature.as_bytes()[..64])
        .map_err(|e| CryptoError::MalformedSignature(e.to_string()))?;
    let verifying_key = VerifyingKey::recover_from_prehash(digest.as_bytes(), &sig, recovery_id)
        .map_err(|_| CryptoError::RecoveryFailed)?;
    Ok(address_of(&verifying_key))
}

/// The signing capability: "can produce a signature over a digest on
/// behalf of identity X".
///
/// Obtained from an external wallet/key-management collaborator and used
/// only for the duration of one signing call. Production implementations
/// wrap a wallet; [`LocalSigner`] wraps an in-process key for tests and
/// local issuance.
pub trait CertificateSigner {
    /// The identity this capability signs for.
    fn address(&self) -> Address;

    /// Sign a 32-byte digest, producing a recoverable signature.
    fn sign_digest(&self, digest: &Keccak256Hash) -> Result<RecoverableSignature, SignerError>;
}

/// An in-process secp256k1 signer.
#[derive(Clone)]
pub struct LocalSigner {
    signing_key: SigningKey,
    address: Address,
}

impl LocalSigner {
    /// Generate a new random signer.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        let address = address_of(signing_key.verifying_key());
        Self { signing_key, address }
    }

    /// Create from a 32-byte seed. Fails for seeds outside the curve's
    /// scalar field (zero or >= the group order).
    pub fn from_seed(seed: &[u8; 32]) -> Result<Self, CryptoError> {
        let signing_key = SigningKey::from_slice(seed).map_err(|_| CryptoError::InvalidKey)?;
        let address = address_of(signing_key.verifying_key());
        Ok(Self { signing_key, address })
    }
}

impl CertificateSigner for LocalSigner {
    fn address(&self) -> Address {
        self.address
    }

    fn sign_digest(&self, digest: &Keccak256Hash) -> Result<RecoverableSignature, SignerError> {
        let (sig, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(digest.as_bytes())
            .map_err(|e| SignerError::Rejected(e.to_string()))?;

        let mut bytes = [0u8; 65];
        bytes[..64].copy_from_slice(&sig.to_bytes());
        bytes[64] = 27 + recovery_id.to_byte();
        // v is 27/28 by construction.
        Ok(RecoverableSignature(bytes))
    }
}

impl fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSigner").field("address", &self.address).finish_non_exhaustive()
    }
}
