//! # Veritag Core
//!
//! Pure primitives for product authenticity certificates: the certificate
//! model, canonical metadata encoding, and EIP-712 typed-data signing with
//! public-key recovery.
//!
//! This crate contains no I/O and no ledger access. It is pure computation
//! over cryptographic data structures; talking to the registry is the job
//! of `veritag-registry` and `veritag`.
//!
//! ## Key Types
//!
//! - [`Certificate`] - One manufactured item's authenticity claim
//! - [`SignedCertificate`] - The bearer credential `(certificate, signature)`
//! - [`Address`] - 20-byte identity derived from a secp256k1 public key
//! - [`RecoverableSignature`] - 65-byte `r || s || v` ECDSA signature
//! - [`TransferCode`] - Opaque one-time ownership-transfer token
//!
//! ## Canonicalization
//!
//! Metadata is trimmed and canonicalized once, at the certificate boundary,
//! and hashed over its Solidity ABI encoding. See [`canonical`].

pub mod canonical;
pub mod certificate;
pub mod crypto;
pub mod error;
pub mod payload;
pub mod typed_data;
pub mod types;

pub use canonical::{
    canonicalize_metadata, canonicalize_metadata_text, encode_string_array, hash_metadata,
};
pub use certificate::{Certificate, CertificateBuilder};
pub use crypto::{keccak256, CertificateSigner, Keccak256Hash, LocalSigner, RecoverableSignature};
pub use error::{CertificateError, CryptoError, IntegrityError, PayloadError, SignError, SignerError};
pub use payload::SignedCertificate;
pub use typed_data::{
    recover_signer, sign_and_self_check, sign_certificate, SigningMessage, PROTOCOL_NAME,
    PROTOCOL_VERSION, REGISTRY_ADDRESS,
};
pub use types::{Address, ItemId, TransferCode};
