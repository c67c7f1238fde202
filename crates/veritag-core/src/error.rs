//! Error types for veritag core operations.

use thiserror::Error;

use crate::types::Address;

/// Validation failures when building a certificate.
///
/// These are local, never retried automatically: the caller must fix the
/// input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CertificateError {
    #[error("incomplete certificate: field `{field}` is empty")]
    Incomplete { field: &'static str },

    #[error("invalid certificate timestamp: {0}")]
    InvalidTimestamp(i64),
}

/// Failures in signature parsing and recovery.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    #[error("signer recovery failed")]
    RecoveryFailed,

    #[error("invalid signing key")]
    InvalidKey,
}

/// Failures of the external signing capability.
///
/// `Rejected` is retryable after user action; `Unavailable` means no
/// capability is present at all.
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("signing rejected: {0}")]
    Rejected(String),

    #[error("no signing capability available")]
    Unavailable,
}

/// The post-sign self-check recovered a different identity than the one
/// that signed. Fatal to the operation: the certificate must be
/// regenerated, never emitted half-signed.
#[derive(Debug, Error)]
#[error("signature integrity failure: signed as {expected} but recovered {recovered}")]
pub struct IntegrityError {
    pub expected: Address,
    pub recovered: Address,
}

/// Any failure on the signing path.
#[derive(Debug, Error)]
pub enum SignError {
    #[error(transparent)]
    Signer(#[from] SignerError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Integrity(#[from] IntegrityError),
}

/// Failures when decoding a scannable certificate payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload parse error: {0}")]
    Json(#[from] serde_json::Error),
}
