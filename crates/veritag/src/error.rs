//! Error types for the service layer, with a coarse classification used
//! to route failures to the right surface.

use thiserror::Error;
use veritag_core::{Address, CertificateError, PayloadError, SignError};
use veritag_registry::RegistryError;

/// Why a signed certificate failed the authenticity check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// The carried metadata hash does not match the carried metadata.
    #[error("carried metadata hash does not match the metadata")]
    MetadataHashMismatch,

    /// The signature did not recover to any identity.
    #[error("signature recovery failed: {0}")]
    SignatureRecovery(String),

    /// The signature recovered, but not to a registered manufacturer.
    #[error("recovered signer {0} is not a registered manufacturer")]
    UnregisteredSigner(Address),
}

/// Errors that can occur during service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Certificate construction error.
    #[error("certificate error: {0}")]
    Certificate(#[from] CertificateError),

    /// Signing error, including the post-sign self check.
    #[error("signing error: {0}")]
    Sign(#[from] SignError),

    /// Payload encoding or decoding error.
    #[error("payload error: {0}")]
    Payload(#[from] PayloadError),

    /// The certificate failed the authenticity check.
    #[error("verification failed: {0}")]
    Verification(#[from] VerificationError),

    /// The registry rejected the operation or could not be reached.
    #[error("registry error: {0}")]
    Ledger(#[from] RegistryError),
}

/// Coarse failure classification.
///
/// The boundary that matters operationally is `Ledger` vs everything
/// else: a `Ledger` failure says nothing about the product and the
/// check should be retried, while the others are verdicts on the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The input itself is malformed or incomplete.
    Validation,
    /// The signing collaborator failed or refused.
    Signing,
    /// The certificate is not authentic.
    Verification,
    /// The external ledger failed or rejected the submission.
    Ledger,
    /// An internal invariant was violated.
    Consistency,
}

impl ServiceError {
    /// Classify this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            ServiceError::Certificate(_) | ServiceError::Payload(_) => ErrorClass::Validation,
            ServiceError::Sign(SignError::Integrity(_)) => ErrorClass::Consistency,
            ServiceError::Sign(_) => ErrorClass::Signing,
            ServiceError::Verification(_) => ErrorClass::Verification,
            // A claim the ledger bounced for a bad signature is an
            // authenticity verdict, not a ledger fault.
            ServiceError::Ledger(RegistryError::InvalidSignature(_))
            | ServiceError::Ledger(RegistryError::UnknownManufacturer(_)) => {
                ErrorClass::Verification
            }
            ServiceError::Ledger(RegistryError::InvalidNominee) => ErrorClass::Validation,
            ServiceError::Ledger(_) => ErrorClass::Ledger,
        }
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
