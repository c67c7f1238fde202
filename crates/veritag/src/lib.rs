//! # Veritag
//!
//! The unified API for product authenticity: tamper-evident
//! certificates, signature-recovery verification, and one-time
//! ownership transfer codes.
//!
//! ## Overview
//!
//! A manufacturer issues a signed certificate for each item and embeds
//! it in a scannable label. Anyone holding the label can verify it:
//! the signature recovers the signing identity, and the registry's
//! manufacturer roster says whether that identity is a real
//! manufacturer. Ownership then moves through the registry, first by
//! claiming the scanned certificate and later via one-time transfer
//! codes bound to a named nominee.
//!
//! ## Key Concepts
//!
//! - **Certificate**: Immutable once signed. Any field change breaks
//!   signature recovery.
//! - **Recovery**: Verification needs no key distribution; the signer's
//!   identity falls out of the signature itself.
//! - **Transfer code**: Single use, bound to one nominee, voided by any
//!   change of ownership.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use veritag::{AuthenticityService, CertificateBuilder, LocalSigner, MemoryRegistry};
//! use veritag::core::CertificateSigner;
//!
//! async fn example() {
//!     let signer = LocalSigner::generate();
//!     let service = AuthenticityService::new(MemoryRegistry::new(31337), 31337);
//!
//!     service
//!         .register_manufacturer(&signer.address(), "Acme")
//!         .await
//!         .unwrap();
//!
//!     let payload = service
//!         .issue_certificate(
//!             CertificateBuilder::new()
//!                 .name("Widget")
//!                 .unique_id("W-1")
//!                 .serial("S-1")
//!                 .date(1_700_000_000)
//!                 .metadata_text("Red, 128GB"),
//!             &signer,
//!         )
//!         .unwrap();
//!
//!     let report = service.check_authenticity(&payload).await.unwrap();
//!     assert!(report.is_authentic());
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `veritag::core` - Certificates, canonical encoding, typed-data signing
//! - `veritag::registry` - The ownership ledger interface

pub mod error;
pub mod service;

// Re-export component crates
pub use veritag_core as core;
pub use veritag_registry as registry;

// Re-export main types for convenience
pub use error::{ErrorClass, Result, ServiceError, VerificationError};
pub use service::{AuthenticityReport, AuthenticityService};

// Re-export commonly used component types
pub use veritag_core::{
    Address, Certificate, CertificateBuilder, CertificateSigner, ItemId, Keccak256Hash,
    LocalSigner, RecoverableSignature, SignedCertificate, TransferCode,
};
pub use veritag_registry::{ItemRecord, MemoryRegistry, Registry, RegistryError};
