//! The authenticity service: unified API over the core primitives and
//! the registry.

use std::sync::Arc;

use tracing::info;

use veritag_core::{
    recover_signer, sign_and_self_check, Address, CertificateBuilder, CertificateSigner, ItemId,
    SignedCertificate, TransferCode,
};
use veritag_registry::{ItemRecord, Registry, RegistryError};

use crate::error::{Result, ServiceError, VerificationError};

/// The verdict of an authenticity check.
///
/// A report is produced whenever the check itself could run; a
/// counterfeit product yields a non-authentic report, not an error.
/// Errors are reserved for failures that say nothing about the product,
/// such as an unreachable registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticityReport {
    /// The identity the signature recovered to, when recovery succeeded.
    pub signer: Option<Address>,
    /// The recovered signer's registered display name, when known.
    pub signer_label: Option<String>,
    /// Why the check failed, if it did.
    pub failure: Option<VerificationError>,
}

impl AuthenticityReport {
    /// Whether the certificate passed every check.
    pub fn is_authentic(&self) -> bool {
        self.failure.is_none()
    }

    fn failed(failure: VerificationError, signer: Option<Address>) -> Self {
        Self { signer, signer_label: None, failure: Some(failure) }
    }
}

/// The main service struct.
///
/// Provides a unified API for:
/// - Issuing signed certificates
/// - Checking a scanned payload's authenticity
/// - Claiming products and transferring ownership
pub struct AuthenticityService<R: Registry> {
    /// The ownership ledger.
    registry: Arc<R>,
    /// Chain whose signing domain certificates are bound to.
    chain_id: u64,
}

impl<R: Registry> AuthenticityService<R> {
    /// Create a new service over a registry.
    pub fn new(registry: R, chain_id: u64) -> Self {
        Self { registry: Arc::new(registry), chain_id }
    }

    /// Get the registry reference.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// The chain id certificates are bound to.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Roster Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Register an identity as a manufacturer.
    pub async fn register_manufacturer(&self, address: &Address, name: &str) -> Result<()> {
        Ok(self.registry.register_manufacturer(address, name).await?)
    }

    /// Register an identity as an end user.
    pub async fn register_user(&self, address: &Address, name: &str) -> Result<()> {
        Ok(self.registry.register_user(address, name).await?)
    }

    /// Look up a manufacturer's display name. Always a read-through: the
    /// roster can change under us, so nothing is cached.
    pub async fn manufacturer_name(&self, address: &Address) -> Result<Option<String>> {
        Ok(self.registry.manufacturer_name(address).await?)
    }

    /// Look up a user's display name.
    pub async fn user_name(&self, address: &Address) -> Result<Option<String>> {
        Ok(self.registry.user_name(address).await?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Issuance
    // ─────────────────────────────────────────────────────────────────────────

    /// Build and sign a certificate as the signer's identity.
    ///
    /// The signer's identity becomes the certificate owner, and the
    /// fresh signature is recovery-checked against it before release.
    pub fn issue_certificate(
        &self,
        builder: CertificateBuilder,
        signer: &dyn CertificateSigner,
    ) -> Result<SignedCertificate> {
        let certificate = builder.owner(signer.address()).build()?;
        let signature = sign_and_self_check(signer, &certificate, self.chain_id)?;
        info!(item_id = %certificate.item_id(), "issued certificate");
        Ok(SignedCertificate::new(certificate, signature))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Verification
    // ─────────────────────────────────────────────────────────────────────────

    /// Check a scanned payload's authenticity.
    ///
    /// Three gates, in order: the carried metadata hash must match the
    /// carried metadata, the signature must recover to an identity, and
    /// that identity must be on the manufacturer roster. An unreachable
    /// registry is an error, never a counterfeit verdict.
    pub async fn check_authenticity(
        &self,
        payload: &SignedCertificate,
    ) -> Result<AuthenticityReport> {
        let certificate = &payload.certificate;
        if !certificate.metadata_hash_consistent() {
            return Ok(AuthenticityReport::failed(
                VerificationError::MetadataHashMismatch,
                None,
            ));
        }

        let signer = match recover_signer(certificate, &payload.signature, self.chain_id) {
            Ok(signer) => signer,
            Err(e) => {
                return Ok(AuthenticityReport::failed(
                    VerificationError::SignatureRecovery(e.to_string()),
                    None,
                ))
            }
        };

        match self.registry.manufacturer_name(&signer).await? {
            Some(name) => Ok(AuthenticityReport {
                signer: Some(signer),
                signer_label: Some(name),
                failure: None,
            }),
            None => Ok(AuthenticityReport::failed(
                VerificationError::UnregisteredSigner(signer),
                Some(signer),
            )),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Ownership
    // ─────────────────────────────────────────────────────────────────────────

    /// Verify a scanned payload and claim the product for `claimant`.
    ///
    /// The authenticity check runs locally first so a counterfeit never
    /// reaches the ledger.
    pub async fn claim_with_certificate(
        &self,
        payload: &SignedCertificate,
        claimant: &Address,
    ) -> Result<ItemRecord> {
        let report = self.check_authenticity(payload).await?;
        if let Some(failure) = report.failure {
            return Err(ServiceError::Verification(failure));
        }
        let record = self.registry.submit_certificate_claim(payload, claimant).await?;
        info!(item_id = %record.item_id, owner = %record.owner, "certificate claim settled");
        Ok(record)
    }

    /// Generate a one-time transfer code for an item, bound to a
    /// nominee, on behalf of the item's current owner. The code itself
    /// is minted ledger-side and returned exactly once.
    pub async fn generate_transfer_code(
        &self,
        item_id: &ItemId,
        nominee: &Address,
        caller: &Address,
    ) -> Result<TransferCode> {
        // Rejected locally before a ledger round-trip.
        if !nominee.is_valid_identity() {
            return Err(ServiceError::Ledger(RegistryError::InvalidNominee));
        }

        let code = self
            .registry
            .submit_transfer_code_generation(item_id, nominee, caller)
            .await?;
        Ok(code)
    }

    /// Redeem a transfer code for `claimant`, moving the item to them.
    pub async fn claim_with_code(
        &self,
        code: &TransferCode,
        claimant: &Address,
    ) -> Result<ItemRecord> {
        let record = self.registry.submit_transfer_code_claim(code, claimant).await?;
        info!(item_id = %record.item_id, owner = %record.owner, "transfer code claim settled");
        Ok(record)
    }

    /// List the items currently owned by an identity.
    pub async fn items_owned_by(&self, owner: &Address) -> Result<Vec<ItemRecord>> {
        Ok(self.registry.items_owned_by(owner).await?)
    }
}
