//! Registry trait: the abstract interface to the external ownership
//! ledger.
//!
//! This trait keeps the service layer ledger-agnostic. Implementations
//! include an RPC-backed contract client (deployment) and an in-memory
//! registry (for tests and local development).

use async_trait::async_trait;
use veritag_core::{Address, ItemId, SignedCertificate, TransferCode};

use crate::error::Result;
use crate::types::ItemRecord;

/// The Registry trait: async interface to the ownership ledger.
///
/// All methods are async because every real backend is a network call.
/// Lookups are uncached read-throughs: the caller's identity can change
/// between calls, so the ledger is always the source of truth.
///
/// # Design Notes
///
/// - **Submission is settlement**: a returned `Ok` means the ledger has
///   accepted and applied the state change, not merely received it.
/// - **Codes are single-use**: a consumed transfer code never validates
///   again, including for the nominee it was issued to.
/// - **Ownership changes invalidate codes**: any transfer of an item
///   voids every outstanding code for it.
#[async_trait]
pub trait Registry: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Identity Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Look up the display name of a registered manufacturer.
    async fn manufacturer_name(&self, address: &Address) -> Result<Option<String>>;

    /// Look up the display name of a registered user.
    async fn user_name(&self, address: &Address) -> Result<Option<String>>;

    /// Register an identity as a manufacturer under a display name.
    async fn register_manufacturer(&self, address: &Address, name: &str) -> Result<()>;

    /// Register an identity as an end user under a display name.
    async fn register_user(&self, address: &Address, name: &str) -> Result<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Item Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Submit a certificate claim: verify the signed certificate against
    /// the manufacturer roster and assign the item to `claimant`.
    ///
    /// # Returns
    /// The item record as settled, owned by `claimant`.
    async fn submit_certificate_claim(
        &self,
        payload: &SignedCertificate,
        claimant: &Address,
    ) -> Result<ItemRecord>;

    /// Fetch one item record.
    async fn item(&self, item_id: &ItemId) -> Result<Option<ItemRecord>>;

    /// List the items currently owned by an identity.
    async fn items_owned_by(&self, owner: &Address) -> Result<Vec<ItemRecord>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Transfer Code Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Mint a transfer code for `item_id` on behalf of `caller`, bound
    /// to `nominee`. Fails unless `caller` owns the item. The code is
    /// generated ledger-side and returned exactly once.
    async fn submit_transfer_code_generation(
        &self,
        item_id: &ItemId,
        nominee: &Address,
        caller: &Address,
    ) -> Result<TransferCode>;

    /// Redeem a transfer code: consume it and move the item to
    /// `claimant`, who must be the bound nominee.
    ///
    /// # Returns
    /// The item record as settled, owned by `claimant`.
    async fn submit_transfer_code_claim(
        &self,
        code: &TransferCode,
        claimant: &Address,
    ) -> Result<ItemRecord>;
}
