//! Registry-side records.

use serde::{Deserialize, Serialize};
use veritag_core::{Address, ItemId, TransferCode};

/// One registered item: the registry's view of a claimed product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Manufacturer-scoped item identity.
    pub item_id: ItemId,
    /// Product display name from the certificate.
    pub name: String,
    /// Manufacturer-assigned unique identifier.
    pub unique_id: String,
    /// Production serial number.
    pub serial: String,
    /// Certificate issuance time, seconds since the Unix epoch.
    pub date: u64,
    /// Manufacturer that issued the certificate.
    pub manufacturer: Address,
    /// Current owner of record.
    pub owner: Address,
}

/// An active transfer code grant: one code, one item, one nominee.
///
/// A grant exists from generation until the code is consumed or the
/// item changes hands by any means, whichever comes first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeGrant {
    pub code: TransferCode,
    pub item_id: ItemId,
    pub nominee: Address,
}
