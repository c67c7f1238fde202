//! Error types for registry operations.

use thiserror::Error;
use veritag_core::{Address, ItemId};

/// Errors that can occur while talking to or enforcing the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The signer of a certificate is not a registered manufacturer.
    #[error("signer {0} is not a registered manufacturer")]
    UnknownManufacturer(Address),

    /// Signature did not recover to any usable identity.
    #[error("certificate signature is invalid: {0}")]
    InvalidSignature(String),

    /// The identity is already registered under a name.
    #[error("identity {0} is already registered")]
    AlreadyRegistered(Address),

    /// No item with this identity exists in the registry.
    #[error("item {0} is not registered")]
    ItemNotFound(ItemId),

    /// The item has already been claimed by another identity.
    #[error("item {item_id} is already owned by {owner}")]
    AlreadyClaimed { item_id: ItemId, owner: Address },

    /// Caller does not own the item it is acting on.
    #[error("{caller} does not own item {item_id}")]
    NotOwner { item_id: ItemId, caller: Address },

    /// The nominee for a transfer code is not a usable identity.
    #[error("transfer nominee is not a valid identity")]
    InvalidNominee,

    /// No active grant exists for the presented transfer code.
    #[error("transfer code is unknown or no longer active")]
    CodeNotFound,

    /// The claimant is not the nominee the code was issued to.
    #[error("transfer code was issued to a different nominee")]
    NomineeMismatch,

    /// The underlying ledger could not be reached.
    #[error("registry unavailable: {0}")]
    Unavailable(String),
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
