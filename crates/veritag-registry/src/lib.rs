//! # Veritag Registry
//!
//! The ownership ledger interface: the [`Registry`] trait the service
//! layer programs against, plus an in-memory implementation with the
//! same enforcement rules as a deployed registry contract.
//!
//! The registry settles three kinds of state change: roster
//! registrations (manufacturers and users), certificate claims that
//! bind a scanned product to its first owner, and transfer-code
//! redemptions that move an item between owners.

pub mod error;
pub mod memory;
pub mod traits;
pub mod types;

pub use error::{RegistryError, Result};
pub use memory::MemoryRegistry;
pub use traits::Registry;
pub use types::{CodeGrant, ItemRecord};
