//! In-memory implementation of the Registry trait.
//!
//! Primarily for testing and local development. It enforces the same
//! rules a deployed registry contract would, but keeps everything in
//! memory with no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use rand::RngCore;
use tracing::warn;

use veritag_core::{recover_signer, Address, ItemId, SignedCertificate, TransferCode};

use crate::error::{RegistryError, Result};
use crate::traits::Registry;
use crate::types::{CodeGrant, ItemRecord};

/// In-memory registry implementation.
///
/// All state is lost when the registry is dropped. Thread-safe via
/// RwLock. Certificate claims are verified against the given chain's
/// signing domain.
pub struct MemoryRegistry {
    chain_id: u64,
    inner: RwLock<MemoryRegistryInner>,
}

struct MemoryRegistryInner {
    /// Manufacturer roster: identity -> display name.
    manufacturers: HashMap<Address, String>,

    /// User roster: identity -> display name.
    users: HashMap<Address, String>,

    /// Claimed items indexed by identity.
    items: HashMap<ItemId, ItemRecord>,

    /// Active transfer code grants.
    grants: HashMap<TransferCode, CodeGrant>,
}

impl MemoryRegistry {
    /// Create a new empty registry enforcing the given chain's domain.
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            inner: RwLock::new(MemoryRegistryInner {
                manufacturers: HashMap::new(),
                users: HashMap::new(),
                items: HashMap::new(),
                grants: HashMap::new(),
            }),
        }
    }

    /// The chain id certificate claims are verified against.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

impl MemoryRegistryInner {
    /// Drop every outstanding grant for an item. Called on any change of
    /// ownership.
    fn void_grants_for(&mut self, item_id: &ItemId) {
        self.grants.retain(|_, grant| grant.item_id != *item_id);
    }
}

#[async_trait]
impl Registry for MemoryRegistry {
    async fn manufacturer_name(&self, address: &Address) -> Result<Option<String>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.manufacturers.get(address).cloned())
    }

    async fn user_name(&self, address: &Address) -> Result<Option<String>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.users.get(address).cloned())
    }

    async fn register_manufacturer(&self, address: &Address, name: &str) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        if inner.manufacturers.contains_key(address) {
            return Err(RegistryError::AlreadyRegistered(*address));
        }
        inner.manufacturers.insert(*address, name.to_string());
        Ok(())
    }

    async fn register_user(&self, address: &Address, name: &str) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        if inner.users.contains_key(address) {
            return Err(RegistryError::AlreadyRegistered(*address));
        }
        inner.users.insert(*address, name.to_string());
        Ok(())
    }

    /// Settle a certificate claim against the roster.
    ///
    /// Re-claim is idempotent for the item's *current recorded* owner,
    /// deliberately narrower than honoring the certificate's declared
    /// `owner` field: the declared owner is the issuing manufacturer,
    /// and honoring it would let the manufacturer reacquire an item it
    /// has already sold.
    async fn submit_certificate_claim(
        &self,
        payload: &SignedCertificate,
        claimant: &Address,
    ) -> Result<ItemRecord> {
        let signer = recover_signer(&payload.certificate, &payload.signature, self.chain_id)
            .map_err(|e| RegistryError::InvalidSignature(e.to_string()))?;

        let mut inner = self.inner.write().unwrap();
        if !inner.manufacturers.contains_key(&signer) {
            return Err(RegistryError::UnknownManufacturer(signer));
        }

        let cert = &payload.certificate;
        let item_id = cert.item_id();
        if let Some(existing) = inner.items.get(&item_id) {
            // Re-claim by the current owner is idempotent.
            if existing.owner == *claimant {
                return Ok(existing.clone());
            }
            return Err(RegistryError::AlreadyClaimed {
                item_id,
                owner: existing.owner,
            });
        }

        let record = ItemRecord {
            item_id,
            name: cert.name.clone(),
            unique_id: cert.unique_id.clone(),
            serial: cert.serial.clone(),
            date: cert.date,
            manufacturer: signer,
            owner: *claimant,
        };
        inner.items.insert(item_id, record.clone());
        Ok(record)
    }

    async fn item(&self, item_id: &ItemId) -> Result<Option<ItemRecord>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.items.get(item_id).cloned())
    }

    async fn items_owned_by(&self, owner: &Address) -> Result<Vec<ItemRecord>> {
        let inner = self.inner.read().unwrap();
        let mut items: Vec<ItemRecord> = inner
            .items
            .values()
            .filter(|record| record.owner == *owner)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.item_id.as_bytes().cmp(b.item_id.as_bytes()));
        Ok(items)
    }

    async fn submit_transfer_code_generation(
        &self,
        item_id: &ItemId,
        nominee: &Address,
        caller: &Address,
    ) -> Result<TransferCode> {
        let mut inner = self.inner.write().unwrap();

        let record = inner
            .items
            .get(item_id)
            .ok_or(RegistryError::ItemNotFound(*item_id))?;
        if record.owner != *caller {
            return Err(RegistryError::NotOwner {
                item_id: *item_id,
                caller: *caller,
            });
        }
        if !nominee.is_valid_identity() {
            return Err(RegistryError::InvalidNominee);
        }

        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let code = TransferCode::from_bytes(bytes);

        inner.grants.insert(
            code,
            CodeGrant {
                code,
                item_id: *item_id,
                nominee: *nominee,
            },
        );
        Ok(code)
    }

    async fn submit_transfer_code_claim(
        &self,
        code: &TransferCode,
        claimant: &Address,
    ) -> Result<ItemRecord> {
        let mut inner = self.inner.write().unwrap();

        let grant = inner.grants.get(code).ok_or(RegistryError::CodeNotFound)?;
        if grant.nominee != *claimant {
            warn!(nominee = %grant.nominee, claimant = %claimant, "transfer code presented by wrong identity");
            return Err(RegistryError::NomineeMismatch);
        }
        let item_id = grant.item_id;

        // Consume the code, then void any other codes for the item.
        inner.grants.remove(code);
        inner.void_grants_for(&item_id);

        let record = inner
            .items
            .get_mut(&item_id)
            .ok_or(RegistryError::ItemNotFound(item_id))?;
        record.owner = *claimant;
        let record = record.clone();
        Ok(record)
    }
}
