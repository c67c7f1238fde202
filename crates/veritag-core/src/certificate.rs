//! The product certificate: the unit of issuance, signing, and
//! verification.

use serde::{Deserialize, Serialize};

use crate::canonical::{canonicalize_metadata, canonicalize_metadata_text, hash_metadata};
use crate::crypto::Keccak256Hash;
use crate::error::CertificateError;
use crate::types::{Address, ItemId};

/// A product authenticity certificate.
///
/// `metadata_hash` is the canonical commitment over `metadata`; both are
/// carried so a verifier can recompute the commitment and detect
/// tampering with either side. Field names follow the interchange JSON
/// form, so a payload emitted here is readable by the web tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    /// Product display name.
    pub name: String,
    /// Manufacturer-assigned unique identifier.
    pub unique_id: String,
    /// Production serial number.
    pub serial: String,
    /// Issuance time, seconds since the Unix epoch.
    pub date: u64,
    /// Issuing manufacturer, also the initial owner of record.
    pub owner: Address,
    /// Commitment over the canonical metadata list.
    pub metadata_hash: Keccak256Hash,
    /// Canonical metadata attributes, in issuance order.
    pub metadata: Vec<String>,
}

impl Certificate {
    /// The stable item identity: issuer-scoped, so two manufacturers can
    /// reuse the same unique id without colliding.
    pub fn item_id(&self) -> ItemId {
        ItemId::derive(&self.owner, &self.unique_id)
    }

    /// Recompute the metadata commitment from the carried metadata list.
    pub fn recompute_metadata_hash(&self) -> Keccak256Hash {
        hash_metadata(&self.metadata)
    }

    /// Whether the carried commitment matches the carried metadata.
    pub fn metadata_hash_consistent(&self) -> bool {
        self.metadata_hash == self.recompute_metadata_hash()
    }
}

/// Step-by-step construction of a [`Certificate`], validating on
/// `build`.
#[derive(Debug, Default, Clone)]
pub struct CertificateBuilder {
    name: Option<String>,
    unique_id: Option<String>,
    serial: Option<String>,
    date: Option<i64>,
    owner: Option<Address>,
    metadata: Vec<String>,
}

impl CertificateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }

    pub fn serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = Some(serial.into());
        self
    }

    /// Issuance time in seconds since the Unix epoch.
    pub fn date(mut self, date: i64) -> Self {
        self.date = Some(date);
        self
    }

    pub fn owner(mut self, owner: Address) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Set metadata from comma-separated text.
    pub fn metadata_text(mut self, raw: &str) -> Self {
        self.metadata = canonicalize_metadata_text(raw);
        self
    }

    /// Set metadata from an attribute list.
    pub fn metadata(mut self, metadata: Vec<String>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Validate and assemble the certificate. Metadata is always
    /// canonicalized here, whichever setter supplied it, and the
    /// commitment is always computed over the canonical form.
    pub fn build(self) -> Result<Certificate, CertificateError> {
        let name = require_text(self.name, "name")?;
        let unique_id = require_text(self.unique_id, "uniqueId")?;
        let serial = require_text(self.serial, "serial")?;
        let date = self.date.ok_or(CertificateError::Incomplete { field: "date" })?;
        if date < 0 {
            return Err(CertificateError::InvalidTimestamp(date));
        }
        let owner = self.owner.ok_or(CertificateError::Incomplete { field: "owner" })?;
        if !owner.is_valid_identity() {
            return Err(CertificateError::Incomplete { field: "owner" });
        }
        let metadata = canonicalize_metadata(&self.metadata);
        if metadata.is_empty() {
            return Err(CertificateError::Incomplete { field: "metadata" });
        }

        let metadata_hash = hash_metadata(&metadata);
        Ok(Certificate {
            name,
            unique_id,
            serial,
            date: date as u64,
            owner,
            metadata_hash,
            metadata,
        })
    }
}

fn require_text(value: Option<String>, field: &'static str) -> Result<String, CertificateError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(CertificateError::Incomplete { field }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_builder() -> CertificateBuilder {
        CertificateBuilder::new()
            .name("Widget")
            .unique_id("W-1")
            .serial("S-1")
            .date(1_700_000_000)
            .owner(Address::from_bytes([0x11; 20]))
            .metadata_text("Red, 128GB")
    }

    #[test]
    fn test_build_complete_certificate() {
        let cert = sample_builder().build().unwrap();
        assert_eq!(cert.name, "Widget");
        assert_eq!(cert.metadata, vec!["Red".to_string(), "128GB".to_string()]);
        assert!(cert.metadata_hash_consistent());
    }

    #[test]
    fn test_missing_fields_rejected() {
        let no_name = CertificateBuilder::new()
            .unique_id("W-1")
            .serial("S-1")
            .date(1)
            .owner(Address::from_bytes([0x11; 20]))
            .metadata_text("Red")
            .build();
        assert_eq!(no_name.unwrap_err(), CertificateError::Incomplete { field: "name" });

        let blank_serial = sample_builder().serial("   ").build();
        assert_eq!(blank_serial.unwrap_err(), CertificateError::Incomplete { field: "serial" });
    }

    #[test]
    fn test_negative_timestamp_rejected() {
        assert_eq!(
            sample_builder().date(-5).build().unwrap_err(),
            CertificateError::InvalidTimestamp(-5)
        );
        // Zero is a valid (if odd) issuance time, the epoch itself.
        assert_eq!(sample_builder().date(0).build().unwrap().date, 0);
    }

    #[test]
    fn test_zero_owner_rejected() {
        let err = sample_builder().owner(Address::ZERO).build().unwrap_err();
        assert_eq!(err, CertificateError::Incomplete { field: "owner" });
    }

    #[test]
    fn test_metadata_list_is_canonicalized_on_build() {
        let cert = sample_builder()
            .metadata(vec!["  Red  ".to_string(), String::new(), "128GB".to_string()])
            .build()
            .unwrap();
        assert_eq!(cert.metadata, vec!["Red".to_string(), "128GB".to_string()]);
        assert!(cert.metadata_hash_consistent());

        // Canonically equal inputs commit to the same hash regardless of
        // which setter supplied them.
        let from_text = sample_builder().metadata_text("Red, 128GB").build().unwrap();
        assert_eq!(cert.metadata_hash, from_text.metadata_hash);
    }

    #[test]
    fn test_metadata_canonicalizing_to_empty_rejected() {
        let err = sample_builder().metadata_text(" , ,").build().unwrap_err();
        assert_eq!(err, CertificateError::Incomplete { field: "metadata" });

        let err = sample_builder()
            .metadata(vec!["   ".to_string(), String::new()])
            .build()
            .unwrap_err();
        assert_eq!(err, CertificateError::Incomplete { field: "metadata" });
    }

    #[test]
    fn test_item_id_scoped_to_issuer() {
        let a = sample_builder().build().unwrap();
        let b = sample_builder().owner(Address::from_bytes([0x22; 20])).build().unwrap();
        assert_ne!(a.item_id(), b.item_id());
        assert_eq!(a.item_id(), sample_builder().build().unwrap().item_id());
    }

    #[test]
    fn test_serde_uses_interchange_field_names() {
        let cert = sample_builder().build().unwrap();
        let json = serde_json::to_value(&cert).unwrap();
        assert!(json.get("uniqueId").is_some());
        assert!(json.get("metadataHash").is_some());
        assert!(json.get("unique_id").is_none());

        let back: Certificate = serde_json::from_value(json).unwrap();
        assert_eq!(back, cert);
    }
}
