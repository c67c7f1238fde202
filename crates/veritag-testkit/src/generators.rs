//! Proptest generators for property-based testing.

use proptest::prelude::*;

use veritag_core::{Address, Certificate, CertificateBuilder, ItemId, LocalSigner, TransferCode};

use crate::fixtures::clamp_seed;

/// Generate a random signer from a clamped seed.
pub fn signer() -> impl Strategy<Value = LocalSigner> {
    any::<[u8; 32]>().prop_map(|seed| {
        LocalSigner::from_seed(&clamp_seed(seed)).expect("clamped seed is a valid scalar")
    })
}

/// Generate a random non-zero Address.
pub fn address() -> impl Strategy<Value = Address> {
    any::<[u8; 20]>()
        .prop_map(Address::from_bytes)
        .prop_filter("zero address is not an identity", |a| a.is_valid_identity())
}

/// Generate a random ItemId.
pub fn item_id() -> impl Strategy<Value = ItemId> {
    any::<[u8; 32]>().prop_map(ItemId::from_bytes)
}

/// Generate a random TransferCode.
pub fn transfer_code() -> impl Strategy<Value = TransferCode> {
    any::<[u8; 32]>().prop_map(TransferCode::from_bytes)
}

/// Generate a printable product field (name, unique id, serial).
pub fn product_field() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9 _.-]{0,31}".prop_map(String::from)
}

/// Generate a canonical metadata attribute: non-empty, already trimmed,
/// and comma-free.
pub fn metadata_attribute() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9 ]{0,15}".prop_map(|s| s.trim().to_string())
        .prop_filter("attribute must survive canonicalization", |s| !s.is_empty())
}

/// Generate a canonical metadata list.
pub fn metadata() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(metadata_attribute(), 1..6)
}

/// Generate a plausible issuance timestamp.
pub fn date() -> impl Strategy<Value = i64> {
    1_000_000_000i64..=4_000_000_000i64
}

/// Generate a complete valid certificate.
pub fn certificate() -> impl Strategy<Value = Certificate> {
    (product_field(), product_field(), product_field(), date(), address(), metadata()).prop_map(
        |(name, unique_id, serial, date, owner, metadata)| {
            CertificateBuilder::new()
                .name(name)
                .unique_id(unique_id)
                .serial(serial)
                .date(date)
                .owner(owner)
                .metadata(metadata)
                .build()
                .expect("generated fields satisfy the builder")
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritag_core::typed_data::SigningMessage;
    use veritag_core::{
        canonicalize_metadata, canonicalize_metadata_text, hash_metadata, recover_signer,
        sign_certificate, CertificateSigner, SignedCertificate,
    };

    use crate::fixtures::TEST_CHAIN_ID;

    proptest! {
        #[test]
        fn prop_generated_certificates_are_self_consistent(cert in certificate()) {
            prop_assert!(cert.metadata_hash_consistent());
            prop_assert_eq!(cert.item_id(), cert.item_id());
        }

        #[test]
        fn prop_canonicalization_is_idempotent(meta in metadata()) {
            let canon = canonicalize_metadata_text(&meta.join(","));
            prop_assert_eq!(&canon, &meta);
            let again = canonicalize_metadata(&canon);
            prop_assert_eq!(again, canon);
        }

        #[test]
        fn prop_canonically_equal_metadata_hashes_identically(meta in metadata()) {
            let spaced: Vec<String> = meta.iter().map(|m| format!("  {m} ")).collect();
            prop_assert_eq!(
                hash_metadata(&canonicalize_metadata(&spaced)),
                hash_metadata(&meta)
            );
        }

        #[test]
        fn prop_signing_digest_is_deterministic(cert in certificate()) {
            let a = SigningMessage::new(&cert, TEST_CHAIN_ID).digest();
            let b = SigningMessage::new(&cert, TEST_CHAIN_ID).digest();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_sign_recover_roundtrip(cert in certificate(), signer in signer()) {
            let signature = sign_certificate(&signer, &cert, TEST_CHAIN_ID).unwrap();
            let recovered = recover_signer(&cert, &signature, TEST_CHAIN_ID).unwrap();
            prop_assert_eq!(recovered, signer.address());
        }

        #[test]
        fn prop_payload_json_roundtrip(cert in certificate(), signer in signer()) {
            let signature = sign_certificate(&signer, &cert, TEST_CHAIN_ID).unwrap();
            let payload = SignedCertificate::new(cert, signature);
            let back = SignedCertificate::from_json(&payload.to_json().unwrap()).unwrap();
            prop_assert_eq!(back, payload);
        }
    }
}
