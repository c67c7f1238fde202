//! Golden test vectors for deterministic verification.
//!
//! These vectors pin the canonical metadata encoding and the typed-data
//! digest pipeline, so signatures stay interoperable with the web
//! tooling and with any other implementation of the protocol.

use veritag_core::{Address, Certificate, CertificateBuilder};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Chain the digest is bound to.
    pub chain_id: u64,
    /// Certificate fields.
    pub product_name: &'static str,
    pub unique_id: &'static str,
    pub serial: &'static str,
    pub date: i64,
    pub owner: [u8; 20],
    pub metadata: &'static [&'static str],
    /// Expected canonical metadata commitment (hex, 0x-prefixed).
    pub expected_metadata_hash: &'static str,
    /// Expected typed struct hash (hex, 0x-prefixed).
    pub expected_struct_hash: &'static str,
    /// Expected final signing digest (hex, 0x-prefixed).
    pub expected_digest: &'static str,
}

impl GoldenVector {
    /// Build the vector's certificate.
    pub fn certificate(&self) -> Certificate {
        CertificateBuilder::new()
            .name(self.product_name)
            .unique_id(self.unique_id)
            .serial(self.serial)
            .date(self.date)
            .owner(Address::from_bytes(self.owner))
            .metadata(self.metadata.iter().map(|s| s.to_string()).collect())
            .build()
            .expect("golden vector fields are complete")
    }
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "Widget on the local chain",
            chain_id: 31337,
            product_name: "Widget",
            unique_id: "W-1",
            serial: "S-1",
            date: 1_700_000_000,
            owner: [0x11; 20],
            metadata: &["Red", "128GB"],
            expected_metadata_hash:
                "0xa2fb16202897754a063687661e1090d7431bce9d29d40b6f47bc128694e0b244",
            expected_struct_hash:
                "0xb594e47c87e12428d99ef6c5a3ad67010da6697f70d9b4dcdc74598280c57fc4",
            expected_digest:
                "0x270f70560ba5b88eeeb99d5f22596335d2202da9e6030d8a39d8c6c635a14a26",
        },
        GoldenVector {
            name: "Widget on mainnet",
            chain_id: 1,
            product_name: "Widget",
            unique_id: "W-1",
            serial: "S-1",
            date: 1_700_000_000,
            owner: [0x11; 20],
            metadata: &["Red", "128GB"],
            expected_metadata_hash:
                "0xa2fb16202897754a063687661e1090d7431bce9d29d40b6f47bc128694e0b244",
            expected_struct_hash:
                "0xb594e47c87e12428d99ef6c5a3ad67010da6697f70d9b4dcdc74598280c57fc4",
            expected_digest:
                "0xd0c938d1283d3b62491456246962fd6276b9769796ca7b1895fd7679c44a77b8",
        },
        GoldenVector {
            name: "Gizmo with three attributes",
            chain_id: 31337,
            product_name: "Gizmo",
            unique_id: "G-9",
            serial: "SN-0042",
            date: 1_717_171_717,
            owner: [0xab; 20],
            metadata: &["Matte Black", "Limited Edition", "2024"],
            expected_metadata_hash:
                "0x8216e18d5069ff326904432c4152646210d7c1a903b13bc8c2b75209683155bb",
            expected_struct_hash:
                "0x25c0f95dd00357675dc5d90e1a2bfa4c4e443c13db80df2c211f40839bc7d82d",
            expected_digest:
                "0x3051767a3350320252e7ae715681411937c349d95d04b065c24b2fe7c63713d0",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritag_core::typed_data::{self, SigningMessage};
    use veritag_core::hash_metadata;

    #[test]
    fn test_all_vectors_reproduce() {
        for vector in all_vectors() {
            let certificate = vector.certificate();

            assert_eq!(
                hash_metadata(&certificate.metadata).to_hex(),
                vector.expected_metadata_hash,
                "metadata hash mismatch for `{}`",
                vector.name
            );
            assert_eq!(
                typed_data::struct_hash(&certificate).to_hex(),
                vector.expected_struct_hash,
                "struct hash mismatch for `{}`",
                vector.name
            );
            assert_eq!(
                SigningMessage::new(&certificate, vector.chain_id).digest().to_hex(),
                vector.expected_digest,
                "digest mismatch for `{}`",
                vector.name
            );
        }
    }

    #[test]
    fn test_digest_depends_on_chain() {
        let vectors = all_vectors();
        // Same certificate on two chains yields the same struct hash but
        // different digests.
        assert_eq!(vectors[0].expected_struct_hash, vectors[1].expected_struct_hash);
        assert_ne!(vectors[0].expected_digest, vectors[1].expected_digest);
    }
}
