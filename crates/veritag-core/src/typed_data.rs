//! Typed structured-data signing (EIP-712 style).
//!
//! A certificate is never signed as raw JSON. It is reduced to a
//! domain-bound 32-byte digest: a hash of the certificate's typed
//! fields, combined with a separator naming the protocol, its version,
//! the chain, and the registry contract. Signatures are therefore
//! meaningless outside this protocol and this deployment.

use crate::certificate::Certificate;
use crate::crypto::{
    keccak256, recover_address, CertificateSigner, Keccak256Hash, RecoverableSignature,
};
use crate::error::{CryptoError, IntegrityError, SignError};
use crate::types::Address;

/// Protocol name bound into every signing domain.
pub const PROTOCOL_NAME: &str = "ProductAuthenticity";

/// Protocol version bound into every signing domain.
pub const PROTOCOL_VERSION: &str = "1";

/// Deployed registry contract the domain is bound to.
pub const REGISTRY_ADDRESS: Address = Address([
    0x5f, 0xbd, 0xb2, 0x31, 0x56, 0x78, 0xaf, 0xec, 0xb3, 0x67, 0xf0, 0x32, 0xd9, 0x3f, 0x64,
    0x2f, 0x64, 0x18, 0x0a, 0xa3,
]);

const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

const CERTIFICATE_TYPE: &str = "Certificate(string name,string uniqueId,string serial,\
                                uint256 date,address owner,bytes32 metadataHash,string[] metadata)";

fn word_u64(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}

fn word_address(address: &Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

/// Typed-data hash of a string: the digest of its UTF-8 bytes.
fn hash_string(s: &str) -> [u8; 32] {
    keccak256(s.as_bytes())
}

/// Typed-data hash of a string array: the digest of the concatenated
/// per-element digests. Distinct from the canonical metadata
/// commitment, which uses the ABI layout.
fn hash_string_array(items: &[String]) -> [u8; 32] {
    let mut concat = Vec::with_capacity(items.len() * 32);
    for item in items {
        concat.extend_from_slice(&hash_string(item));
    }
    keccak256(&concat)
}

/// Compute the domain separator for a chain.
pub fn domain_separator(chain_id: u64) -> Keccak256Hash {
    let mut encoded = Vec::with_capacity(5 * 32);
    encoded.extend_from_slice(&keccak256(DOMAIN_TYPE.as_bytes()));
    encoded.extend_from_slice(&hash_string(PROTOCOL_NAME));
    encoded.extend_from_slice(&hash_string(PROTOCOL_VERSION));
    encoded.extend_from_slice(&word_u64(chain_id));
    encoded.extend_from_slice(&word_address(&REGISTRY_ADDRESS));
    Keccak256Hash::from_bytes(keccak256(&encoded))
}

/// Compute the typed struct hash of a certificate.
///
/// The metadata commitment is always recomputed from the carried
/// metadata list; a carried `metadataHash` that disagrees with it will
/// therefore fail recovery against the original signature.
pub fn struct_hash(certificate: &Certificate) -> Keccak256Hash {
    let mut encoded = Vec::with_capacity(8 * 32);
    encoded.extend_from_slice(&keccak256(CERTIFICATE_TYPE.as_bytes()));
    encoded.extend_from_slice(&hash_string(&certificate.name));
    encoded.extend_from_slice(&hash_string(&certificate.unique_id));
    encoded.extend_from_slice(&hash_string(&certificate.serial));
    encoded.extend_from_slice(&word_u64(certificate.date));
    encoded.extend_from_slice(&word_address(&certificate.owner));
    encoded.extend_from_slice(certificate.recompute_metadata_hash().as_bytes());
    encoded.extend_from_slice(&hash_string_array(&certificate.metadata));
    Keccak256Hash::from_bytes(keccak256(&encoded))
}

/// The fully bound message a certificate signature covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningMessage {
    pub domain_separator: Keccak256Hash,
    pub struct_hash: Keccak256Hash,
}

impl SigningMessage {
    /// Bind a certificate to a chain's signing domain.
    pub fn new(certificate: &Certificate, chain_id: u64) -> Self {
        Self {
            domain_separator: domain_separator(chain_id),
            struct_hash: struct_hash(certificate),
        }
    }

    /// The final 32-byte digest that is signed and recovered against.
    pub fn digest(&self) -> Keccak256Hash {
        let mut encoded = Vec::with_capacity(2 + 64);
        encoded.extend_from_slice(&[0x19, 0x01]);
        encoded.extend_from_slice(self.domain_separator.as_bytes());
        encoded.extend_from_slice(self.struct_hash.as_bytes());
        Keccak256Hash::from_bytes(keccak256(&encoded))
    }
}

/// Sign a certificate for the given chain.
pub fn sign_certificate(
    signer: &dyn CertificateSigner,
    certificate: &Certificate,
    chain_id: u64,
) -> Result<RecoverableSignature, SignError> {
    let digest = SigningMessage::new(certificate, chain_id).digest();
    Ok(signer.sign_digest(&digest)?)
}

/// Recover the identity that signed a certificate on the given chain.
pub fn recover_signer(
    certificate: &Certificate,
    signature: &RecoverableSignature,
    chain_id: u64,
) -> Result<Address, CryptoError> {
    let digest = SigningMessage::new(certificate, chain_id).digest();
    recover_address(&digest, signature)
}

/// Sign a certificate and immediately verify the signature locally.
///
/// Recovery is run on the fresh signature and the result compared to the
/// signer's claimed identity before the signature is released, so a
/// miswired signer (wrong account, wrong chain) is caught at issuance
/// rather than at a customer's first scan.
pub fn sign_and_self_check(
    signer: &dyn CertificateSigner,
    certificate: &Certificate,
    chain_id: u64,
) -> Result<RecoverableSignature, SignError> {
    let digest = SigningMessage::new(certificate, chain_id).digest();
    let signature = signer.sign_digest(&digest)?;
    let recovered = recover_address(&digest, &signature)?;
    let expected = signer.address();
    if recovered != expected {
        return Err(SignError::Integrity(IntegrityError { expected, recovered }));
    }
    Ok(signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::CertificateBuilder;
    use crate::crypto::LocalSigner;
    use crate::error::SignerError;

    const LOCAL_CHAIN: u64 = 31337;

    fn widget() -> Certificate {
        CertificateBuilder::new()
            .name("Widget")
            .unique_id("W-1")
            .serial("S-1")
            .date(1_700_000_000)
            .owner(Address::from_bytes([0x11; 20]))
            .metadata_text("Red, 128GB")
            .build()
            .unwrap()
    }

    #[test]
    fn test_domain_type_hash_matches_reference() {
        assert_eq!(
            hex::encode(keccak256(DOMAIN_TYPE.as_bytes())),
            "8b73c3c69bb8fe3d512ecc4cf759cc79239f7b179b0ffacaa9a75d522b39400f"
        );
    }

    #[test]
    fn test_certificate_type_hash() {
        assert_eq!(
            hex::encode(keccak256(CERTIFICATE_TYPE.as_bytes())),
            "d5cec81ddc7146265cf4d7f25c27b37f5d6c4a1f8e53342c54b332bcc9a6d6eb"
        );
    }

    #[test]
    fn test_domain_separator_vectors() {
        assert_eq!(
            domain_separator(LOCAL_CHAIN).to_hex(),
            "0x656d1dd758f0509bed903eab678f08bb354d006c8550e61f7e30856612c7360f"
        );
        assert_eq!(
            domain_separator(1).to_hex(),
            "0x99a82563986146feb02f749ffdc98ba132f714f7643a38fd1cf7a7cc29afa045"
        );
    }

    #[test]
    fn test_struct_hash_vector() {
        assert_eq!(
            struct_hash(&widget()).to_hex(),
            "0xb594e47c87e12428d99ef6c5a3ad67010da6697f70d9b4dcdc74598280c57fc4"
        );
    }

    #[test]
    fn test_digest_vector() {
        let message = SigningMessage::new(&widget(), LOCAL_CHAIN);
        assert_eq!(
            message.digest().to_hex(),
            "0x270f70560ba5b88eeeb99d5f22596335d2202da9e6030d8a39d8c6c635a14a26"
        );
    }

    #[test]
    fn test_sign_then_recover() {
        let signer = LocalSigner::generate();
        let cert = widget();
        let signature = sign_certificate(&signer, &cert, LOCAL_CHAIN).unwrap();
        let recovered = recover_signer(&cert, &signature, LOCAL_CHAIN).unwrap();
        assert_eq!(recovered, signer.address());
    }

    #[test]
    fn test_recovery_bound_to_chain() {
        let signer = LocalSigner::generate();
        let cert = widget();
        let signature = sign_certificate(&signer, &cert, LOCAL_CHAIN).unwrap();
        match recover_signer(&cert, &signature, 1) {
            Ok(addr) => assert_ne!(addr, signer.address()),
            Err(_) => {}
        }
    }

    #[test]
    fn test_field_mutation_breaks_recovery() {
        let signer = LocalSigner::generate();
        let cert = widget();
        let signature = sign_certificate(&signer, &cert, LOCAL_CHAIN).unwrap();

        let mut tampered = cert.clone();
        tampered.serial = "S-2".to_string();
        match recover_signer(&tampered, &signature, LOCAL_CHAIN) {
            Ok(addr) => assert_ne!(addr, signer.address()),
            Err(_) => {}
        }

        let mut tampered = cert;
        tampered.metadata[0] = "Blue".to_string();
        match recover_signer(&tampered, &signature, LOCAL_CHAIN) {
            Ok(addr) => assert_ne!(addr, signer.address()),
            Err(_) => {}
        }
    }

    #[test]
    fn test_struct_hash_ignores_carried_metadata_hash() {
        // The commitment is recomputed from the metadata list, so a
        // mutated carried hash alone does not change the signed digest.
        let cert = widget();
        let mut tampered = cert.clone();
        tampered.metadata_hash = Keccak256Hash::from_bytes([0xaa; 32]);
        assert_eq!(struct_hash(&cert), struct_hash(&tampered));
        assert!(!tampered.metadata_hash_consistent());
    }

    /// A signer that reports one identity but signs with another key.
    struct MiswiredSigner {
        key: LocalSigner,
        claimed: Address,
    }

    impl CertificateSigner for MiswiredSigner {
        fn address(&self) -> Address {
            self.claimed
        }

        fn sign_digest(
            &self,
            digest: &Keccak256Hash,
        ) -> Result<RecoverableSignature, SignerError> {
            self.key.sign_digest(digest)
        }
    }

    #[test]
    fn test_self_check_catches_miswired_signer() {
        let signer = MiswiredSigner {
            key: LocalSigner::generate(),
            claimed: Address::from_bytes([0x99; 20]),
        };
        let err = sign_and_self_check(&signer, &widget(), LOCAL_CHAIN).unwrap_err();
        assert!(matches!(err, SignError::Integrity(_)));
    }

    #[test]
    fn test_self_check_passes_for_honest_signer() {
        let signer = LocalSigner::generate();
        let signature = sign_and_self_check(&signer, &widget(), LOCAL_CHAIN).unwrap();
        assert_eq!(recover_signer(&widget(), &signature, LOCAL_CHAIN).unwrap(), signer.address());
    }
}
