//! The scannable payload: a certificate bundled with its signature.
//!
//! This is the JSON blob embedded in a QR label. It is self-contained:
//! everything a verifier needs except the chain id and the registry's
//! manufacturer roster travels with the product.

use serde::{Deserialize, Serialize};

use crate::certificate::Certificate;
use crate::crypto::RecoverableSignature;
use crate::error::PayloadError;

/// A certificate paired with the recoverable signature over its typed
/// digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedCertificate {
    #[serde(rename = "cert")]
    pub certificate: Certificate,
    pub signature: RecoverableSignature,
}

impl SignedCertificate {
    pub fn new(certificate: Certificate, signature: RecoverableSignature) -> Self {
        Self { certificate, signature }
    }

    /// Serialize to the interchange JSON form.
    pub fn to_json(&self) -> Result<String, PayloadError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from the interchange JSON form.
    pub fn from_json(json: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::CertificateBuilder;
    use crate::crypto::{CertificateSigner, LocalSigner};
    use crate::typed_data::sign_certificate;
    use crate::types::Address;

    fn sample() -> SignedCertificate {
        let signer = LocalSigner::generate();
        let cert = CertificateBuilder::new()
            .name("Widget")
            .unique_id("W-1")
            .serial("S-1")
            .date(1_700_000_000)
            .owner(signer.address())
            .metadata_text("Red, 128GB")
            .build()
            .unwrap();
        let signature = sign_certificate(&signer, &cert, 31337).unwrap();
        SignedCertificate::new(cert, signature)
    }

    #[test]
    fn test_json_roundtrip() {
        let payload = sample();
        let json = payload.to_json().unwrap();
        let back = SignedCertificate::from_json(&json).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn test_json_shape() {
        let payload = sample();
        let value: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();
        assert!(value.get("cert").is_some());
        let signature = value.get("signature").unwrap().as_str().unwrap();
        assert!(signature.starts_with("0x"));
        assert_eq!(signature.len(), 2 + 65 * 2);
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(SignedCertificate::from_json("not json").is_err());
        assert!(SignedCertificate::from_json("{\"cert\":{}}").is_err());
        // Signature of the wrong length fails structural validation.
        let mut value: serde_json::Value =
            serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        value["signature"] = serde_json::Value::String("0xdeadbeef".into());
        assert!(SignedCertificate::from_json(&value.to_string()).is_err());
    }
}
