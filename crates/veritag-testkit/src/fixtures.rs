//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use veritag::{AuthenticityService, MemoryRegistry};
use veritag_core::{
    sign_certificate, Address, CertificateBuilder, CertificateSigner, LocalSigner,
    SignedCertificate,
};

/// Chain id used by every fixture.
pub const TEST_CHAIN_ID: u64 = 31337;

/// Clamp a seed into the secp256k1 scalar field: nonzero and below the
/// group order.
pub fn clamp_seed(mut seed: [u8; 32]) -> [u8; 32] {
    seed[0] &= 0x7f;
    seed[31] |= 0x01;
    seed
}

/// A test fixture with a manufacturer signer and a service over an
/// in-memory registry.
pub struct TestFixture {
    pub manufacturer: LocalSigner,
    pub service: AuthenticityService<MemoryRegistry>,
}

impl TestFixture {
    /// Create a new test fixture with a random manufacturer key.
    pub fn new() -> Self {
        Self {
            manufacturer: LocalSigner::generate(),
            service: AuthenticityService::new(MemoryRegistry::new(TEST_CHAIN_ID), TEST_CHAIN_ID),
        }
    }

    /// Create with a deterministic manufacturer key from a seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        let seed = clamp_seed(seed);
        Self {
            manufacturer: LocalSigner::from_seed(&seed).expect("clamped seed is a valid scalar"),
            service: AuthenticityService::new(MemoryRegistry::new(TEST_CHAIN_ID), TEST_CHAIN_ID),
        }
    }

    /// The manufacturer's identity.
    pub fn manufacturer_address(&self) -> Address {
        self.manufacturer.address()
    }

    /// Put the fixture's manufacturer on the roster.
    pub async fn register_manufacturer(&self, name: &str) {
        self.service
            .register_manufacturer(&self.manufacturer.address(), name)
            .await
            .expect("fresh fixture roster accepts registration");
    }

    /// A complete certificate builder for a sample product.
    pub fn widget_builder(&self) -> CertificateBuilder {
        CertificateBuilder::new()
            .name("Widget")
            .unique_id("W-1")
            .serial("S-1")
            .date(1_700_000_000)
            .metadata_text("Red, 128GB")
    }

    /// Issue a signed certificate for the sample product.
    pub fn signed_widget(&self) -> SignedCertificate {
        let certificate = self
            .widget_builder()
            .owner(self.manufacturer.address())
            .build()
            .expect("sample builder is complete");
        let signature = sign_certificate(&self.manufacturer, &certificate, TEST_CHAIN_ID)
            .expect("local signer never refuses");
        SignedCertificate::new(certificate, signature)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple signers for multi-party tests, each with a distinct
/// deterministic key.
pub fn multi_party_signers(count: usize) -> Vec<LocalSigner> {
    (0..count)
        .map(|i| {
            let mut seed = [0x51u8; 32];
            // Byte 30: clamping touches bytes 0 and 31, which would fold
            // neighboring indices onto one seed.
            seed[30] = i as u8;
            LocalSigner::from_seed(&clamp_seed(seed)).expect("clamped seed is a valid scalar")
        })
        .collect()
}
