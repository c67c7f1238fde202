//! # Veritag Testkit
//!
//! Testing utilities for the veritag stack.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Certificates with pinned metadata hashes,
//!   struct hashes, and signing digests for cross-implementation
//!   verification
//! - **Generators**: Proptest strategies for certificates, identities,
//!   and transfer codes
//! - **Fixtures**: Helper structs for setting up signer-plus-registry
//!   test scenarios
//!
//! ## Golden Vectors
//!
//! ```rust
//! use veritag_testkit::vectors::all_vectors;
//! use veritag_core::typed_data::SigningMessage;
//!
//! for vector in all_vectors() {
//!     let digest = SigningMessage::new(&vector.certificate(), vector.chain_id).digest();
//!     assert_eq!(digest.to_hex(), vector.expected_digest);
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use veritag_testkit::fixtures::TestFixture;
//!
//! # async fn example() {
//! let fixture = TestFixture::new();
//! fixture.register_manufacturer("Acme").await;
//! let payload = fixture.signed_widget();
//! # }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{clamp_seed, multi_party_signers, TestFixture, TEST_CHAIN_ID};
pub use vectors::{all_vectors, GoldenVector};
