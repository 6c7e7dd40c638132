//! # Walletmesh Testkit
//!
//! Testing utilities for walletmesh.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: helper structs for setting up wallet views, records, and
//!   in-memory swarms
//! - **Generators**: proptest strategies for property-based testing of the
//!   reconciliation rules and the codec
//! - **Golden vectors**: literal wire JSON with expected decode results,
//!   pinning the protocol encoding across releases
//!
//! ## Golden Vectors
//!
//! ```rust
//! use walletmesh_testkit::vectors::all_vectors;
//!
//! for vector in all_vectors() {
//!     let message = walletmesh_sync::decode(vector.json.as_bytes()).unwrap();
//!     assert_eq!(message.kind(), vector.expected_kind);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use walletmesh_testkit::generators::wallet_snapshot;
//!
//! proptest! {
//!     #[test]
//!     fn merge_never_lowers_balance(snapshot in wallet_snapshot()) {
//!         // ...
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{funded_backend, multi_peer_fixtures, TestFixture};
pub use vectors::{all_vectors, GoldenVector};
