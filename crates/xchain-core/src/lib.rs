//! # xchain-core — Foundational Types for the Cross-Chain Bridge
//!
//! This crate defines the primitives every other crate in the workspace
//! builds on: the canonical encoding used by the origin ledger, the digest
//! and identity newtypes, and the block, transaction, and receipt records
//! whose hashes the bridge must reproduce byte for byte.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for ledger primitives.** `H256`, `Address`,
//!    `Bloom`, `BlockNonce`, `Bytes`. No bare arrays or hex strings cross a
//!    crate boundary.
//!
//! 2. **`RlpBytes` newtype.** Every record digest flows through
//!    `RlpBytes::encode()` and `RlpBytes::keccak()`. A record can only be
//!    hashed over its canonical encoding.
//!
//! 3. **Strict decoding.** `RlpItem::decode` accepts only canonical input,
//!    so any record that decodes re-encodes to the same bytes and therefore
//!    the same hash.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `xchain-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod bytes;
pub mod digest;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod rlp;

// Re-export primary types for ergonomic imports.
pub use bytes::Bytes;
pub use digest::{keccak256, keccak256_concat, H256};
pub use error::{FormatError, HexError};
pub use identity::Address;
pub use ledger::{BlockHeader, BlockNonce, Bloom, Log, Receipt, Transaction};
pub use rlp::{RlpBytes, RlpDecode, RlpEncode, RlpItem};
