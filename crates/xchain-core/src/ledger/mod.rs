//! # Origin-Ledger Records
//!
//! The fixed-shape records whose canonical encodings the origin ledger
//! hashes and commits to: block headers, legacy transactions, receipts and
//! their logs, plus the 2048-bit log bloom.
//!
//! Each record implements [`RlpEncode`](crate::rlp::RlpEncode) and
//! [`RlpDecode`](crate::rlp::RlpDecode). Decoding is strict, so a record
//! decoded from bytes re-encodes to exactly those bytes and its `hash()`
//! equals the Keccak-256 of the submitted encoding.
//!
//! Only the legacy (untyped) transaction and receipt envelopes are
//! supported.

pub mod bloom;
pub mod header;
pub mod receipt;
pub mod transaction;

pub use bloom::Bloom;
pub use header::{BlockHeader, BlockNonce};
pub use receipt::{Log, Receipt};
pub use transaction::Transaction;
