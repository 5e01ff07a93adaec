//! # xchain-trie — Commitment Trie and Proof Verifier
//!
//! The claimant rebuilds a block's transaction and receipt tries with
//! [`CommitmentTrie`], checks the roots against the header, and extracts a
//! [`Proof`] for one item. The destination (or a relay acting for it) checks
//! that proof with [`verify`] against nothing but the root digest.
//!
//! Both halves are pure computations over caller-supplied data and may run
//! in parallel without coordination.

pub mod error;
pub mod nibbles;
pub mod proof;
pub mod trie;
pub mod verify;

pub use error::{MalformedProof, ProofError};
pub use proof::Proof;
pub use trie::{index_key, CommitmentTrie, NodeId, EMPTY_ROOT};
pub use verify::{lookup, verify};
