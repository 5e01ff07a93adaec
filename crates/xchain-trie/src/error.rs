//! Proof verification outcomes.
//!
//! A rejected proof is either [`ProofError::NotIncluded`] (the proof is
//! internally consistent and shows the key absent or bound to a different
//! value) or [`ProofError::Malformed`] (the proof is corrupt and proves
//! nothing either way).

use thiserror::Error;
use xchain_core::FormatError;

/// Proof verification failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    /// The key is absent under the root, or bound to another value.
    #[error("key is not included under the given root")]
    NotIncluded,

    /// The proof does not describe a path from the root.
    #[error("malformed proof: {0}")]
    Malformed(#[from] MalformedProof),
}

/// Why a proof is corrupt. `depth` is the index of the offending node.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedProof {
    /// A node's Keccak-256 differs from the reference its parent holds.
    #[error("node {depth}: hash does not match parent reference")]
    HashMismatch {
        /// Offending node index.
        depth: usize,
    },

    /// An embedded node differs from the bytes its parent embeds.
    #[error("node {depth}: does not match inline reference")]
    InlineMismatch {
        /// Offending node index.
        depth: usize,
    },

    /// The path continues past the last node supplied.
    #[error("proof exhausted after {depth} nodes")]
    Exhausted {
        /// Nodes consumed.
        depth: usize,
    },

    /// Nodes remain after the path terminated.
    #[error("path terminated at node {depth} with {extra} nodes left over")]
    TrailingNodes {
        /// Terminal node index.
        depth: usize,
        /// Unused node count.
        extra: usize,
    },

    /// A node is not canonical RLP.
    #[error("node {depth}: {source}")]
    Undecodable {
        /// Offending node index.
        depth: usize,
        /// Decoder failure.
        source: FormatError,
    },

    /// A node is neither a 2-item leaf/extension nor a 17-item branch.
    #[error("node {depth}: expected 2 or 17 items, found {found}")]
    UnexpectedArity {
        /// Offending node index.
        depth: usize,
        /// Item count found.
        found: usize,
    },

    /// A child slot holds something other than empty, a 32-byte hash, or
    /// an embedded node shorter than 32 bytes.
    #[error("node {depth}: invalid child reference")]
    BadChildRef {
        /// Offending node index.
        depth: usize,
    },

    /// A leaf/extension path has an invalid hex-prefix header.
    #[error("node {depth}: invalid hex-prefix path")]
    BadHexPrefix {
        /// Offending node index.
        depth: usize,
    },
}
