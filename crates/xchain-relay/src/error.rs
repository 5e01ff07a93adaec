//! Errors raised by relay oracles and by claim bundle assembly.

use thiserror::Error;
use xchain_core::H256;

/// A relay oracle could not answer. Aborts the enclosing operation; the
/// bridge never retries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// The oracle checks proofs and the query carried none.
    #[error("{kind} inclusion query carries no proof or key path")]
    MissingWitness {
        /// `"transaction"` or `"receipt"`.
        kind: &'static str,
    },

    /// The oracle's backing source is unreachable.
    #[error("relay unavailable: {0}")]
    Unavailable(String),
}

/// A claim bundle could not be assembled from a block.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    /// The transaction and receipt lists differ in length.
    #[error("block has {transactions} transactions but {receipts} receipts")]
    CountMismatch {
        /// Transactions supplied.
        transactions: usize,
        /// Receipts supplied.
        receipts: usize,
    },

    /// No item at the requested index.
    #[error("index {index} out of range for block with {len} transactions")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Items in the block.
        len: usize,
    },

    /// The rebuilt trie root differs from the one in the header.
    #[error("{which} root mismatch: header commits to {expected}, items produce {computed}")]
    RootMismatch {
        /// `"transactions"` or `"receipts"`.
        which: &'static str,
        /// Root in the header.
        expected: H256,
        /// Root of the rebuilt trie.
        computed: H256,
    },
}
