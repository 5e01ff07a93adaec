//! # Relay Oracle
//!
//! The destination ledger trusts an external relay to say whether a
//! transaction and its receipt belong to a canonical origin block. How the
//! relay decides that a header is canonical (consensus, finality, fork
//! choice) is outside this workspace.
//!
//! ## Architecture
//!
//! [`RelayOracle`] is a single capability with two questions. It is backed
//! either by a precomputed answer ([`StubRelay`]) or by running the proof
//! verifier over caller-supplied proofs against headers the relay already
//! trusts ([`ProofRelay`](crate::ProofRelay)). The bridge is indifferent to
//! which.
//!
//! ## Security Invariant
//!
//! An oracle must answer `Ok(true)` only when the queried bytes are the
//! exact encoding of an item committed under the queried header's
//! respective root, and the header belongs to the trusted chain. A `true`
//! answer for anything else allows a forged burn to mint.

use xchain_core::BlockHeader;
use xchain_trie::Proof;

use crate::error::RelayError;

/// One inclusion question: is `item` committed under `header`?
#[derive(Debug, Clone, Copy)]
pub struct InclusionQuery<'a> {
    /// The decoded header the item claims to belong to.
    pub header: &'a BlockHeader,
    /// The item's canonical encoding, exactly as submitted.
    pub item: &'a [u8],
    /// Trie nodes from the header's root towards `path`, if supplied.
    pub proof: Option<&'a Proof>,
    /// Trie key of the item (`rlp(index)`), if supplied.
    pub path: Option<&'a [u8]>,
}

impl<'a> InclusionQuery<'a> {
    /// A query without proof material.
    pub fn new(header: &'a BlockHeader, item: &'a [u8]) -> Self {
        Self {
            header,
            item,
            proof: None,
            path: None,
        }
    }

    /// Attach proof material.
    pub fn with_witness(mut self, proof: Option<&'a Proof>, path: Option<&'a [u8]>) -> Self {
        self.proof = proof;
        self.path = path;
        self
    }
}

/// Trust anchor for origin-ledger inclusion.
///
/// `Ok(false)` means "not included"; `Err` means the oracle could not
/// answer and the enclosing operation must fail.
pub trait RelayOracle: Send + Sync {
    /// Is the transaction included under the header's transactions root?
    fn verify_transaction(&self, query: &InclusionQuery<'_>) -> Result<bool, RelayError>;

    /// Is the receipt included under the header's receipts root?
    fn verify_receipt(&self, query: &InclusionQuery<'_>) -> Result<bool, RelayError>;
}

/// Oracle with fixed answers, for tests and for deployments where header
/// and inclusion checks are settled out of band.
///
/// ## Warning
///
/// Provides no security. `StubRelay::new(true, true)` approves every claim
/// whose other preconditions hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StubRelay {
    transaction_answer: bool,
    receipt_answer: bool,
}

impl StubRelay {
    /// Create a stub answering every transaction query with
    /// `transaction_answer` and every receipt query with `receipt_answer`.
    pub fn new(transaction_answer: bool, receipt_answer: bool) -> Self {
        Self {
            transaction_answer,
            receipt_answer,
        }
    }
}

impl RelayOracle for StubRelay {
    fn verify_transaction(&self, _query: &InclusionQuery<'_>) -> Result<bool, RelayError> {
        Ok(self.transaction_answer)
    }

    fn verify_receipt(&self, _query: &InclusionQuery<'_>) -> Result<bool, RelayError> {
        Ok(self.receipt_answer)
    }
}
