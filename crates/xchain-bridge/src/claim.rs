//! # Claim Records
//!
//! A claim is identified by its fingerprint, the Keccak-256 of the RLP list
//! `[header, transaction, receipt]`. A fingerprint moves from absent to
//! claimed exactly once and never back.

use std::collections::HashSet;

use xchain_core::rlp::{RlpBytes, RlpEncode, RlpItem};
use xchain_core::{BlockHeader, Receipt, Transaction, H256};

/// The `(header, transaction, receipt)` triple being redeemed.
#[derive(Debug, Clone, Copy)]
pub struct ClaimTriple<'a> {
    pub header: &'a BlockHeader,
    pub transaction: &'a Transaction,
    pub receipt: &'a Receipt,
}

impl RlpEncode for ClaimTriple<'_> {
    fn rlp_item(&self) -> RlpItem {
        RlpItem::list(vec![
            self.header.rlp_item(),
            self.transaction.rlp_item(),
            self.receipt.rlp_item(),
        ])
    }
}

impl ClaimTriple<'_> {
    /// Replay-protection fingerprint.
    pub fn fingerprint(&self) -> H256 {
        RlpBytes::encode(self).keccak()
    }
}

/// Append-only set of claimed fingerprints.
#[derive(Debug, Clone, Default)]
pub struct ClaimSet {
    claimed: HashSet<H256>,
}

impl ClaimSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `fingerprint` has been claimed.
    pub fn contains(&self, fingerprint: &H256) -> bool {
        self.claimed.contains(fingerprint)
    }

    /// Record `fingerprint`. Returns `false` if it was already present.
    pub fn record(&mut self, fingerprint: H256) -> bool {
        self.claimed.insert(fingerprint)
    }

    /// Number of claims recorded.
    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    /// True if nothing has been claimed.
    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}
