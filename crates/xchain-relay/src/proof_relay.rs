//! # Proof-Checking Relay
//!
//! A [`RelayOracle`] that answers inclusion questions itself, by running
//! the proof verifier over claimant-supplied proofs, and delegates only
//! header trust. Trusted header hashes are fed in by whatever component
//! follows the origin chain (`trust_header`); this type does not judge
//! consensus.
//!
//! ## Answers
//!
//! | Condition                                 | Answer                 |
//! |-------------------------------------------|------------------------|
//! | header hash not trusted                   | `Ok(false)`            |
//! | proof or key path missing                 | `Err(MissingWitness)`  |
//! | proof shows item under the root           | `Ok(true)`             |
//! | proof shows item absent, or is corrupt    | `Ok(false)`            |

use std::collections::HashSet;

use parking_lot::RwLock;
use xchain_core::H256;
use xchain_trie::{verify, ProofError};

use crate::error::RelayError;
use crate::oracle::{InclusionQuery, RelayOracle};

/// Relay that verifies trie proofs against trusted headers.
#[derive(Debug, Default)]
pub struct ProofRelay {
    trusted: RwLock<HashSet<H256>>,
}

impl ProofRelay {
    /// A relay that trusts no header yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// A relay trusting the given header hashes.
    pub fn with_trusted(hashes: impl IntoIterator<Item = H256>) -> Self {
        Self {
            trusted: RwLock::new(hashes.into_iter().collect()),
        }
    }

    /// Mark a header hash as part of the canonical origin chain.
    pub fn trust_header(&self, hash: H256) {
        if self.trusted.write().insert(hash) {
            tracing::debug!(header = %hash, "header trusted");
        }
    }

    /// Is the header hash trusted?
    pub fn is_trusted(&self, hash: &H256) -> bool {
        self.trusted.read().contains(hash)
    }

    fn check(&self, kind: &'static str, root: &H256, query: &InclusionQuery<'_>) -> Result<bool, RelayError> {
        let header_hash = query.header.hash();
        if !self.is_trusted(&header_hash) {
            tracing::debug!(header = %header_hash, kind, "inclusion query against untrusted header");
            return Ok(false);
        }
        let (Some(proof), Some(path)) = (query.proof, query.path) else {
            return Err(RelayError::MissingWitness { kind });
        };
        match verify(root, path, proof, query.item) {
            Ok(()) => Ok(true),
            Err(ProofError::NotIncluded) => {
                tracing::debug!(header = %header_hash, kind, "proof shows item not included");
                Ok(false)
            }
            Err(ProofError::Malformed(reason)) => {
                tracing::warn!(header = %header_hash, kind, %reason, "malformed inclusion proof");
                Ok(false)
            }
        }
    }
}

impl RelayOracle for ProofRelay {
    fn verify_transaction(&self, query: &InclusionQuery<'_>) -> Result<bool, RelayError> {
        self.check("transaction", &query.header.transactions_root, query)
    }

    fn verify_receipt(&self, query: &InclusionQuery<'_>) -> Result<bool, RelayError> {
        self.check("receipt", &query.header.receipts_root, query)
    }
}
