//! # Claim Bundle Assembly
//!
//! Runs on the claimant's side, off the destination ledger, and is not
//! trusted by it. Given an origin block's header and its full ordered
//! transaction and receipt lists, rebuilds both commitment tries, checks
//! that they reproduce the roots the header commits to, and extracts the
//! proofs for one transaction index.
//!
//! The resulting [`ClaimBundle`] is the input to the destination's claim
//! operation. Every field of it is re-derived and re-checked there.

use serde::{Deserialize, Serialize};
use xchain_core::rlp::RlpEncode;
use xchain_core::{BlockHeader, Bytes, Receipt, Transaction};
use xchain_trie::{index_key, CommitmentTrie, Proof};

use crate::error::AssemblyError;

/// Everything a claimant submits to redeem one burn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimBundle {
    /// Canonical header encoding.
    pub header: Bytes,
    /// Canonical transaction encoding.
    pub transaction: Bytes,
    /// Canonical receipt encoding.
    pub receipt: Bytes,
    /// Transactions-trie proof, root first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_proof: Option<Proof>,
    /// Receipts-trie proof, root first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_proof: Option<Proof>,
    /// Trie key shared by both proofs: `rlp(index)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Bytes>,
}

impl ClaimBundle {
    /// A bundle without proof material, for oracles that check inclusion
    /// themselves.
    pub fn without_proofs(header: &BlockHeader, tx: &Transaction, receipt: &Receipt) -> Self {
        Self {
            header: Bytes(header.rlp_bytes().into_vec()),
            transaction: Bytes(tx.rlp_bytes().into_vec()),
            receipt: Bytes(receipt.rlp_bytes().into_vec()),
            tx_proof: None,
            receipt_proof: None,
            path: None,
        }
    }

    /// Drop the proof material.
    pub fn strip_proofs(mut self) -> Self {
        self.tx_proof = None;
        self.receipt_proof = None;
        self.path = None;
        self
    }
}

/// The rebuilt tries of one origin block.
#[derive(Debug, Clone)]
pub struct BlockTries {
    /// Transactions trie keyed by `rlp(index)`.
    pub transactions: CommitmentTrie,
    /// Receipts trie keyed by `rlp(index)`.
    pub receipts: CommitmentTrie,
}

impl BlockTries {
    /// Rebuild both tries from a block's items.
    pub fn build(transactions: &[Transaction], receipts: &[Receipt]) -> Result<Self, AssemblyError> {
        if transactions.len() != receipts.len() {
            return Err(AssemblyError::CountMismatch {
                transactions: transactions.len(),
                receipts: receipts.len(),
            });
        }
        Ok(Self {
            transactions: CommitmentTrie::from_items(
                transactions.iter().map(|t| t.rlp_bytes().into_vec()),
            ),
            receipts: CommitmentTrie::from_items(receipts.iter().map(|r| r.rlp_bytes().into_vec())),
        })
    }

    /// Fail unless both roots equal the ones committed in `header`.
    pub fn check_roots(&self, header: &BlockHeader) -> Result<(), AssemblyError> {
        let tx_root = self.transactions.root();
        if tx_root != header.transactions_root {
            return Err(AssemblyError::RootMismatch {
                which: "transactions",
                expected: header.transactions_root,
                computed: tx_root,
            });
        }
        let receipt_root = self.receipts.root();
        if receipt_root != header.receipts_root {
            return Err(AssemblyError::RootMismatch {
                which: "receipts",
                expected: header.receipts_root,
                computed: receipt_root,
            });
        }
        Ok(())
    }
}

/// Assemble the claim bundle for the transaction at `index`.
///
/// # Errors
///
/// [`AssemblyError`] if the lists differ in length, `index` is out of
/// range, or the rebuilt roots disagree with `header`.
pub fn assemble_claim(
    header: &BlockHeader,
    transactions: &[Transaction],
    receipts: &[Receipt],
    index: usize,
) -> Result<ClaimBundle, AssemblyError> {
    let tries = BlockTries::build(transactions, receipts)?;
    tries.check_roots(header)?;
    let (Some(tx), Some(receipt)) = (transactions.get(index), receipts.get(index)) else {
        return Err(AssemblyError::IndexOutOfRange {
            index,
            len: transactions.len(),
        });
    };
    let key = index_key(index);
    let mut bundle = ClaimBundle::without_proofs(header, tx, receipt);
    bundle.tx_proof = Some(tries.transactions.prove(&key));
    bundle.receipt_proof = Some(tries.receipts.prove(&key));
    bundle.path = Some(Bytes(key));
    Ok(bundle)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use xchain_core::{Address, BlockHeader, BlockNonce, Bloom, Bytes, Log, Receipt, Transaction, H256};

    use super::BlockTries;

    pub(crate) fn block(n: u8) -> (BlockHeader, Vec<Transaction>, Vec<Receipt>) {
        let txs: Vec<Transaction> = (0..n)
            .map(|i| Transaction {
                nonce: u64::from(i),
                gas_price: 1,
                gas_limit: 50_000,
                to: Some(Address([i; 20])),
                value: 0,
                data: Bytes(vec![i; 68]),
                v: 27,
                r: H256([i.wrapping_add(1); 32]),
                s: H256([2; 32]),
            })
            .collect();
        let receipts: Vec<Receipt> = (0..n)
            .map(|i| {
                Receipt::new(
                    i % 3 != 2,
                    21_000 * (u64::from(i) + 1),
                    vec![Log {
                        address: Address([i; 20]),
                        topics: vec![H256([i; 32])],
                        data: Bytes::new(),
                    }],
                )
            })
            .collect();
        let tries = BlockTries::build(&txs, &receipts).unwrap();
        let header = BlockHeader {
            parent_hash: H256([9; 32]),
            ommers_hash: H256::ZERO,
            beneficiary: Address::ZERO,
            state_root: H256::ZERO,
            transactions_root: tries.transactions.root(),
            receipts_root: tries.receipts.root(),
            logs_bloom: Bloom::ZERO,
            difficulty: 2,
            number: 100,
            gas_limit: 8_000_000,
            gas_used: 21_000 * u64::from(n),
            timestamp: 1_700_000_000,
            extra_data: Bytes::new(),
            mix_hash: H256::ZERO,
            nonce: BlockNonce::ZERO,
            base_fee_per_gas: None,
        };
        (header, txs, receipts)
    }
}
