//! # Devnet — In-Process Origin Ledger
//!
//! A minimal stand-in for the origin chain, used by scenario tests and the
//! CLI demo. It executes burn calls against a [`BridgeToken`], wraps each in
//! a legacy transaction and a receipt carrying the emitted logs, and seals
//! pending transactions into blocks whose transactions and receipts roots
//! come from the commitment trie.
//!
//! Transactions are signature-shaped, not signed: `r` and `s` are derived
//! deterministically from the sender and nonce.

use std::collections::HashMap;

use thiserror::Error;
use xchain_core::{
    keccak256_concat, Address, BlockHeader, BlockNonce, Bloom, Bytes, Log, Receipt, Transaction,
    H256,
};
use xchain_relay::{assemble_claim, AssemblyError, BlockTries, ClaimBundle};

use crate::error::BridgeError;
use crate::event::BridgeEvent;
use crate::payload::BurnCall;
use crate::token::BridgeToken;

const BURN_GAS: u64 = 52_000;
const FAILED_GAS: u64 = 24_000;
const PLAIN_GAS: u64 = 21_000;
const GAS_LIMIT: u64 = 6_721_975;
const GAS_PRICE: u128 = 20_000_000_000;
const BLOCK_TIME: u64 = 12;
const GENESIS_TIME: u64 = 1_600_000_000;
/// Largest chain id whose EIP-155 `v` (`chain_id * 2 + 35`) fits in a `u64`.
pub const MAX_CHAIN_ID: u64 = (u64::MAX - 35) / 2;
const EMPTY_OMMERS: H256 = H256([
    0x1d, 0xcc, 0x4d, 0xe8, 0xde, 0xc7, 0x5d, 0x7a, 0xab, 0x85, 0xb5, 0x67, 0xb6, 0xcc, 0xd4, 0x1a,
    0xd3, 0x12, 0x45, 0x1b, 0x94, 0x8a, 0x74, 0x13, 0xf0, 0xa1, 0x42, 0xfd, 0x40, 0xd4, 0x93, 0x47,
]);

/// Devnet failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DevnetError {
    /// No sealed block with this number.
    #[error("unknown block {0}")]
    UnknownBlock(u64),

    /// `chain_id * 2 + 35` does not fit the transaction's `v` field.
    #[error("chain id {0} is too large for replay-protected v")]
    ChainIdTooLarge(u64),

    /// The block's items do not reproduce its roots.
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}

/// A sealed block with its full item lists.
#[derive(Debug, Clone)]
pub struct SealedBlock {
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
    pub receipts: Vec<Receipt>,
}

/// Where a submitted transaction landed, and what the call returned.
#[derive(Debug, Clone)]
pub struct Submitted {
    /// Number of the block the transaction will be sealed into.
    pub block: u64,
    /// Index within that block.
    pub index: usize,
    /// Transaction hash.
    pub hash: H256,
    /// Outcome of the burn call.
    pub outcome: Result<Vec<BridgeEvent>, BridgeError>,
}

/// In-process origin ledger.
#[derive(Debug)]
pub struct Devnet {
    chain_id: u64,
    v: u64,
    blocks: Vec<SealedBlock>,
    pending: Vec<(Transaction, Receipt)>,
    nonces: HashMap<Address, u64>,
}

impl Devnet {
    /// A chain with no blocks yet. Fails when `chain_id` cannot be folded
    /// into an EIP-155 `v` value.
    pub fn new(chain_id: u64) -> Result<Self, DevnetError> {
        let v = chain_id
            .checked_mul(2)
            .and_then(|x| x.checked_add(35))
            .ok_or(DevnetError::ChainIdTooLarge(chain_id))?;
        Ok(Self {
            chain_id,
            v,
            blocks: Vec::new(),
            pending: Vec::new(),
            nonces: HashMap::new(),
        })
    }

    /// Chain identifier (used in `v`).
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Number the next sealed block will carry.
    pub fn next_block_number(&self) -> u64 {
        self.blocks.len() as u64 + 1
    }

    fn next_nonce(&mut self, sender: Address) -> u64 {
        let n = self.nonces.entry(sender).or_insert(0);
        let nonce = *n;
        *n += 1;
        nonce
    }

    fn cumulative_gas(&self) -> u64 {
        self.pending
            .last()
            .map(|(_, r)| r.cumulative_gas_used)
            .unwrap_or(0)
    }

    fn build_tx(&mut self, sender: Address, to: Address, data: Vec<u8>) -> Transaction {
        let nonce = self.next_nonce(sender);
        let r = keccak256_concat(&[sender.as_ref(), &nonce.to_be_bytes()]);
        let s = keccak256_concat(&[r.as_ref(), b"s"]);
        Transaction {
            nonce,
            gas_price: GAS_PRICE,
            gas_limit: 100_000,
            to: Some(to),
            value: 0,
            data: Bytes(data),
            v: self.v,
            r,
            s,
        }
    }

    fn push(&mut self, tx: Transaction, status: bool, gas: u64, logs: Vec<Log>) -> (usize, H256) {
        let receipt = Receipt::new(status, self.cumulative_gas() + gas, logs);
        let hash = tx.hash();
        self.pending.push((tx, receipt));
        (self.pending.len() - 1, hash)
    }

    /// Execute `transferToChain` on `token` as `caller` and queue the
    /// resulting transaction. A rejected call still lands, with a failed
    /// receipt and no logs.
    pub fn submit_burn(
        &mut self,
        token: &BridgeToken,
        caller: Address,
        recipient: Address,
        destination: Address,
        amount: u128,
    ) -> Submitted {
        let data = BurnCall {
            recipient,
            destination,
            amount,
        }
        .encode();
        let tx = self.build_tx(caller, token.identity(), data);
        let outcome = token.transfer_to_chain(caller, recipient, destination, amount);
        let (index, hash) = match &outcome {
            Ok(events) => {
                let logs = events.iter().map(|e| e.to_log(token.identity())).collect();
                self.push(tx, true, BURN_GAS, logs)
            }
            Err(_) => self.push(tx, false, FAILED_GAS, Vec::new()),
        };
        tracing::debug!(
            block = self.next_block_number(),
            index,
            tx = %hash,
            ok = outcome.is_ok(),
            "burn submitted"
        );
        Submitted {
            block: self.next_block_number(),
            index,
            hash,
            outcome,
        }
    }

    /// Queue an unrelated successful transaction.
    pub fn submit_plain(&mut self, sender: Address, to: Address, data: Vec<u8>) -> (usize, H256) {
        let tx = self.build_tx(sender, to, data);
        self.push(tx, true, PLAIN_GAS, Vec::new())
    }

    /// Seal pending transactions into a new block.
    pub fn seal(&mut self) -> Result<&SealedBlock, DevnetError> {
        let (transactions, receipts): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.pending).into_iter().unzip();
        let tries = BlockTries::build(&transactions, &receipts)?;
        let mut logs_bloom = Bloom::ZERO;
        for r in &receipts {
            logs_bloom.union(&r.logs_bloom);
        }
        let number = self.next_block_number();
        let parent_hash = self.blocks.last().map(|b| b.header.hash()).unwrap_or_default();
        let header = BlockHeader {
            parent_hash,
            ommers_hash: EMPTY_OMMERS,
            beneficiary: Address::ZERO,
            state_root: keccak256_concat(&[parent_hash.as_ref(), &number.to_be_bytes()]),
            transactions_root: tries.transactions.root(),
            receipts_root: tries.receipts.root(),
            logs_bloom,
            difficulty: 1,
            number,
            gas_limit: GAS_LIMIT,
            gas_used: receipts.last().map(|r| r.cumulative_gas_used).unwrap_or(0),
            timestamp: GENESIS_TIME + number * BLOCK_TIME,
            extra_data: Bytes::new(),
            mix_hash: H256::ZERO,
            nonce: BlockNonce::ZERO,
            base_fee_per_gas: None,
        };
        tracing::debug!(
            number,
            hash = %header.hash(),
            transactions = transactions.len(),
            "block sealed"
        );
        self.blocks.push(SealedBlock {
            header,
            transactions,
            receipts,
        });
        let last = self.blocks.len() - 1;
        Ok(&self.blocks[last])
    }

    /// A sealed block by number.
    pub fn block(&self, number: u64) -> Option<&SealedBlock> {
        let idx = usize::try_from(number.checked_sub(1)?).ok()?;
        self.blocks.get(idx)
    }

    /// All sealed blocks, oldest first.
    pub fn blocks(&self) -> &[SealedBlock] {
        &self.blocks
    }

    /// Assemble the claim bundle for transaction `index` of block `number`.
    pub fn claim_bundle(&self, number: u64, index: usize) -> Result<ClaimBundle, DevnetError> {
        let block = self.block(number).ok_or(DevnetError::UnknownBlock(number))?;
        Ok(assemble_claim(
            &block.header,
            &block.transactions,
            &block.receipts,
            index,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::UNIT;
    use std::sync::Arc;
    use xchain_core::keccak256;
    use xchain_relay::StubRelay;

    #[test]
    fn test_empty_ommers_constant() {
        assert_eq!(EMPTY_OMMERS, keccak256(&[0xc0]));
    }

    #[test]
    fn test_seal_links_blocks_and_commits_items() {
        let mut net = Devnet::new(1337).unwrap();
        net.submit_plain(Address([1; 20]), Address([2; 20]), vec![1, 2, 3]);
        let first = net.seal().unwrap().header.clone();
        assert_eq!(first.number, 1);
        net.submit_plain(Address([1; 20]), Address([2; 20]), vec![]);
        let second = net.seal().unwrap().header.clone();
        assert_eq!(second.parent_hash, first.hash());
        assert_eq!(net.block(2).unwrap().transactions[0].nonce, 1);
        assert!(net.block(0).is_none());
        assert!(net.claim_bundle(2, 0).is_ok());
    }

    #[test]
    fn test_rejected_burn_lands_with_failed_receipt() {
        let token = BridgeToken::deploy(
            Address([1; 20]),
            Address([0xaa; 20]),
            UNIT,
            Arc::new(StubRelay::new(true, true)),
        )
        .unwrap();
        let mut net = Devnet::new(1).unwrap();
        let caller = Address([0xaa; 20]);
        let sub = net.submit_burn(&token, caller, caller, Address([2; 20]), 5);
        assert!(sub.outcome.is_err());
        let block = net.seal().unwrap();
        assert!(!block.receipts[sub.index].is_success());
        assert!(block.receipts[sub.index].logs.is_empty());
    }

    #[test]
    fn test_empty_block_has_empty_roots() {
        let mut net = Devnet::new(1).unwrap();
        let header = net.seal().unwrap().header.clone();
        assert_eq!(header.transactions_root, xchain_trie::EMPTY_ROOT);
        assert_eq!(header.receipts_root, xchain_trie::EMPTY_ROOT);
    }

    #[test]
    fn test_chain_id_bounds_for_v() {
        let max = MAX_CHAIN_ID;
        let mut net = Devnet::new(max).unwrap();
        net.submit_plain(Address([1; 20]), Address([2; 20]), vec![]);
        assert_eq!(net.seal().unwrap().transactions[0].v, u64::MAX);
        assert_eq!(
            Devnet::new(max + 1).unwrap_err(),
            DevnetError::ChainIdTooLarge(max + 1)
        );
        assert!(Devnet::new(u64::MAX).is_err());
        let mut mainnet = Devnet::new(1).unwrap();
        assert_eq!(mainnet.build_tx(Address([1; 20]), Address([2; 20]), vec![]).v, 37);
    }
}
