//! # Bridge Events
//!
//! Records emitted by burn and claim, consumed by off-ledger observers that
//! assemble claim bundles. Each event converts to and from an origin-ledger
//! [`Log`]:
//!
//! ```text
//! Transfer       topics [sig, from, to]   data [value]
//! ChainTransfer  topics [sig]             data [source, destination, recipient, amount]
//! ```
//!
//! A burn emits `Transfer(caller → 0)` then `ChainTransfer`; a claim emits
//! `Transfer(0 → recipient)` then the mirroring `ChainTransfer`.

use serde::{Deserialize, Serialize};
use xchain_core::{keccak256, Address, Bytes, Log, H256};

/// Signature of the ledger-native transfer event.
pub const TRANSFER_SIGNATURE: &str = "Transfer(address,address,uint256)";

/// Signature of the cross-chain transfer event.
pub const CHAIN_TRANSFER_SIGNATURE: &str = "ChainTransfer(address,address,address,uint256)";

/// Event emitted by a bridge instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum BridgeEvent {
    /// Ledger-native transfer; zero `to` is a burn, zero `from` a mint.
    Transfer {
        from: Address,
        to: Address,
        #[serde(with = "xchain_core::bytes::quantity")]
        value: u128,
    },
    /// Cross-chain burn or claim record.
    ChainTransfer {
        source: Address,
        destination: Address,
        recipient: Address,
        #[serde(with = "xchain_core::bytes::quantity")]
        amount: u128,
    },
}

fn amount_word(v: u128) -> [u8; 32] {
    let mut w = [0u8; 32];
    w[16..].copy_from_slice(&v.to_be_bytes());
    w
}

fn read_amount(w: &[u8]) -> Option<u128> {
    if w.len() != 32 || w[..16].iter().any(|b| *b != 0) {
        return None;
    }
    let mut low = [0u8; 16];
    low.copy_from_slice(&w[16..]);
    Some(u128::from_be_bytes(low))
}

fn read_address(w: &[u8]) -> Option<Address> {
    let mut word = [0u8; 32];
    if w.len() != 32 {
        return None;
    }
    word.copy_from_slice(w);
    Address::from_word(&word)
}

impl BridgeEvent {
    /// Topic 0 for the ledger-native transfer event.
    pub fn transfer_topic() -> H256 {
        keccak256(TRANSFER_SIGNATURE.as_bytes())
    }

    /// Topic 0 for the cross-chain transfer event.
    pub fn chain_transfer_topic() -> H256 {
        keccak256(CHAIN_TRANSFER_SIGNATURE.as_bytes())
    }

    /// Render as a log emitted by `emitter`.
    pub fn to_log(&self, emitter: Address) -> Log {
        match *self {
            Self::Transfer { from, to, value } => Log {
                address: emitter,
                topics: vec![
                    Self::transfer_topic(),
                    H256(from.to_word()),
                    H256(to.to_word()),
                ],
                data: Bytes(amount_word(value).to_vec()),
            },
            Self::ChainTransfer {
                source,
                destination,
                recipient,
                amount,
            } => {
                let mut data = Vec::with_capacity(128);
                data.extend_from_slice(&source.to_word());
                data.extend_from_slice(&destination.to_word());
                data.extend_from_slice(&recipient.to_word());
                data.extend_from_slice(&amount_word(amount));
                Log {
                    address: emitter,
                    topics: vec![Self::chain_transfer_topic()],
                    data: Bytes(data),
                }
            }
        }
    }

    /// Recognise a bridge event in a log. Returns `None` for any other log.
    pub fn from_log(log: &Log) -> Option<Self> {
        let sig = log.topics.first()?;
        if *sig == Self::transfer_topic() && log.topics.len() == 3 {
            return Some(Self::Transfer {
                from: Address::from_word(&log.topics[1].0)?,
                to: Address::from_word(&log.topics[2].0)?,
                value: read_amount(log.data.as_slice())?,
            });
        }
        if *sig == Self::chain_transfer_topic() && log.topics.len() == 1 && log.data.len() == 128 {
            let d = log.data.as_slice();
            return Some(Self::ChainTransfer {
                source: read_address(&d[..32])?,
                destination: read_address(&d[32..64])?,
                recipient: read_address(&d[64..96])?,
                amount: read_amount(&d[96..])?,
            });
        }
        None
    }
}
