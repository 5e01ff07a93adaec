//! Burn-call payload codec.
//!
//! A burn is a call to `transferToChain(address,address,uint256)` on the
//! source instance. The transaction payload is the 4-byte selector followed
//! by three 32-byte words: recipient, destination, amount. The destination
//! reads recipient and amount from the proven transaction, never from
//! fields supplied alongside the claim.

use thiserror::Error;
use xchain_core::bytes::encode_hex;
use xchain_core::{keccak256, Address};

/// Canonical signature of the burn call.
pub const BURN_SIGNATURE: &str = "transferToChain(address,address,uint256)";

/// First four bytes of `keccak256(BURN_SIGNATURE)`.
pub fn burn_selector() -> [u8; 4] {
    let h = keccak256(BURN_SIGNATURE.as_bytes());
    [h.0[0], h.0[1], h.0[2], h.0[3]]
}

const WORD: usize = 32;
const PAYLOAD_LEN: usize = 4 + 3 * WORD;

/// The payload is not a well-formed burn call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// Wrong payload length.
    #[error("expected 100 bytes, found {0}")]
    Length(usize),

    /// The selector is not the burn call's.
    #[error("selector {0} is not transferToChain")]
    Selector(String),

    /// An address word has non-zero high bytes.
    #[error("{0} word is not a left-padded address")]
    DirtyAddress(&'static str),

    /// The amount does not fit in 128 bits.
    #[error("amount exceeds 128 bits")]
    AmountOverflow,
}

/// Arguments of one burn call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurnCall {
    /// Account credited on the destination.
    pub recipient: Address,
    /// Destination instance.
    pub destination: Address,
    /// Smallest units burned.
    pub amount: u128,
}

impl BurnCall {
    /// ABI-encode as transaction payload.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(PAYLOAD_LEN);
        out.extend_from_slice(&burn_selector());
        out.extend_from_slice(&self.recipient.to_word());
        out.extend_from_slice(&self.destination.to_word());
        let mut amount = [0u8; WORD];
        amount[16..].copy_from_slice(&self.amount.to_be_bytes());
        out.extend_from_slice(&amount);
        out
    }

    /// Decode a transaction payload.
    pub fn decode(data: &[u8]) -> Result<Self, PayloadError> {
        if data.len() != PAYLOAD_LEN {
            return Err(PayloadError::Length(data.len()));
        }
        if data[..4] != burn_selector() {
            return Err(PayloadError::Selector(encode_hex(&data[..4])));
        }
        let word = |i: usize| -> [u8; WORD] {
            let mut w = [0u8; WORD];
            w.copy_from_slice(&data[4 + i * WORD..4 + (i + 1) * WORD]);
            w
        };
        let recipient = Address::from_word(&word(0)).ok_or(PayloadError::DirtyAddress("recipient"))?;
        let destination =
            Address::from_word(&word(1)).ok_or(PayloadError::DirtyAddress("destination"))?;
        let amount_word = word(2);
        if amount_word[..16].iter().any(|b| *b != 0) {
            return Err(PayloadError::AmountOverflow);
        }
        let mut low = [0u8; 16];
        low.copy_from_slice(&amount_word[16..]);
        Ok(Self {
            recipient,
            destination,
            amount: u128::from_be_bytes(low),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call() -> BurnCall {
        BurnCall {
            recipient: Address([0x11; 20]),
            destination: Address([0x22; 20]),
            amount: 1000,
        }
    }

    #[test]
    fn test_layout() {
        let data = call().encode();
        assert_eq!(data.len(), 100);
        assert_eq!(&data[..4], &burn_selector());
        assert_eq!(&data[4 + 12..4 + 32], &[0x11; 20]);
        assert_eq!(&data[4 + 32 + 12..4 + 64], &[0x22; 20]);
        assert_eq!(data[99], 0xe8);
        assert_eq!(data[98], 0x03);
        assert_eq!(BurnCall::decode(&data).unwrap(), call());
    }

    #[test]
    fn test_wrong_selector() {
        let mut data = call().encode();
        data[0] ^= 0xff;
        assert!(matches!(BurnCall::decode(&data), Err(PayloadError::Selector(_))));
    }

    #[test]
    fn test_wrong_length() {
        assert_eq!(BurnCall::decode(&[]), Err(PayloadError::Length(0)));
    }

    #[test]
    fn test_dirty_destination_word() {
        let mut data = call().encode();
        data[4 + 32] = 1;
        assert_eq!(BurnCall::decode(&data), Err(PayloadError::DirtyAddress("destination")));
    }

    #[test]
    fn test_amount_overflow() {
        let mut data = call().encode();
        data[4 + 64] = 1;
        assert_eq!(BurnCall::decode(&data), Err(PayloadError::AmountOverflow));
    }
}
