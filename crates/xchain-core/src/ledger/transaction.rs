//! Legacy (untyped) transactions.
//!
//! `r` and `s` are 256-bit integers; they encode minimally and decode
//! left-padded to 32 bytes so that hashing round-trips.

use serde::{Deserialize, Serialize};

use crate::bytes::Bytes;
use crate::digest::H256;
use crate::error::FormatError;
use crate::identity::Address;
use crate::rlp::{trim_leading_zeros, FieldReader, RlpBytes, RlpDecode, RlpEncode, RlpItem};

/// A signed legacy transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(with = "crate::bytes::quantity")]
    pub nonce: u64,
    #[serde(with = "crate::bytes::quantity")]
    pub gas_price: u128,
    #[serde(with = "crate::bytes::quantity", alias = "gas")]
    pub gas_limit: u64,
    /// `None` for contract creation.
    pub to: Option<Address>,
    #[serde(with = "crate::bytes::quantity")]
    pub value: u128,
    #[serde(alias = "input")]
    pub data: Bytes,
    #[serde(with = "crate::bytes::quantity")]
    pub v: u64,
    pub r: H256,
    pub s: H256,
}

impl Transaction {
    /// Transaction hash: Keccak-256 of the canonical encoding.
    pub fn hash(&self) -> H256 {
        RlpBytes::encode(self).keccak()
    }
}

impl RlpEncode for Transaction {
    fn rlp_item(&self) -> RlpItem {
        RlpItem::list(vec![
            RlpItem::uint(u128::from(self.nonce)),
            RlpItem::uint(self.gas_price),
            RlpItem::uint(u128::from(self.gas_limit)),
            match &self.to {
                Some(a) => RlpItem::bytes(a.0.to_vec()),
                None => RlpItem::bytes(Vec::new()),
            },
            RlpItem::uint(self.value),
            RlpItem::bytes(self.data.0.clone()),
            RlpItem::uint(u128::from(self.v)),
            RlpItem::bytes(trim_leading_zeros(&self.r.0).to_vec()),
            RlpItem::bytes(trim_leading_zeros(&self.s.0).to_vec()),
        ])
    }
}

impl RlpDecode for Transaction {
    fn from_rlp_item(item: &RlpItem) -> Result<Self, FormatError> {
        let mut r = FieldReader::new("Transaction", item, 9, 9)?;
        let nonce = r.u64()?;
        let gas_price = r.u128()?;
        let gas_limit = r.u64()?;
        let to = match r.bytes()? {
            [] => None,
            b if b.len() == Address::LEN => {
                let mut a = [0u8; 20];
                a.copy_from_slice(b);
                Some(Address(a))
            }
            b => {
                return Err(FormatError::InvalidLength {
                    field: "to",
                    expected: Address::LEN,
                    found: b.len(),
                })
            }
        };
        Ok(Self {
            nonce,
            gas_price,
            gas_limit,
            to,
            value: r.u128()?,
            data: Bytes(r.bytes()?.to_vec()),
            v: r.u64()?,
            r: H256(r.u256_word()?),
            s: H256(r.u256_word()?),
        })
    }
}
