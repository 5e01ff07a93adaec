//! # Block Header
//!
//! The origin ledger identifies a block by `keccak256(rlp(header))`. The
//! destination never constructs headers; it decodes a header supplied by a
//! claimant and recomputes its hash to ask the relay about it.
//!
//! ## Field Order
//!
//! ```text
//! [parent_hash, ommers_hash, beneficiary, state_root, transactions_root,
//!  receipts_root, logs_bloom, difficulty, number, gas_limit, gas_used,
//!  timestamp, extra_data, mix_hash, nonce, (base_fee_per_gas)]
//! ```
//!
//! The trailing base fee is present only on headers produced after the
//! fee-market fork. Later forks append further fields; those headers are
//! rejected with [`FormatError::FieldCount`].

use serde::{Deserialize, Serialize};

use crate::bytes::Bytes;
use crate::digest::H256;
use crate::error::FormatError;
use crate::identity::Address;
use crate::ledger::bloom::Bloom;
use crate::rlp::{FieldReader, RlpBytes, RlpDecode, RlpEncode, RlpItem};

/// 8-byte proof-of-work nonce.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockNonce(pub [u8; 8]);

crate::impl_fixed_bytes!(BlockNonce, 8);

/// A block header of the origin ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    pub parent_hash: H256,
    #[serde(alias = "sha3Uncles")]
    pub ommers_hash: H256,
    #[serde(alias = "miner")]
    pub beneficiary: Address,
    pub state_root: H256,
    pub transactions_root: H256,
    pub receipts_root: H256,
    pub logs_bloom: Bloom,
    #[serde(with = "crate::bytes::quantity")]
    pub difficulty: u128,
    #[serde(with = "crate::bytes::quantity")]
    pub number: u64,
    #[serde(with = "crate::bytes::quantity")]
    pub gas_limit: u64,
    #[serde(with = "crate::bytes::quantity")]
    pub gas_used: u64,
    #[serde(with = "crate::bytes::quantity")]
    pub timestamp: u64,
    pub extra_data: Bytes,
    pub mix_hash: H256,
    pub nonce: BlockNonce,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::bytes::quantity_opt"
    )]
    pub base_fee_per_gas: Option<u64>,
}

impl BlockHeader {
    /// Block hash: Keccak-256 of the full canonical encoding.
    pub fn hash(&self) -> H256 {
        RlpBytes::encode(self).keccak()
    }

    /// Hash of the header without its seal (mix hash and nonce), the
    /// input to proof-of-work verification.
    pub fn seal_hash(&self) -> H256 {
        RlpBytes::encode(&Unsealed(self)).keccak()
    }

    fn unsealed_fields(&self) -> Vec<RlpItem> {
        vec![
            RlpItem::bytes(self.parent_hash.0.to_vec()),
            RlpItem::bytes(self.ommers_hash.0.to_vec()),
            RlpItem::bytes(self.beneficiary.0.to_vec()),
            RlpItem::bytes(self.state_root.0.to_vec()),
            RlpItem::bytes(self.transactions_root.0.to_vec()),
            RlpItem::bytes(self.receipts_root.0.to_vec()),
            RlpItem::bytes(self.logs_bloom.0.to_vec()),
            RlpItem::uint(self.difficulty),
            RlpItem::uint(u128::from(self.number)),
            RlpItem::uint(u128::from(self.gas_limit)),
            RlpItem::uint(u128::from(self.gas_used)),
            RlpItem::uint(u128::from(self.timestamp)),
            RlpItem::bytes(self.extra_data.0.clone()),
        ]
    }
}

/// Header view that omits the seal fields.
struct Unsealed<'a>(&'a BlockHeader);

impl RlpEncode for Unsealed<'_> {
    fn rlp_item(&self) -> RlpItem {
        let mut fields = self.0.unsealed_fields();
        if let Some(fee) = self.0.base_fee_per_gas {
            fields.push(RlpItem::uint(u128::from(fee)));
        }
        RlpItem::list(fields)
    }
}

impl RlpEncode for BlockHeader {
    fn rlp_item(&self) -> RlpItem {
        let mut fields = self.unsealed_fields();
        fields.push(RlpItem::bytes(self.mix_hash.0.to_vec()));
        fields.push(RlpItem::bytes(self.nonce.0.to_vec()));
        if let Some(fee) = self.base_fee_per_gas {
            fields.push(RlpItem::uint(u128::from(fee)));
        }
        RlpItem::list(fields)
    }
}

impl RlpDecode for BlockHeader {
    fn from_rlp_item(item: &RlpItem) -> Result<Self, FormatError> {
        let mut r = FieldReader::new("BlockHeader", item, 15, 16)?;
        let header = Self {
            parent_hash: H256(r.fixed("parent_hash")?),
            ommers_hash: H256(r.fixed("ommers_hash")?),
            beneficiary: Address(r.fixed("beneficiary")?),
            state_root: H256(r.fixed("state_root")?),
            transactions_root: H256(r.fixed("transactions_root")?),
            receipts_root: H256(r.fixed("receipts_root")?),
            logs_bloom: Bloom(r.fixed("logs_bloom")?),
            difficulty: r.u128()?,
            number: r.u64()?,
            gas_limit: r.u64()?,
            gas_used: r.u64()?,
            timestamp: r.u64()?,
            extra_data: Bytes(r.bytes()?.to_vec()),
            mix_hash: H256(r.fixed("mix_hash")?),
            nonce: BlockNonce(r.fixed("nonce")?),
            base_fee_per_gas: if r.remaining() > 0 {
                Some(r.u64()?)
            } else {
                None
            },
        };
        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::keccak256;

    fn sample_header() -> BlockHeader {
        BlockHeader {
            parent_hash: H256([1; 32]),
            ommers_hash: H256::from_hex(
                "0x1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347",
            )
            .unwrap(),
            beneficiary: Address([2; 20]),
            state_root: H256([3; 32]),
            transactions_root: H256([4; 32]),
            receipts_root: H256([5; 32]),
            logs_bloom: Bloom::ZERO,
            difficulty: 131_072,
            number: 42,
            gas_limit: 6_721_975,
            gas_used: 21_000,
            timestamp: 1_600_000_000,
            extra_data: Bytes(b"xchain".to_vec()),
            mix_hash: H256::ZERO,
            nonce: BlockNonce([0, 0, 0, 0, 0, 0, 0, 0x2a]),
            base_fee_per_gas: None,
        }
    }

    fn mainnet_genesis() -> BlockHeader {
        BlockHeader {
            parent_hash: H256::ZERO,
            ommers_hash: H256::from_hex(
                "0x1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347",
            )
            .unwrap(),
            beneficiary: Address::ZERO,
            state_root: H256::from_hex(
                "0xd7f8974fb5ac78d9ac099b9ad5018bedc2ce0a72dad1827a1709da30580f0544",
            )
            .unwrap(),
            transactions_root: H256::from_hex(
                "0x56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421",
            )
            .unwrap(),
            receipts_root: H256::from_hex(
                "0x56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421",
            )
            .unwrap(),
            logs_bloom: Bloom::ZERO,
            difficulty: 0x4_0000_0000,
            number: 0,
            gas_limit: 5000,
            gas_used: 0,
            timestamp: 0,
            extra_data: Bytes::from_hex(
                "0x11bbe8db4e347b4e8c937c1c8370e4b5ed33adb3db69cbdb7a38e1e50b1b82fa",
            )
            .unwrap(),
            mix_hash: H256::ZERO,
            nonce: BlockNonce::from_hex("0x0000000000000042").unwrap(),
            base_fee_per_gas: None,
        }
    }

    #[test]
    fn test_mainnet_genesis_hash() {
        let genesis = mainnet_genesis();
        assert_eq!(
            genesis.hash().to_hex(),
            "0xd4e56740f876aef8c010b86a40d5f56745a118d0906a34e69aec8c0db1cb8fa3"
        );
        let raw = genesis.rlp_bytes();
        assert_eq!(&raw.as_bytes()[..3], &[0xf9, 0x02, 0x14]);
        assert_eq!(BlockHeader::decode_rlp(raw.as_bytes()).unwrap(), genesis);
    }

    #[test]
    fn test_header_round_trip_and_hash() {
        let h = sample_header();
        let raw = h.rlp_bytes();
        let back = BlockHeader::decode_rlp(raw.as_bytes()).unwrap();
        assert_eq!(back, h);
        assert_eq!(back.hash(), keccak256(raw.as_bytes()));
    }

    #[test]
    fn test_base_fee_is_sixteenth_field() {
        let mut h = sample_header();
        h.base_fee_per_gas = Some(7);
        let item = h.rlp_item();
        assert_eq!(item.as_list().unwrap().len(), 16);
        let back = BlockHeader::decode_rlp(&item.encode()).unwrap();
        assert_eq!(back.base_fee_per_gas, Some(7));
        assert_ne!(back.hash(), sample_header().hash());
    }

    #[test]
    fn test_seal_hash_ignores_seal() {
        let a = sample_header();
        let mut b = a.clone();
        b.nonce = BlockNonce([9; 8]);
        b.mix_hash = H256([9; 32]);
        assert_eq!(a.seal_hash(), b.seal_hash());
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn test_wrong_field_width_rejected() {
        let h = sample_header();
        let mut fields = h.rlp_item().as_list().unwrap().to_vec();
        fields[2] = RlpItem::bytes(vec![1; 19]);
        let err = BlockHeader::decode_rlp(&RlpItem::list(fields).encode()).unwrap_err();
        assert_eq!(
            err,
            FormatError::InvalidLength {
                field: "beneficiary",
                expected: 20,
                found: 19
            }
        );
    }

    #[test]
    fn test_too_few_fields_rejected() {
        let fields = sample_header().rlp_item().as_list().unwrap()[..14].to_vec();
        assert!(matches!(
            BlockHeader::decode_rlp(&RlpItem::list(fields).encode()),
            Err(FormatError::FieldCount { record: "BlockHeader", .. })
        ));
    }

    #[test]
    fn test_json_uses_ledger_field_names() {
        let h = sample_header();
        let v = serde_json::to_value(&h).unwrap();
        assert_eq!(v["number"], "0x2a");
        assert!(v.get("transactionsRoot").is_some());
        assert!(v.get("baseFeePerGas").is_none());
        let back: BlockHeader = serde_json::from_value(v).unwrap();
        assert_eq!(back, h);
    }
}
