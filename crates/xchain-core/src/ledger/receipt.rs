//! Receipts and logs.
//!
//! A receipt encodes as `[status, cumulative_gas_used, logs_bloom, logs]`
//! and each log as `[address, [topic, ...], data]`. Status is the integer
//! 1 (success) or 0 (failure); pre-status receipts carrying an intermediate
//! state root are rejected.

use serde::{Deserialize, Serialize};

use crate::bytes::Bytes;
use crate::digest::H256;
use crate::error::FormatError;
use crate::identity::Address;
use crate::ledger::bloom::Bloom;
use crate::rlp::{FieldReader, RlpBytes, RlpDecode, RlpEncode, RlpItem};

/// A log emitted during transaction execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    pub address: Address,
    pub topics: Vec<H256>,
    pub data: Bytes,
}

/// The execution outcome of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub status: bool,
    #[serde(with = "crate::bytes::quantity")]
    pub cumulative_gas_used: u64,
    pub logs_bloom: Bloom,
    pub logs: Vec<Log>,
}

impl Receipt {
    /// Build a receipt whose bloom is derived from its logs.
    pub fn new(status: bool, cumulative_gas_used: u64, logs: Vec<Log>) -> Self {
        Self {
            status,
            cumulative_gas_used,
            logs_bloom: Bloom::from_logs(&logs),
            logs,
        }
    }

    /// True if the transaction executed successfully.
    pub fn is_success(&self) -> bool {
        self.status
    }

    /// Keccak-256 of the canonical encoding.
    pub fn hash(&self) -> H256 {
        RlpBytes::encode(self).keccak()
    }
}

impl RlpEncode for Log {
    fn rlp_item(&self) -> RlpItem {
        RlpItem::list(vec![
            RlpItem::bytes(self.address.0.to_vec()),
            RlpItem::list(
                self.topics
                    .iter()
                    .map(|t| RlpItem::bytes(t.0.to_vec()))
                    .collect(),
            ),
            RlpItem::bytes(self.data.0.clone()),
        ])
    }
}

impl RlpDecode for Log {
    fn from_rlp_item(item: &RlpItem) -> Result<Self, FormatError> {
        let mut r = FieldReader::new("Log", item, 3, 3)?;
        let address = Address(r.fixed("address")?);
        let topics = r
            .list()?
            .iter()
            .map(|t| {
                let b = t.as_bytes()?;
                H256::from_slice(b).map_err(|_| FormatError::InvalidLength {
                    field: "topic",
                    expected: H256::LEN,
                    found: b.len(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            address,
            topics,
            data: Bytes(r.bytes()?.to_vec()),
        })
    }
}

impl RlpEncode for Receipt {
    fn rlp_item(&self) -> RlpItem {
        RlpItem::list(vec![
            RlpItem::uint(u128::from(self.status)),
            RlpItem::uint(u128::from(self.cumulative_gas_used)),
            RlpItem::bytes(self.logs_bloom.0.to_vec()),
            RlpItem::list(self.logs.iter().map(Log::rlp_item).collect()),
        ])
    }
}

impl RlpDecode for Receipt {
    fn from_rlp_item(item: &RlpItem) -> Result<Self, FormatError> {
        let mut r = FieldReader::new("Receipt", item, 4, 4)?;
        let status = match r.bytes()? {
            [] => false,
            [1] => true,
            other => {
                return Err(FormatError::InvalidValue {
                    field: "status",
                    reason: format!("expected 0 or 1, found 0x{}", hex::encode(other)),
                })
            }
        };
        Ok(Self {
            status,
            cumulative_gas_used: r.u64()?,
            logs_bloom: Bloom(r.fixed("logs_bloom")?),
            logs: r
                .list()?
                .iter()
                .map(Log::from_rlp_item)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}
