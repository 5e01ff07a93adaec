//! Membership proofs.
//!
//! A [`Proof`] is the ordered list of node encodings on the path from the
//! root towards a key, root first. Embedded (inline) nodes appear in the
//! list as well as inside their parent. A proof means nothing without the
//! `(root, key)` pair it was generated against.
//!
//! On the wire a proof is a single RLP list whose items are the node
//! encodings as byte strings.

use serde::{Deserialize, Serialize};
use xchain_core::rlp::{RlpDecode, RlpEncode, RlpItem};
use xchain_core::{Bytes, FormatError};

/// Ordered trie node encodings, root first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Proof {
    nodes: Vec<Bytes>,
}

impl Proof {
    /// Build a proof from node encodings, root first.
    pub fn new(nodes: Vec<Vec<u8>>) -> Self {
        Self {
            nodes: nodes.into_iter().map(Bytes).collect(),
        }
    }

    /// The node encodings, root first.
    pub fn nodes(&self) -> &[Bytes] {
        &self.nodes
    }

    /// Mutable access to the node list.
    pub fn nodes_mut(&mut self) -> &mut Vec<Bytes> {
        &mut self.nodes
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the proof has no nodes (valid only against the empty root).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Encode as a single RLP list.
    pub fn to_rlp(&self) -> Vec<u8> {
        self.rlp_item().encode()
    }

    /// Decode from a single RLP list.
    pub fn from_rlp(raw: &[u8]) -> Result<Self, FormatError> {
        Self::decode_rlp(raw)
    }
}

impl RlpEncode for Proof {
    fn rlp_item(&self) -> RlpItem {
        RlpItem::list(
            self.nodes
                .iter()
                .map(|n| RlpItem::bytes(n.as_slice()))
                .collect(),
        )
    }
}

impl RlpDecode for Proof {
    fn from_rlp_item(item: &RlpItem) -> Result<Self, FormatError> {
        let nodes = item
            .as_list()?
            .iter()
            .map(|n| n.as_bytes().map(Bytes::from))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { nodes })
    }
}
