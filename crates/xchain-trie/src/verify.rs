//! # Proof Verifier
//!
//! Recomputes the path from a root digest towards a key using only the
//! nodes in a [`Proof`], with no access to the trie that produced it.
//!
//! ## Algorithm
//!
//! Starting with the root digest as the expected reference, each proof node
//! must hash to the expected digest (or, for an embedded reference, equal
//! the embedded bytes). The node is then decoded and consumes key nibbles:
//!
//! - a branch consumes one nibble and selects a child slot, or yields its
//!   value slot once the key is exhausted;
//! - an extension must match its stored run and yields its child;
//! - a leaf must match all remaining nibbles exactly and yields its value.
//!
//! The path terminates at a leaf, an empty branch slot, or a diverging
//! extension. The terminal node must be the last node in the proof.
//!
//! ## Security Invariant
//!
//! Every node is bound to its parent by hash or by byte equality before it
//! is interpreted, so a proof accepted against `root` describes the trie
//! committed to by `root` and nothing else.

use xchain_core::rlp::RlpItem;
use xchain_core::{keccak256, H256};

use crate::error::{MalformedProof, ProofError};
use crate::nibbles::{hex_prefix_decode, to_nibbles};
use crate::proof::Proof;
use crate::trie::{EMPTY_ROOT, INLINE_LIMIT};

/// What the next node must match.
enum Expected {
    Hash(H256),
    Inline(Vec<u8>),
}

/// Parse a child slot: `None` for empty, else the reference it holds.
fn child_ref(slot: &RlpItem, depth: usize) -> Result<Option<Expected>, MalformedProof> {
    match slot {
        RlpItem::Bytes(b) if b.is_empty() => Ok(None),
        RlpItem::Bytes(b) if b.len() == 32 => {
            let mut h = [0u8; 32];
            h.copy_from_slice(b);
            Ok(Some(Expected::Hash(H256(h))))
        }
        RlpItem::List(_) => {
            let encoded = slot.encode();
            if encoded.len() < INLINE_LIMIT {
                Ok(Some(Expected::Inline(encoded)))
            } else {
                Err(MalformedProof::BadChildRef { depth })
            }
        }
        RlpItem::Bytes(_) => Err(MalformedProof::BadChildRef { depth }),
    }
}

fn terminal(
    nodes: usize,
    depth: usize,
    outcome: Option<Vec<u8>>,
) -> Result<Option<Vec<u8>>, ProofError> {
    if depth + 1 != nodes {
        return Err(MalformedProof::TrailingNodes {
            depth,
            extra: nodes - depth - 1,
        }
        .into());
    }
    Ok(outcome)
}

/// Resolve `key` under `root` using `proof`.
///
/// Returns `Ok(Some(value))` if the proof shows `key` bound to `value`,
/// `Ok(None)` if it shows `key` absent, and
/// `Err(ProofError::Malformed(_))` if it shows neither.
pub fn lookup(root: &H256, key: &[u8], proof: &Proof) -> Result<Option<Vec<u8>>, ProofError> {
    let nodes = proof.nodes();
    if nodes.is_empty() {
        return if *root == EMPTY_ROOT {
            Ok(None)
        } else {
            Err(MalformedProof::Exhausted { depth: 0 }.into())
        };
    }

    let path = to_nibbles(key);
    let mut pos = 0usize;
    let mut expected = Expected::Hash(*root);

    for (depth, raw) in nodes.iter().enumerate() {
        let raw = raw.as_slice();
        match &expected {
            Expected::Hash(h) if keccak256(raw) != *h => {
                return Err(MalformedProof::HashMismatch { depth }.into());
            }
            Expected::Inline(bytes) if bytes.as_slice() != raw => {
                return Err(MalformedProof::InlineMismatch { depth }.into());
            }
            _ => {}
        }

        let item = RlpItem::decode(raw)
            .map_err(|source| MalformedProof::Undecodable { depth, source })?;
        let fields = item
            .as_list()
            .map_err(|source| MalformedProof::Undecodable { depth, source })?;

        match fields.len() {
            17 => {
                let Some(nibble) = path.get(pos) else {
                    let value = fields[16]
                        .as_bytes()
                        .map_err(|source| MalformedProof::Undecodable { depth, source })?;
                    let outcome = (!value.is_empty()).then(|| value.to_vec());
                    return terminal(nodes.len(), depth, outcome);
                };
                pos += 1;
                match child_ref(&fields[usize::from(*nibble)], depth)? {
                    Some(next) => expected = next,
                    None => return terminal(nodes.len(), depth, None),
                }
            }
            2 => {
                let packed = fields[0]
                    .as_bytes()
                    .map_err(|source| MalformedProof::Undecodable { depth, source })?;
                let (node_path, is_leaf) = hex_prefix_decode(packed)
                    .ok_or(MalformedProof::BadHexPrefix { depth })?;
                let rest = &path[pos..];
                if is_leaf {
                    let value = fields[1]
                        .as_bytes()
                        .map_err(|source| MalformedProof::Undecodable { depth, source })?;
                    let outcome = (rest == node_path.as_slice()).then(|| value.to_vec());
                    return terminal(nodes.len(), depth, outcome);
                }
                if !rest.starts_with(&node_path) {
                    return terminal(nodes.len(), depth, None);
                }
                pos += node_path.len();
                match child_ref(&fields[1], depth)? {
                    Some(next) => expected = next,
                    None => return Err(MalformedProof::BadChildRef { depth }.into()),
                }
            }
            found => return Err(MalformedProof::UnexpectedArity { depth, found }.into()),
        }
    }

    Err(MalformedProof::Exhausted { depth: nodes.len() }.into())
}

/// Accept iff `proof` shows `key` bound to exactly `expected_value` under
/// `root`.
///
/// # Errors
///
/// [`ProofError::NotIncluded`] if the key is absent or bound to a different
/// value; [`ProofError::Malformed`] if the proof is corrupt.
pub fn verify(root: &H256, key: &[u8], proof: &Proof, expected_value: &[u8]) -> Result<(), ProofError> {
    match lookup(root, key, proof)? {
        Some(v) if v == expected_value => Ok(()),
        _ => Err(ProofError::NotIncluded),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::{index_key, CommitmentTrie};
    use xchain_core::Bytes;

    fn block_trie() -> (CommitmentTrie, Vec<Vec<u8>>) {
        let items: Vec<Vec<u8>> = (0..40u8).map(|i| vec![i; 64]).collect();
        (CommitmentTrie::from_items(&items), items)
    }

    #[test]
    fn test_valid_proof_accepted() {
        let (t, items) = block_trie();
        let key = index_key(17);
        assert!(verify(&t.root(), &key, &t.prove(&key), &items[17]).is_ok());
    }

    #[test]
    fn test_wrong_value_is_not_included() {
        let (t, items) = block_trie();
        let key = index_key(3);
        assert_eq!(
            verify(&t.root(), &key, &t.prove(&key), &items[4]),
            Err(ProofError::NotIncluded)
        );
    }

    #[test]
    fn test_wrong_root_is_hash_mismatch() {
        let (t, items) = block_trie();
        let key = index_key(3);
        assert_eq!(
            verify(&H256([7; 32]), &key, &t.prove(&key), &items[3]),
            Err(ProofError::Malformed(MalformedProof::HashMismatch { depth: 0 }))
        );
    }

    #[test]
    fn test_truncated_proof_is_exhausted() {
        let (t, items) = block_trie();
        let key = index_key(3);
        let mut proof = t.prove(&key);
        let n = proof.len();
        proof.nodes_mut().truncate(n - 1);
        assert_eq!(
            verify(&t.root(), &key, &proof, &items[3]),
            Err(ProofError::Malformed(MalformedProof::Exhausted { depth: n - 1 }))
        );
    }

    #[test]
    fn test_extra_node_is_trailing() {
        let (t, items) = block_trie();
        let key = index_key(3);
        let mut proof = t.prove(&key);
        proof.nodes_mut().push(Bytes(vec![0xc0]));
        assert!(matches!(
            verify(&t.root(), &key, &proof, &items[3]),
            Err(ProofError::Malformed(MalformedProof::TrailingNodes { extra: 1, .. }))
        ));
    }

    #[test]
    fn test_proof_for_other_key_rejected() {
        let (t, items) = block_trie();
        let proof = t.prove(&index_key(5));
        assert!(verify(&t.root(), &index_key(6), &proof, &items[6]).is_err());
    }

    #[test]
    fn test_empty_root_empty_proof_is_absent() {
        assert_eq!(lookup(&EMPTY_ROOT, &[0x80], &Proof::default()), Ok(None));
        assert_eq!(
            verify(&EMPTY_ROOT, &[0x80], &Proof::default(), b"x"),
            Err(ProofError::NotIncluded)
        );
    }

    #[test]
    fn test_bad_arity_rejected() {
        let node = RlpItem::list(vec![RlpItem::bytes(vec![1]); 3]).encode();
        let root = keccak256(&node);
        assert_eq!(
            lookup(&root, &[0x80], &Proof::new(vec![node])),
            Err(ProofError::Malformed(MalformedProof::UnexpectedArity { depth: 0, found: 3 }))
        );
    }

    #[test]
    fn test_bad_hex_prefix_rejected() {
        let node = RlpItem::list(vec![RlpItem::bytes(vec![0x41]), RlpItem::bytes(vec![1])]).encode();
        let root = keccak256(&node);
        assert_eq!(
            lookup(&root, &[0x80], &Proof::new(vec![node])),
            Err(ProofError::Malformed(MalformedProof::BadHexPrefix { depth: 0 }))
        );
    }

    #[test]
    fn test_non_canonical_node_rejected() {
        let node = vec![0xc2, 0x81, 0x01];
        let root = keccak256(&node);
        assert!(matches!(
            lookup(&root, &[0x80], &Proof::new(vec![node])),
            Err(ProofError::Malformed(MalformedProof::Undecodable { depth: 0, .. }))
        ));
    }

    #[test]
    fn test_wire_round_trip_still_verifies() {
        let (t, items) = block_trie();
        let key = index_key(30);
        let wire = t.prove(&key).to_rlp();
        let proof = Proof::from_rlp(&wire).unwrap();
        assert!(verify(&t.root(), &key, &proof, &items[30]).is_ok());
    }
}
