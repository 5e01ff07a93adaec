//! # Commitment Trie
//!
//! A radix-16 Merkle-Patricia trie whose root digest commits to a set of
//! `key → value` bindings. Built once per block side (transactions or
//! receipts) to regenerate the root the origin ledger committed to, and to
//! harvest the node path of one key as a [`Proof`].
//!
//! ## Design
//!
//! Nodes live in a flat arena (`Vec<Node>`) and refer to each other by
//! [`NodeId`]. Insertion rewrites nodes along the path in place; nodes that
//! become unreachable are left in the arena, which is discarded with the
//! trie.
//!
//! ## Node Encoding
//!
//! ```text
//! leaf       [hp(path, leaf=true),  value]
//! extension  [hp(path, leaf=false), child_ref]
//! branch     [child_ref × 16, value]
//! child_ref  = node encoding if shorter than 32 bytes (embedded)
//!            | keccak256(node encoding) otherwise
//! ```
//!
//! The root is always referenced by hash. The empty trie's root is
//! `keccak256(rlp(""))`.

use xchain_core::rlp::RlpItem;
use xchain_core::{keccak256, H256};

use crate::nibbles::{common_prefix_len, hex_prefix_encode, to_nibbles};
use crate::proof::Proof;

/// Root of the empty trie: `keccak256(0x80)`.
pub const EMPTY_ROOT: H256 = H256([
    0x56, 0xe8, 0x1f, 0x17, 0x1b, 0xcc, 0x55, 0xa6, 0xff, 0x83, 0x45, 0xe6, 0x92, 0xc0, 0xf8, 0x6e,
    0x5b, 0x48, 0xe0, 0x1b, 0x99, 0x6c, 0xad, 0xc0, 0x01, 0x62, 0x2f, 0xb5, 0xe3, 0x63, 0xb4, 0x21,
]);

/// Encodings shorter than this are embedded in their parent.
pub const INLINE_LIMIT: usize = 32;

/// Index of a node in the trie arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Leaf {
        path: Vec<u8>,
        value: Vec<u8>,
    },
    Extension {
        path: Vec<u8>,
        child: NodeId,
    },
    Branch {
        children: [Option<NodeId>; 16],
        value: Option<Vec<u8>>,
    },
}

/// The trie key of the item at `index` in a block: `rlp(index)`.
pub fn index_key(index: usize) -> Vec<u8> {
    RlpItem::uint(index as u128).encode()
}

/// Arena-backed Merkle-Patricia trie.
#[derive(Debug, Clone, Default)]
pub struct CommitmentTrie {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    len: usize,
}

impl CommitmentTrie {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the per-block trie: item `i` is bound under `rlp(i)`.
    pub fn from_items<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<[u8]>,
    {
        let mut trie = Self::new();
        for (i, item) in items.into_iter().enumerate() {
            trie.put(&index_key(i), item.as_ref().to_vec());
        }
        trie
    }

    /// Number of distinct keys bound.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no key is bound.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bind `value` to `key`, overwriting any previous binding.
    pub fn put(&mut self, key: &[u8], value: Vec<u8>) {
        let path = to_nibbles(key);
        let root = self.insert_at(self.root, &path, value);
        self.root = Some(root);
    }

    /// The value bound to `key`, if any.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        let path = to_nibbles(key);
        let mut rest: &[u8] = &path;
        let mut cur = self.root?;
        loop {
            match &self.nodes[cur.0] {
                Node::Leaf { path, value } => {
                    return (path.as_slice() == rest).then_some(value.as_slice());
                }
                Node::Extension { path, child } => {
                    rest = rest.strip_prefix(path.as_slice())?;
                    cur = *child;
                }
                Node::Branch { children, value } => match rest.split_first() {
                    None => return value.as_deref(),
                    Some((n, tail)) => {
                        cur = children[usize::from(*n)]?;
                        rest = tail;
                    }
                },
            }
        }
    }

    /// The root commitment.
    pub fn root(&self) -> H256 {
        match self.root {
            None => EMPTY_ROOT,
            Some(id) => keccak256(&self.node_item(id).encode()),
        }
    }

    /// The node path from the root towards `key`.
    ///
    /// For a bound key the last node holds its value. For an absent key the
    /// path stops at the node where the key diverges, which proves absence.
    pub fn prove(&self, key: &[u8]) -> Proof {
        let path = to_nibbles(key);
        let mut rest: &[u8] = &path;
        let mut nodes = Vec::new();
        let mut cur = self.root;
        while let Some(id) = cur {
            nodes.push(self.node_item(id).encode());
            cur = match &self.nodes[id.0] {
                Node::Leaf { .. } => None,
                Node::Extension { path, child } => match rest.strip_prefix(path.as_slice()) {
                    Some(tail) => {
                        rest = tail;
                        Some(*child)
                    }
                    None => None,
                },
                Node::Branch { children, .. } => match rest.split_first() {
                    Some((n, tail)) => {
                        rest = tail;
                        children[usize::from(*n)]
                    }
                    None => None,
                },
            };
        }
        Proof::new(nodes)
    }

    // -----------------------------------------------------------------------
    // Arena mutation
    // -----------------------------------------------------------------------

    fn alloc(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn empty_branch() -> Node {
        Node::Branch {
            children: [None; 16],
            value: None,
        }
    }

    /// Place `value` at `path` below a new branch slot or the branch value.
    fn attach(&mut self, branch: &mut Node, path: &[u8], value: Vec<u8>) {
        if let Node::Branch {
            children,
            value: slot_value,
        } = branch
        {
            match path.split_first() {
                None => *slot_value = Some(value),
                Some((n, tail)) => {
                    let leaf = self.alloc(Node::Leaf {
                        path: tail.to_vec(),
                        value,
                    });
                    children[usize::from(*n)] = Some(leaf);
                }
            }
        }
    }

    fn insert_at(&mut self, node: Option<NodeId>, path: &[u8], value: Vec<u8>) -> NodeId {
        let Some(id) = node else {
            self.len += 1;
            return self.alloc(Node::Leaf {
                path: path.to_vec(),
                value,
            });
        };

        match self.nodes[id.0].clone() {
            Node::Leaf {
                path: leaf_path,
                value: leaf_value,
            } => {
                let common = common_prefix_len(&leaf_path, path);
                if common == leaf_path.len() && common == path.len() {
                    self.nodes[id.0] = Node::Leaf {
                        path: leaf_path,
                        value,
                    };
                    return id;
                }
                self.len += 1;
                let mut branch = Self::empty_branch();
                self.attach(&mut branch, &leaf_path[common..], leaf_value);
                self.attach(&mut branch, &path[common..], value);
                self.split_into(id, &path[..common], branch)
            }
            Node::Extension {
                path: ext_path,
                child,
            } => {
                let common = common_prefix_len(&ext_path, path);
                if common == ext_path.len() {
                    let new_child = self.insert_at(Some(child), &path[common..], value);
                    self.nodes[id.0] = Node::Extension {
                        path: ext_path,
                        child: new_child,
                    };
                    return id;
                }
                let mut branch = Self::empty_branch();
                let slot = usize::from(ext_path[common]);
                let below = &ext_path[common + 1..];
                let existing = if below.is_empty() {
                    child
                } else {
                    self.alloc(Node::Extension {
                        path: below.to_vec(),
                        child,
                    })
                };
                if let Node::Branch { children, .. } = &mut branch {
                    children[slot] = Some(existing);
                }
                self.len += 1;
                self.attach(&mut branch, &path[common..], value);
                self.split_into(id, &path[..common], branch)
            }
            Node::Branch {
                mut children,
                value: branch_value,
            } => match path.split_first() {
                None => {
                    if branch_value.is_none() {
                        self.len += 1;
                    }
                    self.nodes[id.0] = Node::Branch {
                        children,
                        value: Some(value),
                    };
                    id
                }
                Some((n, tail)) => {
                    let slot = usize::from(*n);
                    children[slot] = Some(self.insert_at(children[slot], tail, value));
                    self.nodes[id.0] = Node::Branch {
                        children,
                        value: branch_value,
                    };
                    id
                }
            },
        }
    }

    /// Replace node `id` with `branch`, behind an extension over `shared`
    /// when the split point is below the node's own start.
    fn split_into(&mut self, id: NodeId, shared: &[u8], branch: Node) -> NodeId {
        if shared.is_empty() {
            self.nodes[id.0] = branch;
        } else {
            let child = self.alloc(branch);
            self.nodes[id.0] = Node::Extension {
                path: shared.to_vec(),
                child,
            };
        }
        id
    }

    // -----------------------------------------------------------------------
    // Encoding
    // -----------------------------------------------------------------------

    fn node_item(&self, id: NodeId) -> RlpItem {
        match &self.nodes[id.0] {
            Node::Leaf { path, value } => RlpItem::list(vec![
                RlpItem::bytes(hex_prefix_encode(path, true)),
                RlpItem::bytes(value.clone()),
            ]),
            Node::Extension { path, child } => RlpItem::list(vec![
                RlpItem::bytes(hex_prefix_encode(path, false)),
                self.child_ref(*child),
            ]),
            Node::Branch { children, value } => {
                let mut items: Vec<RlpItem> = children
                    .iter()
                    .map(|c| match c {
                        Some(child) => self.child_ref(*child),
                        None => RlpItem::bytes(Vec::new()),
                    })
                    .collect();
                items.push(RlpItem::bytes(value.clone().unwrap_or_default()));
                RlpItem::list(items)
            }
        }
    }

    fn child_ref(&self, id: NodeId) -> RlpItem {
        let item = self.node_item(id);
        let encoded = item.encode();
        if encoded.len() < INLINE_LIMIT {
            item
        } else {
            RlpItem::bytes(keccak256(&encoded).0.to_vec())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::{lookup, verify};

    fn trie_of(pairs: &[(&str, &str)]) -> CommitmentTrie {
        let mut t = CommitmentTrie::new();
        for (k, v) in pairs {
            t.put(k.as_bytes(), v.as_bytes().to_vec());
        }
        t
    }

    #[test]
    fn test_empty_root() {
        assert_eq!(CommitmentTrie::new().root(), keccak256(&[0x80]));
        assert_eq!(CommitmentTrie::new().root(), EMPTY_ROOT);
    }

    #[test]
    fn test_known_root_dogs() {
        let t = trie_of(&[("doe", "reindeer"), ("dog", "puppy"), ("dogglesworth", "cat")]);
        assert_eq!(
            t.root().to_hex(),
            "0x8aad789dff2f538bca5d8ea56e8abe10f4c7ba3a5dea95fea4cd6e7c3a1168d3"
        );
    }

    #[test]
    fn test_known_root_puppy_any_order() {
        let pairs = [("do", "verb"), ("horse", "stallion"), ("doge", "coin"), ("dog", "puppy")];
        let expected = "0x5991bb8c6514148a29db676a14ac506cd2cd5775ace63c30a4fe457715e9ac84";
        assert_eq!(trie_of(&pairs).root().to_hex(), expected);
        let mut reversed = pairs;
        reversed.reverse();
        assert_eq!(trie_of(&reversed).root().to_hex(), expected);
    }

    #[test]
    fn test_get_and_overwrite() {
        let mut t = trie_of(&[("do", "verb"), ("dog", "puppy")]);
        assert_eq!(t.get(b"do"), Some(&b"verb"[..]));
        assert_eq!(t.get(b"dog"), Some(&b"puppy"[..]));
        assert_eq!(t.get(b"d"), None);
        assert_eq!(t.get(b"doge"), None);
        let before = t.root();
        t.put(b"dog", b"hound".to_vec());
        assert_eq!(t.get(b"dog"), Some(&b"hound"[..]));
        assert_eq!(t.len(), 2);
        assert_ne!(t.root(), before);
    }

    #[test]
    fn test_overwrite_with_same_value_keeps_root() {
        let mut t = trie_of(&[("a", "1"), ("b", "2")]);
        let root = t.root();
        t.put(b"a", b"1".to_vec());
        assert_eq!(t.root(), root);
    }

    #[test]
    fn test_from_items_uses_rlp_index_keys() {
        let items: Vec<Vec<u8>> = (0..200u8).map(|i| vec![i; 40]).collect();
        let t = CommitmentTrie::from_items(&items);
        assert_eq!(t.len(), 200);
        assert_eq!(index_key(0), vec![0x80]);
        assert_eq!(index_key(1), vec![0x01]);
        assert_eq!(index_key(128), vec![0x81, 0x80]);
        assert_eq!(t.get(&index_key(0)), Some(&items[0][..]));
        assert_eq!(t.get(&index_key(199)), Some(&items[199][..]));
    }

    #[test]
    fn test_prove_every_item() {
        let items: Vec<Vec<u8>> = (0..130u8).map(|i| vec![i; (i % 50) as usize + 1]).collect();
        let t = CommitmentTrie::from_items(&items);
        let root = t.root();
        for (i, item) in items.iter().enumerate() {
            let key = index_key(i);
            verify(&root, &key, &t.prove(&key), item).unwrap();
        }
    }

    #[test]
    fn test_prove_absent_key_shows_absence() {
        let t = CommitmentTrie::from_items([b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
        let key = index_key(7);
        assert_eq!(lookup(&t.root(), &key, &t.prove(&key)), Ok(None));
    }

    #[test]
    fn test_single_item_trie_root_is_hashed_leaf() {
        let t = CommitmentTrie::from_items([vec![0x01]]);
        let proof = t.prove(&index_key(0));
        assert_eq!(proof.len(), 1);
        assert!(proof.nodes()[0].len() < INLINE_LIMIT);
        assert_eq!(t.root(), keccak256(proof.nodes()[0].as_slice()));
    }

    #[test]
    fn test_known_receipts_root_single_transfer() {
        // A block holding one successful plain value transfer.
        use xchain_core::{Receipt, RlpEncode};
        let receipt = Receipt::new(true, 21_000, Vec::new());
        let t = CommitmentTrie::from_items([receipt.rlp_bytes().into_vec()]);
        assert_eq!(
            t.root().to_hex(),
            "0x056b23fbba480696b65fe5a59b8f2148a1299103c4f57df839233af2cf4ca2d2"
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::verify::verify;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn bindings() -> impl Strategy<Value = BTreeMap<Vec<u8>, Vec<u8>>> {
        prop::collection::btree_map(
            prop::collection::vec(any::<u8>(), 0..6),
            prop::collection::vec(any::<u8>(), 1..48),
            1..24,
        )
    }

    proptest! {
        /// Every inserted binding verifies against the root.
        #[test]
        fn inserted_bindings_verify(map in bindings()) {
            let mut t = CommitmentTrie::new();
            for (k, v) in &map {
                t.put(k, v.clone());
            }
            let root = t.root();
            for (k, v) in &map {
                prop_assert_eq!(t.get(k), Some(v.as_slice()));
                prop_assert!(verify(&root, k, &t.prove(k), v).is_ok());
            }
        }

        /// The root does not depend on insertion order.
        #[test]
        fn root_is_order_independent(map in bindings()) {
            let mut forward = CommitmentTrie::new();
            for (k, v) in &map {
                forward.put(k, v.clone());
            }
            let mut backward = CommitmentTrie::new();
            for (k, v) in map.iter().rev() {
                backward.put(k, v.clone());
            }
            prop_assert_eq!(forward.root(), backward.root());
        }

        /// A different expected value never verifies.
        #[test]
        fn other_value_rejected(map in bindings(), other in prop::collection::vec(any::<u8>(), 1..48)) {
            let mut t = CommitmentTrie::new();
            for (k, v) in &map {
                t.put(k, v.clone());
            }
            let root = t.root();
            for (k, v) in &map {
                if *v != other {
                    prop_assert!(verify(&root, k, &t.prove(k), &other).is_err());
                }
            }
        }

        /// Flipping any byte of any proof node breaks verification.
        #[test]
        fn mutated_proof_rejected(map in bindings(), pick in any::<prop::sample::Index>(), byte in any::<prop::sample::Index>(), flip in 1u8..=255) {
            let mut t = CommitmentTrie::new();
            for (k, v) in &map {
                t.put(k, v.clone());
            }
            let root = t.root();
            let keys: Vec<&Vec<u8>> = map.keys().collect();
            let key = keys[pick.index(keys.len())];
            let mut proof = t.prove(key);
            let n = pick.index(proof.len());
            let node = &mut proof.nodes_mut()[n].0;
            let b = byte.index(node.len());
            node[b] ^= flip;
            prop_assert!(verify(&root, key, &proof, &map[key]).is_err());
        }
    }
}
