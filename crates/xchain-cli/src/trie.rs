//! # Trie Subcommand
//!
//! Per-block commitment tries over a JSON list of raw items (hex strings,
//! each the canonical encoding of a transaction or receipt). Item `i` is
//! bound under `rlp(i)`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};

use xchain_core::bytes::decode_hex;
use xchain_core::{Bytes, H256};
use xchain_trie::{index_key, verify, CommitmentTrie, Proof, ProofError};

/// Arguments for the `xchain trie` subcommand.
#[derive(Args, Debug)]
pub struct TrieArgs {
    #[command(subcommand)]
    pub command: TrieCommand,
}

/// Trie subcommands.
#[derive(Subcommand, Debug)]
pub enum TrieCommand {
    /// Print the root committing to a list of items.
    Root {
        /// JSON array of hex-encoded items.
        #[arg(long, value_name = "FILE")]
        items: PathBuf,
    },

    /// Print the inclusion proof for one item as JSON.
    Prove {
        /// JSON array of hex-encoded items.
        #[arg(long, value_name = "FILE")]
        items: PathBuf,
        /// Position of the item in the block.
        #[arg(long)]
        index: usize,
    },

    /// Check a proof that `value` sits at `index` under `root`.
    Verify {
        /// Expected root, hex.
        #[arg(long)]
        root: String,
        /// Position of the item in the block.
        #[arg(long)]
        index: usize,
        /// Expected item bytes, hex.
        #[arg(long)]
        value: String,
        /// JSON array of hex-encoded proof nodes.
        #[arg(long, value_name = "FILE")]
        proof: PathBuf,
    },
}

/// Execute the trie subcommand.
pub fn run_trie(args: &TrieArgs) -> Result<u8> {
    match &args.command {
        TrieCommand::Root { items } => {
            let trie = load_trie(items)?;
            println!("{}", trie.root());
            Ok(0)
        }
        TrieCommand::Prove { items, index } => {
            let trie = load_trie(items)?;
            if *index >= trie.len() {
                bail!("index {index} out of range for {} items", trie.len());
            }
            let proof = trie.prove(&index_key(*index));
            println!("{}", serde_json::to_string_pretty(&proof)?);
            Ok(0)
        }
        TrieCommand::Verify {
            root,
            index,
            value,
            proof,
        } => cmd_verify(root, *index, value, proof),
    }
}

fn load_trie(path: &Path) -> Result<CommitmentTrie> {
    let items: Vec<Bytes> = crate::read_json(path)?;
    tracing::debug!(items = items.len(), "building trie");
    Ok(CommitmentTrie::from_items(items))
}

fn cmd_verify(root: &str, index: usize, value: &str, proof_path: &Path) -> Result<u8> {
    let root = H256::from_hex(root).context("root must be 32 bytes of hex")?;
    let value = decode_hex(value).context("value is not hex")?;
    let proof: Proof = crate::read_json(proof_path)?;

    match verify(&root, &index_key(index), &proof, &value) {
        Ok(()) => {
            println!("OK: item {index} included under {root}");
            Ok(0)
        }
        Err(ProofError::NotIncluded) => {
            println!("FAIL: item {index} not included under {root}");
            Ok(1)
        }
        Err(e) => {
            println!("FAIL: {e}");
            Ok(1)
        }
    }
}
