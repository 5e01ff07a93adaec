//! # xchain-cli — Bridge Toolchain CLI
//!
//! Provides the `xchain` command-line interface.
//!
//! ## Subcommands
//!
//! - `xchain rlp` — decode canonical RLP, encode integers.
//! - `xchain trie` — compute per-block roots, produce and verify proofs.
//! - `xchain header` — hash a JSON block header.
//! - `xchain claim` — check a claim bundle's proofs offline.
//! - `xchain demo` — run burn → claim → replay across two devnet ledgers.
//!
//! ```bash
//! xchain trie root --items txs.json
//! xchain trie prove --items txs.json --index 3 > proof.json
//! xchain claim check --bundle bundle.json
//! xchain -v demo --config demo.yaml
//! ```
//!
//! Handlers return `anyhow::Result<u8>`: `Ok(code)` is the process exit
//! code, `Err` is reported by the binary and exits 1.

pub mod claim;
pub mod config;
pub mod demo;
pub mod header;
pub mod rlp;
pub mod trie;

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Read and parse a JSON data file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse JSON: {}", path.display()))
}
