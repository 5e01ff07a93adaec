//! # Header Subcommand
//!
//! Hashes a JSON block header as the origin ledger does. Field names follow
//! the origin's JSON-RPC (`parentHash`, `sha3Uncles`, `miner`, ...) and
//! integers may be hex quantities, decimal strings, or numbers.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use xchain_core::{BlockHeader, RlpEncode};

/// Arguments for the `xchain header` subcommand.
#[derive(Args, Debug)]
pub struct HeaderArgs {
    #[command(subcommand)]
    pub command: HeaderCommand,
}

/// Header subcommands.
#[derive(Subcommand, Debug)]
pub enum HeaderCommand {
    /// Print the block hash and seal hash of a JSON header.
    Hash {
        /// JSON block header.
        #[arg(long, value_name = "FILE")]
        header: PathBuf,
    },
}

/// Execute the header subcommand.
pub fn run_header(args: &HeaderArgs) -> Result<u8> {
    match &args.command {
        HeaderCommand::Hash { header } => {
            let header: BlockHeader = crate::read_json(header)?;
            println!("number:    {}", header.number);
            println!("hash:      {}", header.hash());
            println!("seal hash: {}", header.seal_hash());
            println!("encoded:   {} bytes", header.rlp_bytes().len());
            Ok(0)
        }
    }
}
