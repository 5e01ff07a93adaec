//! # RLP Subcommand
//!
//! Strict decoding of hex input into an item tree, and integer encoding.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use xchain_core::bytes::{decode_hex, encode_hex};
use xchain_core::RlpItem;

/// Arguments for the `xchain rlp` subcommand.
#[derive(Args, Debug)]
pub struct RlpArgs {
    #[command(subcommand)]
    pub command: RlpCommand,
}

/// RLP subcommands.
#[derive(Subcommand, Debug)]
pub enum RlpCommand {
    /// Decode canonical RLP and print the item tree.
    Decode {
        /// Encoded bytes as hex, with or without `0x`.
        #[arg(value_name = "HEX")]
        input: String,
    },

    /// Encode an unsigned integer.
    EncodeInt {
        /// Decimal value.
        #[arg(value_name = "N")]
        value: u128,
    },
}

/// Execute the rlp subcommand.
pub fn run_rlp(args: &RlpArgs) -> Result<u8> {
    match &args.command {
        RlpCommand::Decode { input } => {
            let raw = decode_hex(input).context("input is not hex")?;
            println!("{}", decode(&raw)?);
            Ok(0)
        }
        RlpCommand::EncodeInt { value } => {
            println!("{}", encode_int(*value));
            Ok(0)
        }
    }
}

fn decode(raw: &[u8]) -> Result<RlpItem> {
    RlpItem::decode(raw).context("not canonical RLP")
}

fn encode_int(value: u128) -> String {
    encode_hex(&RlpItem::uint(value).encode())
}
