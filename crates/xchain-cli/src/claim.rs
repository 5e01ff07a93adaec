//! # Claim Subcommand
//!
//! Offline inspection of a claim bundle before it is submitted. Checks that
//! the three records decode canonically and that both proofs bind them
//! under the roots of the bundle's own header. Whether that header is part
//! of the canonical origin chain is not evaluated here.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use xchain_bridge::{BridgeEvent, BurnCall};
use xchain_core::{BlockHeader, RlpDecode, Receipt, Transaction, H256};
use xchain_relay::ClaimBundle;
use xchain_trie::{verify, Proof};

/// Arguments for the `xchain claim` subcommand.
#[derive(Args, Debug)]
pub struct ClaimArgs {
    #[command(subcommand)]
    pub command: ClaimCommand,
}

/// Claim subcommands.
#[derive(Subcommand, Debug)]
pub enum ClaimCommand {
    /// Check a JSON claim bundle's proofs against its header.
    Check {
        /// JSON claim bundle.
        #[arg(long, value_name = "FILE")]
        bundle: PathBuf,
    },
}

/// Execute the claim subcommand.
pub fn run_claim(args: &ClaimArgs) -> Result<u8> {
    match &args.command {
        ClaimCommand::Check { bundle } => cmd_check(bundle),
    }
}

fn cmd_check(path: &Path) -> Result<u8> {
    let bundle: ClaimBundle = crate::read_json(path)?;
    let header = BlockHeader::decode_rlp(bundle.header.as_slice()).context("header")?;
    let tx = Transaction::decode_rlp(bundle.transaction.as_slice()).context("transaction")?;
    let receipt = Receipt::decode_rlp(bundle.receipt.as_slice()).context("receipt")?;

    println!("block:       {} ({})", header.number, header.hash());
    println!("transaction: {}", tx.hash());
    match tx.to {
        Some(to) => println!("sent to:     {to}"),
        None => println!("sent to:     (contract creation)"),
    }
    match BurnCall::decode(tx.data.as_slice()) {
        Ok(call) => println!(
            "burn:        {} to {} on {}",
            call.amount, call.recipient, call.destination
        ),
        Err(e) => println!("burn:        not a burn call ({e})"),
    }
    println!("status:      {}", if receipt.is_success() { "success" } else { "failed" });
    match burn_record(&receipt) {
        Some(BridgeEvent::ChainTransfer {
            source,
            destination,
            recipient,
            amount,
        }) => println!("record:      {amount} from {source} to {recipient} on {destination}"),
        _ => println!("record:      no ChainTransfer log in receipt"),
    }

    let Some(path) = bundle.path.as_ref() else {
        println!("FAIL: bundle carries no key path");
        return Ok(1);
    };
    let tx_ok = check_proof(
        "transaction",
        &header.transactions_root,
        path.as_slice(),
        bundle.tx_proof.as_ref(),
        bundle.transaction.as_slice(),
    );
    let receipt_ok = check_proof(
        "receipt",
        &header.receipts_root,
        path.as_slice(),
        bundle.receipt_proof.as_ref(),
        bundle.receipt.as_slice(),
    );

    if tx_ok && receipt_ok && receipt.is_success() {
        println!("OK: bundle is self-consistent");
        Ok(0)
    } else {
        Ok(1)
    }
}

/// The first `ChainTransfer` event among the receipt's logs.
fn burn_record(receipt: &Receipt) -> Option<BridgeEvent> {
    receipt
        .logs
        .iter()
        .filter_map(BridgeEvent::from_log)
        .find(|e| matches!(e, BridgeEvent::ChainTransfer { .. }))
}

fn check_proof(kind: &str, root: &H256, key: &[u8], proof: Option<&Proof>, item: &[u8]) -> bool {
    let Some(proof) = proof else {
        println!("FAIL: no {kind} proof");
        return false;
    };
    match verify(root, key, proof, item) {
        Ok(()) => {
            println!("{kind} proof: included ({} nodes)", proof.len());
            true
        }
        Err(e) => {
            println!("FAIL: {kind} proof: {e}");
            false
        }
    }
}
