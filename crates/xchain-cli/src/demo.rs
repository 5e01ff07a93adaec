//! # Demo Subcommand
//!
//! Runs the full bridge round trip on two in-process instances: deploy and
//! pair, burn on the source devnet, seal the block, assemble the claim
//! bundle, redeem it on the destination, then replay it and expect
//! `AlreadyClaimed`.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use xchain_bridge::{BridgeError, BridgeToken, Devnet, MetricsSnapshot};
use xchain_core::{Address, H256};
use xchain_relay::{ProofRelay, RelayOracle, StubRelay};

use crate::config::{DemoConfig, RelayMode};

/// Arguments for the `xchain demo` subcommand.
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Outcome of one demo run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoReport {
    pub burn_transaction: H256,
    pub block_hash: H256,
    pub source_balance: String,
    pub destination_balance: String,
    pub fingerprint: Option<H256>,
    pub claim_error: Option<String>,
    pub replay_rejected: bool,
    pub source_metrics: MetricsSnapshot,
    pub destination_metrics: MetricsSnapshot,
}

impl DemoReport {
    /// True when the claim minted and its replay was refused.
    pub fn succeeded(&self) -> bool {
        self.fingerprint.is_some() && self.replay_rejected
    }
}

/// Execute the demo subcommand.
pub fn run_demo(args: &DemoArgs, config_path: Option<&Path>) -> Result<u8> {
    let config = DemoConfig::load(config_path)?;
    let report = run_scenario(&config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("burn tx:             {}", report.burn_transaction);
        println!("sealed in block:     {}", report.block_hash);
        println!("source balance:      {}", report.source_balance);
        match (&report.fingerprint, &report.claim_error) {
            (Some(fp), _) => println!("claim fingerprint:   {fp}"),
            (None, Some(e)) => println!("claim rejected:      {e}"),
            (None, None) => {}
        }
        println!("destination balance: {}", report.destination_balance);
        println!(
            "replay:              {}",
            if report.replay_rejected { "rejected (AlreadyClaimed)" } else { "not rejected" }
        );
    }

    Ok(if report.succeeded() { 0 } else { 1 })
}

/// Run burn → claim → replay with the given settings.
pub fn run_scenario(config: &DemoConfig) -> Result<DemoReport> {
    let proof_relay = Arc::new(ProofRelay::new());
    let dest_relay: Arc<dyn RelayOracle> = match config.relay {
        RelayMode::Proof => Arc::clone(&proof_relay) as Arc<dyn RelayOracle>,
        RelayMode::Stub {
            transaction,
            receipt,
        } => Arc::new(StubRelay::new(transaction, receipt)),
    };

    let source = BridgeToken::deploy(
        config.source,
        config.deployer,
        config.initial_supply,
        Arc::new(ProofRelay::new()),
    )
    .context("deploying source instance")?;
    let dest = BridgeToken::deploy(
        config.destination,
        config.deployer,
        config.initial_supply,
        dest_relay,
    )
    .context("deploying destination instance")?;
    source
        .register_sibling(config.destination)
        .context("pairing source")?;
    dest.register_sibling(config.source)
        .context("pairing destination")?;

    let recipient = config.recipient();
    let mut origin = Devnet::new(config.chain_id).context("starting origin devnet")?;
    let sub = origin.submit_burn(
        &source,
        config.deployer,
        recipient,
        config.destination,
        config.amount,
    );
    if let Err(e) = &sub.outcome {
        tracing::warn!(error = %e, "burn rejected on source; its failed receipt is still sealed");
    }
    let block_hash = origin.seal()?.header.hash();
    proof_relay.trust_header(block_hash);

    let bundle = origin.claim_bundle(sub.block, sub.index)?;
    let (fingerprint, claim_error) = match dest.transfer_from_chain(&bundle) {
        Ok(receipt) => (Some(receipt.fingerprint), None),
        Err(e) => (None, Some(e.to_string())),
    };
    let replay_rejected = matches!(
        dest.transfer_from_chain(&bundle),
        Err(BridgeError::AlreadyClaimed(_))
    );

    Ok(DemoReport {
        burn_transaction: sub.hash,
        block_hash,
        source_balance: balance(&source, config.deployer),
        destination_balance: balance(&dest, recipient),
        fingerprint,
        claim_error,
        replay_rejected,
        source_metrics: source.metrics().snapshot(),
        destination_metrics: dest.metrics().snapshot(),
    })
}

fn balance(token: &BridgeToken, account: Address) -> String {
    format!("{} ({account})", token.balance_of(&account))
}
