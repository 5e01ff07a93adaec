//! # xchain CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use xchain_cli::claim::{run_claim, ClaimArgs};
use xchain_cli::demo::{run_demo, DemoArgs};
use xchain_cli::header::{run_header, HeaderArgs};
use xchain_cli::rlp::{run_rlp, RlpArgs};
use xchain_cli::trie::{run_trie, TrieArgs};

/// Cross-chain bridge toolchain.
///
/// Inspects canonical encodings and commitment tries, checks claim bundles
/// offline, and runs a two-ledger burn/claim demo.
#[derive(Parser, Debug)]
#[command(name = "xchain", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode canonical RLP or encode integers.
    Rlp(RlpArgs),

    /// Compute roots, produce proofs, and verify proofs.
    Trie(TrieArgs),

    /// Hash a JSON block header.
    Header(HeaderArgs),

    /// Check a claim bundle's proofs against its own header.
    Claim(ClaimArgs),

    /// Run burn → claim → replay across two devnet ledgers.
    Demo(DemoArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "xchain CLI starting");

    let result = match cli.command {
        Commands::Rlp(args) => run_rlp(&args),
        Commands::Trie(args) => run_trie(&args),
        Commands::Header(args) => run_header(&args),
        Commands::Claim(args) => run_claim(&args),
        Commands::Demo(args) => run_demo(&args, cli.config.as_deref()),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
