//! # Demo Configuration
//!
//! YAML file passed with `--config`. Every field has a default, so an empty
//! file, or no file at all, runs the standard scenario: one unit minted to
//! the deployer on each side and 1000 smallest units bridged.
//!
//! ```yaml
//! source: "0x5100000000000000000000000000000000000051"
//! destination: "0xd1000000000000000000000000000000000000d1"
//! amount: 1000
//! relay:
//!   mode: stub
//!   transaction: true
//!   receipt: false
//! ```

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use xchain_bridge::{MAX_CHAIN_ID, UNIT};
use xchain_core::bytes::quantity;
use xchain_core::Address;

/// How the destination instance learns about origin blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RelayMode {
    /// Fixed answers, no proofs checked.
    Stub {
        #[serde(default = "yes")]
        transaction: bool,
        #[serde(default = "yes")]
        receipt: bool,
    },
    /// Proofs checked against headers sealed by the devnet.
    #[default]
    Proof,
}

fn yes() -> bool {
    true
}

/// Settings for `xchain demo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// Identity of the instance on the source ledger.
    pub source: Address,
    /// Identity of the instance on the destination ledger.
    pub destination: Address,
    /// Account receiving the initial supply on both ledgers.
    pub deployer: Address,
    /// Account credited on the destination. Defaults to the deployer.
    pub recipient: Option<Address>,
    /// Initial supply per ledger, in smallest units.
    #[serde(with = "quantity")]
    pub initial_supply: u128,
    /// Smallest units to bridge.
    #[serde(with = "quantity")]
    pub amount: u128,
    /// Origin chain id stamped into devnet transactions.
    pub chain_id: u64,
    pub relay: RelayMode,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            source: Address([0x51; 20]),
            destination: Address([0xd1; 20]),
            deployer: Address([0xaa; 20]),
            recipient: None,
            initial_supply: UNIT,
            amount: 1000,
            chain_id: 1337,
            relay: RelayMode::default(),
        }
    }
}

impl DemoConfig {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        if config.chain_id > MAX_CHAIN_ID {
            bail!(
                "chain_id {} exceeds {MAX_CHAIN_ID}, the largest id with a valid v",
                config.chain_id
            );
        }
        tracing::debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }

    /// The account credited on the destination.
    pub fn recipient(&self) -> Address {
        self.recipient.unwrap_or(self.deployer)
    }
}
