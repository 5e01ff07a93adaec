//! # xchain-bridge — Burn/Claim Protocol
//!
//! A [`BridgeToken`] instance lives on each of two ledgers. Each is paired
//! once with its sibling. Tokens burned on one side through
//! [`BridgeToken::transfer_to_chain`] are minted on the other through
//! [`BridgeToken::transfer_from_chain`] once the claimant proves the burn
//! against a relayed origin header.
//!
//! ## Crate Policy
//!
//! - All state of one instance sits behind a single `parking_lot::Mutex`.
//!   Relay calls are made without it held.
//! - Amounts are `u128` smallest units. Supply arithmetic is checked.
//! - A rejected call is an `Err` and changes nothing.
//! - [`devnet`] is a test and demo harness. It plays the origin ledger in
//!   process and is not part of the claim path.

pub mod claim;
pub mod devnet;
pub mod error;
pub mod event;
pub mod ledger;
pub mod payload;
pub mod registry;
pub mod telemetry;
pub mod token;

pub use claim::{ClaimSet, ClaimTriple};
pub use devnet::{Devnet, DevnetError, SealedBlock, Submitted, MAX_CHAIN_ID};
pub use error::{BridgeError, RegistryError};
pub use event::BridgeEvent;
pub use ledger::{TokenLedger, UNIT};
pub use payload::{BurnCall, PayloadError};
pub use registry::SiblingRegistry;
pub use telemetry::{BridgeMetrics, MetricsSnapshot};
pub use token::{BridgeToken, ClaimReceipt};
