//! # xchain-relay — Relay Oracle Capability
//!
//! The bridge consults a [`RelayOracle`] to learn whether a claimed burn
//! transaction and its receipt are committed in a canonical origin block.
//! This crate defines that capability and its two backings, plus the
//! claimant-side tooling that produces the proof material a proof-checking
//! relay needs.
//!
//! ## Crate Policy
//!
//! - Oracles are `Send + Sync` and injected as `Arc<dyn RelayOracle>`.
//! - No retries. An oracle that cannot answer returns `Err`, and the
//!   caller decides what to do.

pub mod assembly;
pub mod error;
pub mod oracle;
pub mod proof_relay;

pub use assembly::{assemble_claim, BlockTries, ClaimBundle};
pub use error::{AssemblyError, RelayError};
pub use oracle::{InclusionQuery, RelayOracle, StubRelay};
pub use proof_relay::ProofRelay;
