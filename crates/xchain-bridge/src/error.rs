//! # Bridge Errors
//!
//! Every failure is the terminal outcome of the call that raised it. None is
//! retried internally and none leaves partial state: a rejected claim leaves
//! the claim set and balances exactly as they were.

use thiserror::Error;
use xchain_core::{Address, FormatError, H256};
use xchain_relay::RelayError;

use crate::payload::PayloadError;

/// Failure of a bridge operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// A submitted header, transaction, or receipt is not canonical RLP.
    #[error("malformed encoding: {0}")]
    Format(#[from] FormatError),

    /// The burn transaction was not sent to this instance's sibling.
    #[error("source {found:?} is not the registered sibling {expected:?}")]
    UnregisteredSource {
        /// Registered sibling, if any.
        expected: Option<Address>,
        /// Recipient of the burn transaction.
        found: Option<Address>,
    },

    /// The burn transaction's payload is not a burn call.
    #[error("burn payload: {0}")]
    Payload(#[from] PayloadError),

    /// The burn names a different destination instance.
    #[error("burn is destined for {found}, not this instance {expected}")]
    MisroutedClaim {
        /// This instance.
        expected: Address,
        /// Destination named in the burn.
        found: Address,
    },

    /// The destination identity is zero or not this instance's sibling.
    #[error("destination {0} is not a registered sibling")]
    UnregisteredDestination(Address),

    /// The relay does not confirm the transaction under the header.
    #[error("burn transaction {0} does not exist under the given header")]
    TransactionNotFound(H256),

    /// The relay does not confirm the receipt under the header.
    #[error("burn receipt for transaction {0} does not exist under the given header")]
    ReceiptNotFound(H256),

    /// The burn transaction reverted on the origin ledger.
    #[error("burn transaction {0} was not successful")]
    BurnFailed(H256),

    /// The claim fingerprint is already recorded.
    #[error("tokens have already been claimed (fingerprint {0})")]
    AlreadyClaimed(H256),

    /// The burner holds less than the requested amount.
    #[error("burn amount {requested} exceeds balance {balance} of {account}")]
    InsufficientBalance {
        /// Burning account.
        account: Address,
        /// Its balance.
        balance: u128,
        /// Amount requested.
        requested: u128,
    },

    /// Minting would overflow the total supply.
    #[error("minting {0} would overflow total supply")]
    SupplyOverflow(u128),

    /// The relay could not answer.
    #[error("relay: {0}")]
    Relay(#[from] RelayError),

    /// Sibling registration was refused.
    #[error("registry: {0}")]
    Registry(#[from] RegistryError),
}

impl BridgeError {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Format(_) => "format",
            Self::UnregisteredSource { .. } => "unregistered_source",
            Self::Payload(_) => "payload",
            Self::MisroutedClaim { .. } => "misrouted_claim",
            Self::UnregisteredDestination(_) => "unregistered_destination",
            Self::TransactionNotFound(_) => "transaction_not_found",
            Self::ReceiptNotFound(_) => "receipt_not_found",
            Self::BurnFailed(_) => "burn_failed",
            Self::AlreadyClaimed(_) => "already_claimed",
            Self::InsufficientBalance { .. } => "insufficient_balance",
            Self::SupplyOverflow(_) => "supply_overflow",
            Self::Relay(_) => "relay",
            Self::Registry(_) => "registry",
        }
    }
}

/// Sibling registration refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The zero identity can never be a sibling.
    #[error("the zero address cannot be registered as a sibling")]
    ZeroIdentity,

    /// A different sibling is already registered.
    #[error("sibling {existing} already registered; refusing {requested}")]
    SiblingAlreadyRegistered {
        /// Registered sibling.
        existing: Address,
        /// Identity offered.
        requested: Address,
    },
}
