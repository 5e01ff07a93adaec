//! # Bridge Token — Burn/Claim State Machine
//!
//! One instance lives on each ledger. A transfer burns on the source
//! instance and is redeemed on its registered sibling:
//!
//! ```text
//! source: transfer_to_chain ──▶ Burned ──(claimant proves burn)──▶ destination: Claimed
//!                                  │
//!                                  └── never claimed: inert, not an error
//! ```
//!
//! ## Claim Validation Order
//!
//! `transfer_from_chain` evaluates, in this order, and stops at the first
//! failure:
//!
//! 0. header, transaction, and receipt decode canonically (`Format`)
//! 1. the transaction was sent to the registered sibling (`UnregisteredSource`)
//! 2. its payload is a burn call naming this instance (`Payload`, `MisroutedClaim`)
//! 3. the relay confirms the transaction under the header (`TransactionNotFound`)
//! 4. the relay confirms the receipt under the header (`ReceiptNotFound`)
//! 5. the receipt reports success (`BurnFailed`)
//! 6. the fingerprint is unclaimed (`AlreadyClaimed`)
//!
//! ## Security Invariant
//!
//! At most one claim per fingerprint ever mints. Step 6, recording the
//! fingerprint, and the mint run under one acquisition of the instance
//! lock, so of two racing claims exactly one observes the fingerprint as
//! absent. Relay calls run before the lock is taken and never hold it.
//! Every rejected call leaves balances and the claim set unchanged.

use std::sync::Arc;

use parking_lot::Mutex;
use xchain_core::rlp::RlpDecode;
use xchain_core::{Address, BlockHeader, Receipt, Transaction, H256};
use xchain_relay::{ClaimBundle, InclusionQuery, RelayOracle};

use crate::claim::{ClaimSet, ClaimTriple};
use crate::error::BridgeError;
use crate::event::BridgeEvent;
use crate::ledger::TokenLedger;
use crate::payload::BurnCall;
use crate::registry::SiblingRegistry;
use crate::telemetry::BridgeMetrics;

#[derive(Debug, Default)]
struct TokenState {
    ledger: TokenLedger,
    registry: SiblingRegistry,
    claims: ClaimSet,
    events: Vec<BridgeEvent>,
}

/// A successful claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimReceipt {
    /// Recorded fingerprint.
    pub fingerprint: H256,
    /// Hash of the redeemed burn transaction.
    pub burn_transaction: H256,
    /// Account credited.
    pub recipient: Address,
    /// Smallest units minted.
    pub amount: u128,
    /// Events emitted, in order.
    pub events: Vec<BridgeEvent>,
}

/// A bridge token instance on one ledger.
pub struct BridgeToken {
    identity: Address,
    relay: Arc<dyn RelayOracle>,
    state: Mutex<TokenState>,
    metrics: BridgeMetrics,
}

impl std::fmt::Debug for BridgeToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeToken")
            .field("identity", &self.identity)
            .field("sibling", &self.sibling())
            .finish_non_exhaustive()
    }
}

impl BridgeToken {
    /// Deploy an instance at `identity`, minting `initial_supply` to
    /// `deployer`.
    pub fn deploy(
        identity: Address,
        deployer: Address,
        initial_supply: u128,
        relay: Arc<dyn RelayOracle>,
    ) -> Result<Self, BridgeError> {
        let mut state = TokenState::default();
        state.ledger.mint(deployer, initial_supply)?;
        if initial_supply > 0 {
            state.events.push(BridgeEvent::Transfer {
                from: Address::ZERO,
                to: deployer,
                value: initial_supply,
            });
        }
        tracing::info!(token = %identity, %deployer, initial_supply, "bridge token deployed");
        Ok(Self {
            identity,
            relay,
            state: Mutex::new(state),
            metrics: BridgeMetrics::new(),
        })
    }

    /// This instance's identity.
    pub fn identity(&self) -> Address {
        self.identity
    }

    /// Balance of `account`.
    pub fn balance_of(&self, account: &Address) -> u128 {
        self.state.lock().ledger.balance_of(account)
    }

    /// Total supply on this ledger.
    pub fn total_supply(&self) -> u128 {
        self.state.lock().ledger.total_supply()
    }

    /// The registered sibling, if paired.
    pub fn sibling(&self) -> Option<Address> {
        self.state.lock().registry.sibling()
    }

    /// True if `fingerprint` has been claimed here.
    pub fn is_claimed(&self, fingerprint: &H256) -> bool {
        self.state.lock().claims.contains(fingerprint)
    }

    /// All events emitted so far, in order.
    pub fn events(&self) -> Vec<BridgeEvent> {
        self.state.lock().events.clone()
    }

    /// Counters for this instance.
    pub fn metrics(&self) -> &BridgeMetrics {
        &self.metrics
    }

    /// Pair this instance with its counterpart. Idempotent for the same
    /// identity.
    pub fn register_sibling(&self, sibling: Address) -> Result<(), BridgeError> {
        let paired = self.state.lock().registry.register(sibling)?;
        if paired {
            tracing::info!(token = %self.identity, %sibling, "sibling registered");
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Burn
    // -----------------------------------------------------------------------

    /// Burn `amount` from `caller` towards `recipient` on `destination`.
    ///
    /// # Errors
    ///
    /// `UnregisteredDestination` if `destination` is zero or not the
    /// registered sibling; `InsufficientBalance` if `caller` holds less
    /// than `amount`. Neither mutates any balance.
    pub fn transfer_to_chain(
        &self,
        caller: Address,
        recipient: Address,
        destination: Address,
        amount: u128,
    ) -> Result<Vec<BridgeEvent>, BridgeError> {
        let result = self.burn_locked(caller, recipient, destination, amount);
        match &result {
            Ok(_) => {
                self.metrics.burn_accepted();
                tracing::info!(
                    token = %self.identity,
                    %caller,
                    %recipient,
                    %destination,
                    amount,
                    "burn accepted"
                );
            }
            Err(e) => {
                self.metrics.burn_rejected(e.kind());
                tracing::warn!(token = %self.identity, %caller, %destination, amount, error = %e, "burn rejected");
            }
        }
        result
    }

    fn burn_locked(
        &self,
        caller: Address,
        recipient: Address,
        destination: Address,
        amount: u128,
    ) -> Result<Vec<BridgeEvent>, BridgeError> {
        let mut state = self.state.lock();
        if !state.registry.is_sibling(&destination) {
            return Err(BridgeError::UnregisteredDestination(destination));
        }
        state.ledger.burn(caller, amount)?;
        let events = vec![
            BridgeEvent::Transfer {
                from: caller,
                to: Address::ZERO,
                value: amount,
            },
            BridgeEvent::ChainTransfer {
                source: self.identity,
                destination,
                recipient,
                amount,
            },
        ];
        state.events.extend_from_slice(&events);
        Ok(events)
    }

    // -----------------------------------------------------------------------
    // Claim
    // -----------------------------------------------------------------------

    /// Redeem a burn proven by `bundle`, minting to the burn's recipient.
    ///
    /// # Errors
    ///
    /// See the validation order in the module documentation. A failed call
    /// changes nothing and may be resubmitted with corrected material.
    pub fn transfer_from_chain(&self, bundle: &ClaimBundle) -> Result<ClaimReceipt, BridgeError> {
        let result = self.claim(bundle);
        match &result {
            Ok(receipt) => {
                self.metrics.claim_minted();
                tracing::info!(
                    token = %self.identity,
                    fingerprint = %receipt.fingerprint,
                    burn_tx = %receipt.burn_transaction,
                    recipient = %receipt.recipient,
                    amount = receipt.amount,
                    "claim minted"
                );
            }
            Err(e) => {
                self.metrics.claim_rejected(e.kind());
                tracing::warn!(token = %self.identity, reason = e.kind(), error = %e, "claim rejected");
            }
        }
        result
    }

    fn claim(&self, bundle: &ClaimBundle) -> Result<ClaimReceipt, BridgeError> {
        let header = BlockHeader::decode_rlp(bundle.header.as_slice())?;
        let tx = Transaction::decode_rlp(bundle.transaction.as_slice())?;
        let receipt = Receipt::decode_rlp(bundle.receipt.as_slice())?;
        let tx_hash = tx.hash();

        // The sibling is set-once, so a check outside the lock stays valid.
        let source = match (self.sibling(), tx.to) {
            (Some(s), Some(to)) if s == to => s,
            (expected, found) => return Err(BridgeError::UnregisteredSource { expected, found }),
        };

        let call = BurnCall::decode(tx.data.as_slice())?;
        if call.destination != self.identity {
            return Err(BridgeError::MisroutedClaim {
                expected: self.identity,
                found: call.destination,
            });
        }

        let path = bundle.path.as_ref().map(|p| p.as_slice());
        let tx_query = InclusionQuery::new(&header, bundle.transaction.as_slice())
            .with_witness(bundle.tx_proof.as_ref(), path);
        if !self.relay.verify_transaction(&tx_query)? {
            return Err(BridgeError::TransactionNotFound(tx_hash));
        }
        let receipt_query = InclusionQuery::new(&header, bundle.receipt.as_slice())
            .with_witness(bundle.receipt_proof.as_ref(), path);
        if !self.relay.verify_receipt(&receipt_query)? {
            return Err(BridgeError::ReceiptNotFound(tx_hash));
        }

        if !receipt.is_success() {
            return Err(BridgeError::BurnFailed(tx_hash));
        }

        let fingerprint = ClaimTriple {
            header: &header,
            transaction: &tx,
            receipt: &receipt,
        }
        .fingerprint();

        let mut state = self.state.lock();
        if state.claims.contains(&fingerprint) {
            return Err(BridgeError::AlreadyClaimed(fingerprint));
        }
        state.ledger.mint(call.recipient, call.amount)?;
        state.claims.record(fingerprint);
        let events = vec![
            BridgeEvent::Transfer {
                from: Address::ZERO,
                to: call.recipient,
                value: call.amount,
            },
            BridgeEvent::ChainTransfer {
                source,
                destination: self.identity,
                recipient: call.recipient,
                amount: call.amount,
            },
        ];
        state.events.extend_from_slice(&events);
        Ok(ClaimReceipt {
            fingerprint,
            burn_transaction: tx_hash,
            recipient: call.recipient,
            amount: call.amount,
            events,
        })
    }
}
