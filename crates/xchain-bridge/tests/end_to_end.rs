//! # Burn → Claim Scenarios
//!
//! Drives two bridge instances across an in-process origin devnet: burns
//! land in sealed blocks on the source side, claimants assemble bundles
//! with trie proofs, and the destination instance redeems them through a
//! proof-checking relay.

use std::sync::Arc;
use std::thread;

use proptest::prelude::*;
use xchain_bridge::{BridgeError, BridgeEvent, BridgeToken, Devnet, UNIT};
use xchain_core::{Address, Bytes, RlpDecode, RlpEncode, Transaction};
use xchain_relay::{ClaimBundle, ProofRelay, RelayError, StubRelay};

const S: Address = Address([0x51; 20]);
const D: Address = Address([0xd1; 20]);
const ALICE: Address = Address([0xaa; 20]);
const BOB: Address = Address([0xbb; 20]);

struct Fixture {
    source: BridgeToken,
    dest: BridgeToken,
    relay: Arc<ProofRelay>,
    origin: Devnet,
}

impl Fixture {
    fn new() -> Self {
        let relay = Arc::new(ProofRelay::new());
        let source = BridgeToken::deploy(S, ALICE, UNIT, Arc::new(ProofRelay::new())).unwrap();
        let dest = BridgeToken::deploy(D, BOB, UNIT, relay.clone()).unwrap();
        source.register_sibling(D).unwrap();
        dest.register_sibling(S).unwrap();
        Self {
            source,
            dest,
            relay,
            origin: Devnet::new(1337).unwrap(),
        }
    }

    /// Burn on the source, seal, trust the header, and return the bundle.
    fn burn(
        &mut self,
        caller: Address,
        recipient: Address,
        destination: Address,
        amount: u128,
    ) -> ClaimBundle {
        self.origin.submit_plain(BOB, Address([0x77; 20]), vec![0xde, 0xad]);
        let sub = self
            .origin
            .submit_burn(&self.source, caller, recipient, destination, amount);
        let block = self.origin.seal().unwrap();
        self.relay.trust_header(block.header.hash());
        self.origin.claim_bundle(sub.block, sub.index).unwrap()
    }
}

fn reencode_tx(bundle: &ClaimBundle, edit: impl FnOnce(&mut Transaction)) -> ClaimBundle {
    let mut tx = Transaction::decode_rlp(bundle.transaction.as_slice()).unwrap();
    edit(&mut tx);
    ClaimBundle {
        transaction: Bytes(tx.rlp_bytes().into_vec()),
        ..bundle.clone()
    }
}

#[test]
fn burn_then_claim_mints_once() {
    let mut fx = Fixture::new();
    let bundle = fx.burn(ALICE, ALICE, D, 1000);
    assert_eq!(fx.source.balance_of(&ALICE), 999_999_999_999_999_000);
    assert_eq!(fx.source.total_supply(), UNIT - 1000);

    let burn_record = BridgeEvent::ChainTransfer {
        source: S,
        destination: D,
        recipient: ALICE,
        amount: 1000,
    };
    assert_eq!(fx.source.events().last(), Some(&burn_record));

    let receipt = fx.dest.transfer_from_chain(&bundle).unwrap();
    assert_eq!(receipt.recipient, ALICE);
    assert_eq!(receipt.amount, 1000);
    assert_eq!(fx.dest.balance_of(&ALICE), 1000);
    assert_eq!(fx.dest.total_supply(), UNIT + 1000);
    assert_eq!(
        receipt.events,
        vec![
            BridgeEvent::Transfer {
                from: Address::ZERO,
                to: ALICE,
                value: 1000,
            },
            burn_record,
        ]
    );
    assert!(fx.dest.is_claimed(&receipt.fingerprint));

    let replay = fx.dest.transfer_from_chain(&bundle).unwrap_err();
    assert_eq!(replay, BridgeError::AlreadyClaimed(receipt.fingerprint));
    assert_eq!(fx.dest.balance_of(&ALICE), 1000);

    let m = fx.dest.metrics().snapshot();
    assert_eq!((m.claims_minted, m.claims_rejected), (1, 1));
}

#[test]
fn bundle_survives_json_transport() {
    let mut fx = Fixture::new();
    let bundle = fx.burn(ALICE, BOB, D, 42);
    let json = serde_json::to_string(&bundle).unwrap();
    assert!(json.contains("\"txProof\""));
    let back: ClaimBundle = serde_json::from_str(&json).unwrap();
    fx.dest.transfer_from_chain(&back).unwrap();
    assert_eq!(fx.dest.balance_of(&BOB), UNIT + 42);
}

#[test]
fn identical_burns_are_separate_claims() {
    let mut fx = Fixture::new();
    let first = fx.burn(ALICE, ALICE, D, 5);
    let second = fx.burn(ALICE, ALICE, D, 5);
    let a = fx.dest.transfer_from_chain(&first).unwrap();
    let b = fx.dest.transfer_from_chain(&second).unwrap();
    assert_ne!(a.fingerprint, b.fingerprint);
    assert_eq!(fx.dest.balance_of(&ALICE), 10);
}

#[test]
fn tampered_destination_is_unregistered_source() {
    let mut fx = Fixture::new();
    let bundle = fx.burn(ALICE, ALICE, D, 1000);
    let forged = reencode_tx(&bundle, |tx| tx.to = Some(Address([0x99; 20])));
    let err = fx.dest.transfer_from_chain(&forged).unwrap_err();
    assert_eq!(
        err,
        BridgeError::UnregisteredSource {
            expected: Some(S),
            found: Some(Address([0x99; 20])),
        }
    );
    assert_eq!(fx.dest.balance_of(&ALICE), 0);
    assert_eq!(fx.source.balance_of(&ALICE), UNIT - 1000);

    // The untouched bundle still redeems.
    fx.dest.transfer_from_chain(&bundle).unwrap();
}

#[test]
fn tampered_amount_fails_inclusion() {
    let mut fx = Fixture::new();
    let bundle = fx.burn(ALICE, ALICE, D, 1000);
    let inflated = reencode_tx(&bundle, |tx| {
        let mut data = tx.data.clone().into_vec();
        data[99] = 0xff;
        tx.data = Bytes(data);
    });
    assert!(matches!(
        fx.dest.transfer_from_chain(&inflated),
        Err(BridgeError::TransactionNotFound(_))
    ));
    assert_eq!(fx.dest.balance_of(&ALICE), 0);
}

#[test]
fn failed_burn_cannot_be_claimed() {
    let mut fx = Fixture::new();
    let bundle = fx.burn(BOB, BOB, D, 1);
    assert!(matches!(
        fx.dest.transfer_from_chain(&bundle),
        Err(BridgeError::BurnFailed(_))
    ));
    assert_eq!(fx.dest.balance_of(&BOB), UNIT);
}

#[test]
fn burn_to_other_instance_is_misrouted() {
    let mut fx = Fixture::new();
    let bundle = fx.burn(ALICE, ALICE, Address([0x33; 20]), 1);
    assert_eq!(
        fx.dest.transfer_from_chain(&bundle),
        Err(BridgeError::MisroutedClaim {
            expected: D,
            found: Address([0x33; 20]),
        })
    );
}

#[test]
fn untrusted_header_is_transaction_not_found() {
    let mut fx = Fixture::new();
    let sub = fx.origin.submit_burn(&fx.source, ALICE, ALICE, D, 7);
    fx.origin.seal().unwrap();
    let bundle = fx.origin.claim_bundle(sub.block, sub.index).unwrap();
    assert_eq!(
        fx.dest.transfer_from_chain(&bundle),
        Err(BridgeError::TransactionNotFound(sub.hash))
    );
}

#[test]
fn proof_relay_needs_proofs() {
    let mut fx = Fixture::new();
    let bundle = fx.burn(ALICE, ALICE, D, 7).strip_proofs();
    assert!(matches!(
        fx.dest.transfer_from_chain(&bundle),
        Err(BridgeError::Relay(RelayError::MissingWitness { .. }))
    ));
}

#[test]
fn stub_relay_answers_drive_rejections() {
    let mut fx = Fixture::new();
    let bundle = fx.burn(ALICE, ALICE, D, 1000).strip_proofs();

    let no_tx = BridgeToken::deploy(D, BOB, 0, Arc::new(StubRelay::new(false, true))).unwrap();
    no_tx.register_sibling(S).unwrap();
    assert!(matches!(
        no_tx.transfer_from_chain(&bundle),
        Err(BridgeError::TransactionNotFound(_))
    ));

    let no_receipt = BridgeToken::deploy(D, BOB, 0, Arc::new(StubRelay::new(true, false))).unwrap();
    no_receipt.register_sibling(S).unwrap();
    assert!(matches!(
        no_receipt.transfer_from_chain(&bundle),
        Err(BridgeError::ReceiptNotFound(_))
    ));

    let trusting = BridgeToken::deploy(D, BOB, 0, Arc::new(StubRelay::new(true, true))).unwrap();
    trusting.register_sibling(S).unwrap();
    trusting.transfer_from_chain(&bundle).unwrap();
    assert_eq!(trusting.balance_of(&ALICE), 1000);
}

#[test]
fn unpaired_destination_rejects_every_claim() {
    let mut fx = Fixture::new();
    let bundle = fx.burn(ALICE, ALICE, D, 1000);
    let lonely = BridgeToken::deploy(D, BOB, 0, fx.relay.clone()).unwrap();
    assert_eq!(
        lonely.transfer_from_chain(&bundle),
        Err(BridgeError::UnregisteredSource {
            expected: None,
            found: Some(S),
        })
    );
}

#[test]
fn burn_rejections_leave_balances() {
    let fx = Fixture::new();
    assert_eq!(
        fx.source.transfer_to_chain(ALICE, ALICE, Address::ZERO, 1),
        Err(BridgeError::UnregisteredDestination(Address::ZERO))
    );
    assert!(matches!(
        fx.source.transfer_to_chain(ALICE, ALICE, D, UNIT + 1),
        Err(BridgeError::InsufficientBalance { .. })
    ));
    assert_eq!(fx.source.balance_of(&ALICE), UNIT);
    assert_eq!(fx.source.metrics().snapshot().burns_rejected, 2);
}

#[test]
fn racing_claims_mint_exactly_once() {
    let mut fx = Fixture::new();
    let bundle = fx.burn(ALICE, ALICE, D, 1000);
    let dest = Arc::new(fx.dest);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let dest = Arc::clone(&dest);
            let bundle = bundle.clone();
            thread::spawn(move || dest.transfer_from_chain(&bundle))
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, BridgeError::AlreadyClaimed(_))));
    assert_eq!(dest.balance_of(&ALICE), 1000);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Whatever order and multiplicity claims arrive in, each burn mints
    /// exactly once.
    #[test]
    fn claims_mint_at_most_once(
        amounts in prop::collection::vec(1u128..1_000_000, 1..4),
        order in prop::collection::vec(0usize..16, 1..12),
    ) {
        let mut fx = Fixture::new();
        let bundles: Vec<_> = amounts.iter().map(|&a| fx.burn(ALICE, ALICE, D, a)).collect();
        let mut seen = std::collections::HashSet::new();
        let mut expected = 0u128;
        for i in order {
            let i = i % bundles.len();
            let result = fx.dest.transfer_from_chain(&bundles[i]);
            if seen.insert(i) {
                prop_assert!(result.is_ok());
                expected += amounts[i];
            } else {
                prop_assert!(matches!(result, Err(BridgeError::AlreadyClaimed(_))));
            }
        }
        prop_assert_eq!(fx.dest.balance_of(&ALICE), expected);
    }
}
