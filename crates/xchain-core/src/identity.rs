//! # Ledger Identities
//!
//! [`Address`] is the 20-byte identity of both accounts and token contracts
//! on either ledger. A distinct newtype keeps identities from being confused
//! with digests or arbitrary byte blobs.
//!
//! ## Security Invariant
//!
//! The zero address is the burn/mint sentinel in ledger-native transfer
//! events and is never a valid counterpart identity. Registry code must use
//! [`Address::is_zero`] to reject it.

/// A 20-byte account or contract identity.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; 20]);

crate::impl_fixed_bytes!(Address, 20);

impl Address {
    /// Left-pad the address into a 32-byte word, as event topics and call
    /// payload words carry it.
    pub fn to_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(&self.0);
        word
    }

    /// Recover an address from a 32-byte word. Returns `None` if the 12
    /// high-order bytes are not zero.
    pub fn from_word(word: &[u8; 32]) -> Option<Self> {
        if word[..12].iter().any(|b| *b != 0) {
            return None;
        }
        let mut out = [0u8; 20];
        out.copy_from_slice(&word[12..]);
        Some(Self(out))
    }
}
