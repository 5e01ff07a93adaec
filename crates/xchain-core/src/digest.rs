//! # Keccak-256 Digests
//!
//! Defines [`H256`], the 32-byte digest that identifies blocks, transactions,
//! trie nodes, and claim fingerprints on the origin ledger, and the
//! Keccak-256 function that produces it.
//!
//! ## Security Invariant
//!
//! Ledger records are identified by `keccak256(rlp(record))`. Record types
//! expose their digest only through [`RlpBytes::keccak`](crate::rlp::RlpBytes::keccak),
//! so a digest can never be taken over a non-canonical serialization of a
//! record. The raw [`keccak256`] entry point exists for trie nodes and proof
//! material, which arrive as opaque bytes and are hashed exactly as received.
//!
//! Keccak-256 here is the original Keccak submission (pre-FIPS padding), as
//! used by the origin ledger, not NIST SHA3-256.

use sha3::{Digest, Keccak256};

/// A 32-byte Keccak-256 digest.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct H256(pub [u8; 32]);

crate::impl_fixed_bytes!(H256, 32);

/// Compute Keccak-256 of raw bytes.
pub fn keccak256(data: &[u8]) -> H256 {
    let hash = Keccak256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hash);
    H256(out)
}

/// Compute Keccak-256 over the concatenation of several byte slices.
pub fn keccak256_concat(parts: &[&[u8]]) -> H256 {
    let mut hasher = Keccak256::new();
    for p in parts {
        hasher.update(p);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    H256(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak_empty_known_vector() {
        assert_eq!(
            keccak256(b"").to_hex(),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_keccak_of_rlp_empty_string_is_empty_trie_root() {
        assert_eq!(
            keccak256(&[0x80]).to_hex(),
            "0x56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421"
        );
    }

    #[test]
    fn test_keccak_transfer_event_signature() {
        assert_eq!(
            keccak256(b"Transfer(address,address,uint256)").to_hex(),
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }

    #[test]
    fn test_concat_matches_single_buffer() {
        assert_eq!(keccak256_concat(&[b"ab", b"cd"]), keccak256(b"abcd"));
    }

    #[test]
    fn test_h256_hex_round_trip() {
        let d = keccak256(b"x");
        assert_eq!(H256::from_hex(&d.to_hex()).unwrap(), d);
        assert!(H256::from_hex("0x00").is_err());
    }
}
