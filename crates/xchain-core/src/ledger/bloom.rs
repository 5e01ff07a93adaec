//! 2048-bit log bloom filter carried by headers and receipts.

use crate::digest::keccak256;
use crate::ledger::receipt::Log;

/// A 256-byte log bloom.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Bloom(pub [u8; 256]);

crate::impl_fixed_bytes!(Bloom, 256);

impl Default for Bloom {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Bloom {
    /// Set the three bits selected by `keccak256(input)`.
    pub fn accrue(&mut self, input: &[u8]) {
        let h = keccak256(input);
        for i in 0..3 {
            let bit = ((usize::from(h.0[2 * i]) << 8) | usize::from(h.0[2 * i + 1])) & 2047;
            self.0[255 - bit / 8] |= 1 << (bit % 8);
        }
    }

    /// Accrue a log's emitter and every topic.
    pub fn accrue_log(&mut self, log: &Log) {
        self.accrue(log.address.as_ref());
        for topic in &log.topics {
            self.accrue(topic.as_ref());
        }
    }

    /// Bloom over a sequence of logs.
    pub fn from_logs<'a>(logs: impl IntoIterator<Item = &'a Log>) -> Self {
        let mut bloom = Self::ZERO;
        for log in logs {
            bloom.accrue_log(log);
        }
        bloom
    }

    /// Merge another bloom into this one.
    pub fn union(&mut self, other: &Bloom) {
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a |= *b;
        }
    }

    /// True if every bit set by `input` is set here. False positives are
    /// possible; false negatives are not.
    pub fn may_contain(&self, input: &[u8]) -> bool {
        let mut query = Self::ZERO;
        query.accrue(input);
        query
            .0
            .iter()
            .zip(self.0.iter())
            .all(|(p, s)| p & s == *p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Address, Bytes};

    #[test]
    fn test_accrue_sets_at_most_three_bits() {
        let mut b = Bloom::ZERO;
        b.accrue(b"topic");
        let bits: u32 = b.0.iter().map(|x| x.count_ones()).sum();
        assert!((1..=3).contains(&bits));
        assert!(b.may_contain(b"topic"));
    }

    #[test]
    fn test_from_logs_covers_address_and_topics() {
        let log = Log {
            address: Address([7; 20]),
            topics: vec![keccak256(b"Transfer(address,address,uint256)")],
            data: Bytes::new(),
        };
        let bloom = Bloom::from_logs([&log]);
        assert!(bloom.may_contain(log.address.as_ref()));
        assert!(bloom.may_contain(log.topics[0].as_ref()));
    }

    #[test]
    fn test_union() {
        let mut a = Bloom::ZERO;
        a.accrue(b"a");
        let mut b = Bloom::ZERO;
        b.accrue(b"b");
        a.union(&b);
        assert!(a.may_contain(b"a") && a.may_contain(b"b"));
    }
}
