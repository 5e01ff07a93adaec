//! # Canonical Encoding — Recursive Length Prefix (RLP)
//!
//! The origin ledger identifies every header, transaction, receipt, and
//! trie node by the Keccak-256 of its RLP encoding. This module is the
//! single implementation of that encoding for the whole workspace.
//!
//! ## Encoding Rules
//!
//! ```text
//! byte string, len 1, value < 0x80   → the byte itself
//! byte string, len 0..=55             → 0x80 + len, payload
//! byte string, len > 55               → 0xb7 + len(len), len (BE), payload
//! list, payload 0..=55                → 0xc0 + len, payload
//! list, payload > 55                  → 0xf7 + len(len), len (BE), payload
//! integer                             → minimal big-endian string, 0 = empty
//! ```
//!
//! ## Security Invariant
//!
//! Decoding is strict. Any input that would not re-encode to exactly the
//! same bytes is rejected with a [`FormatError`], so
//! `encode(decode(b)) == b` for every accepted `b`. The destination side
//! depends on this: it recomputes digests from decoded records and compares
//! them with digests committed by the origin ledger.
//!
//! [`RlpBytes`] is the only way to obtain a record's encoding for digest
//! computation. Its inner buffer is private and is produced solely by
//! [`RlpBytes::encode`].

use crate::digest::{keccak256, H256};
use crate::error::FormatError;

/// Maximum list nesting accepted by the decoder. The deepest origin-ledger
/// structure (a receipt's log topics) nests four levels.
pub const MAX_DEPTH: usize = 64;

const SHORT_LIMIT: usize = 55;
const STRING_BASE: u8 = 0x80;
const LIST_BASE: u8 = 0xc0;

// ---------------------------------------------------------------------------
// Value universe
// ---------------------------------------------------------------------------

/// A decoded RLP value: a byte string or an ordered list of values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RlpItem {
    /// A byte string.
    Bytes(Vec<u8>),
    /// An ordered list.
    List(Vec<RlpItem>),
}

impl RlpItem {
    /// Wrap a byte string.
    pub fn bytes(b: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(b.into())
    }

    /// Wrap a list.
    pub fn list(items: Vec<RlpItem>) -> Self {
        Self::List(items)
    }

    /// Encode an unsigned integer as its minimal big-endian byte string.
    pub fn uint(v: u128) -> Self {
        Self::Bytes(minimal_be(v))
    }

    /// Encode this value.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.payload_hint());
        self.encode_into(&mut out);
        out
    }

    fn payload_hint(&self) -> usize {
        match self {
            Self::Bytes(b) => b.len() + 9,
            Self::List(items) => items.len() * 8 + 9,
        }
    }

    fn encode_into(&self, out: &mut Vec<u8>) {
        match self {
            Self::Bytes(b) => {
                if b.len() == 1 && b[0] < STRING_BASE {
                    out.push(b[0]);
                } else {
                    encode_length(b.len(), STRING_BASE, out);
                    out.extend_from_slice(b);
                }
            }
            Self::List(items) => {
                let mut payload = Vec::new();
                for item in items {
                    item.encode_into(&mut payload);
                }
                encode_length(payload.len(), LIST_BASE, out);
                out.extend_from_slice(&payload);
            }
        }
    }

    /// Decode exactly one value occupying all of `input`.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] if a prefix overruns the input, a list
    /// payload is not consumed exactly by its items, bytes trail the value,
    /// or any prefix is non-canonical.
    pub fn decode(input: &[u8]) -> Result<Self, FormatError> {
        let (item, used) = decode_at(input, 0, 0)?;
        if used != input.len() {
            return Err(FormatError::TrailingBytes(input.len() - used));
        }
        Ok(item)
    }

    /// Borrow the byte string, or fail if this is a list.
    pub fn as_bytes(&self) -> Result<&[u8], FormatError> {
        match self {
            Self::Bytes(b) => Ok(b),
            Self::List(_) => Err(FormatError::ExpectedBytes),
        }
    }

    /// Borrow the list items, or fail if this is a byte string.
    pub fn as_list(&self) -> Result<&[RlpItem], FormatError> {
        match self {
            Self::List(items) => Ok(items),
            Self::Bytes(_) => Err(FormatError::ExpectedList),
        }
    }

    /// Interpret the byte string as a `u64`.
    pub fn as_u64(&self) -> Result<u64, FormatError> {
        let b = uint_bytes(self.as_bytes()?, 8)?;
        Ok(b.iter().fold(0u64, |acc, x| (acc << 8) | u64::from(*x)))
    }

    /// Interpret the byte string as a `u128`.
    pub fn as_u128(&self) -> Result<u128, FormatError> {
        let b = uint_bytes(self.as_bytes()?, 16)?;
        Ok(b.iter().fold(0u128, |acc, x| (acc << 8) | u128::from(*x)))
    }

    /// True if this is a list.
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }
}

impl std::fmt::Display for RlpItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Minimal big-endian representation of an unsigned integer (zero → empty).
pub fn minimal_be(v: u128) -> Vec<u8> {
    let be = v.to_be_bytes();
    let skip = be.iter().take_while(|b| **b == 0).count();
    be[skip..].to_vec()
}

/// Strip leading zero bytes from a fixed-width big-endian integer.
pub fn trim_leading_zeros(b: &[u8]) -> &[u8] {
    let skip = b.iter().take_while(|x| **x == 0).count();
    &b[skip..]
}

fn uint_bytes(b: &[u8], max: usize) -> Result<&[u8], FormatError> {
    if b.len() > max {
        return Err(FormatError::IntegerOverflow { len: b.len(), max });
    }
    if b.first() == Some(&0) {
        return Err(FormatError::LeadingZeroInteger);
    }
    Ok(b)
}

fn encode_length(len: usize, base: u8, out: &mut Vec<u8>) {
    if len <= SHORT_LIMIT {
        out.push(base + len as u8);
    } else {
        let be = minimal_be(len as u128);
        out.push(base + SHORT_LIMIT as u8 + be.len() as u8);
        out.extend_from_slice(&be);
    }
}

// ---------------------------------------------------------------------------
// Strict decoder
// ---------------------------------------------------------------------------

fn take(input: &[u8], offset: usize, start: usize, len: usize) -> Result<&[u8], FormatError> {
    let available = input.len().saturating_sub(start);
    match start.checked_add(len) {
        Some(end) if end <= input.len() => Ok(&input[start..end]),
        _ => Err(FormatError::UnexpectedEnd {
            offset,
            needed: len,
            available,
        }),
    }
}

fn read_long_length(input: &[u8], offset: usize, len_of_len: usize) -> Result<usize, FormatError> {
    let raw = take(input, offset, offset + 1, len_of_len)?;
    if raw[0] == 0 {
        return Err(FormatError::NonCanonicalLength(offset));
    }
    if len_of_len > std::mem::size_of::<usize>() {
        return Err(FormatError::LengthOverflow(offset));
    }
    let len = raw.iter().fold(0usize, |acc, b| (acc << 8) | usize::from(*b));
    if len <= SHORT_LIMIT {
        return Err(FormatError::NonCanonicalLength(offset));
    }
    Ok(len)
}

/// Decode one value starting at `offset`, returning it and the bytes used.
fn decode_at(input: &[u8], offset: usize, depth: usize) -> Result<(RlpItem, usize), FormatError> {
    if depth > MAX_DEPTH {
        return Err(FormatError::NestingTooDeep(MAX_DEPTH));
    }
    let prefix = *input.get(offset).ok_or(FormatError::UnexpectedEnd {
        offset,
        needed: 1,
        available: 0,
    })?;

    match prefix {
        0x00..=0x7f => Ok((RlpItem::Bytes(vec![prefix]), 1)),
        0x80..=0xb7 => {
            let len = usize::from(prefix - STRING_BASE);
            let payload = take(input, offset, offset + 1, len)?;
            if len == 1 && payload[0] < STRING_BASE {
                return Err(FormatError::NonCanonicalSingleByte(payload[0]));
            }
            Ok((RlpItem::Bytes(payload.to_vec()), 1 + len))
        }
        0xb8..=0xbf => {
            let len_of_len = usize::from(prefix - 0xb7);
            let len = read_long_length(input, offset, len_of_len)?;
            let payload = take(input, offset, offset + 1 + len_of_len, len)?;
            Ok((RlpItem::Bytes(payload.to_vec()), 1 + len_of_len + len))
        }
        0xc0..=0xf7 => {
            let len = usize::from(prefix - LIST_BASE);
            let items = decode_list_payload(input, offset, offset + 1, len, depth)?;
            Ok((RlpItem::List(items), 1 + len))
        }
        0xf8..=0xff => {
            let len_of_len = usize::from(prefix - 0xf7);
            let len = read_long_length(input, offset, len_of_len)?;
            let items = decode_list_payload(input, offset, offset + 1 + len_of_len, len, depth)?;
            Ok((RlpItem::List(items), 1 + len_of_len + len))
        }
    }
}

fn decode_list_payload(
    input: &[u8],
    offset: usize,
    start: usize,
    len: usize,
    depth: usize,
) -> Result<Vec<RlpItem>, FormatError> {
    take(input, offset, start, len)?;
    let end = start + len;
    let mut items = Vec::new();
    let mut pos = start;
    while pos < end {
        let (item, used) = decode_at(input, pos, depth + 1)?;
        if pos + used > end {
            return Err(FormatError::ListLengthMismatch {
                offset,
                declared: len,
                consumed: pos + used - start,
            });
        }
        items.push(item);
        pos += used;
    }
    Ok(items)
}

// ---------------------------------------------------------------------------
// Record traits
// ---------------------------------------------------------------------------

/// A record with a canonical RLP form.
pub trait RlpEncode {
    /// Build the record's RLP value.
    fn rlp_item(&self) -> RlpItem;

    /// Produce the record's canonical encoding.
    fn rlp_bytes(&self) -> RlpBytes
    where
        Self: Sized,
    {
        RlpBytes::encode(self)
    }
}

/// A record that can be recovered from its canonical RLP form.
pub trait RlpDecode: Sized {
    /// Recover the record from a decoded RLP value.
    fn from_rlp_item(item: &RlpItem) -> Result<Self, FormatError>;

    /// Decode the record from bytes.
    fn decode_rlp(bytes: &[u8]) -> Result<Self, FormatError> {
        Self::from_rlp_item(&RlpItem::decode(bytes)?)
    }
}

impl RlpEncode for RlpItem {
    fn rlp_item(&self) -> RlpItem {
        self.clone()
    }
}

/// Bytes produced exclusively by canonical RLP encoding of a record.
///
/// # Invariants
///
/// - The only constructor is [`RlpBytes::encode`].
/// - The bytes decode back to the record they were produced from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RlpBytes(Vec<u8>);

impl RlpBytes {
    /// Canonically encode a record.
    pub fn encode(value: &impl RlpEncode) -> Self {
        Self(value.rlp_item().encode())
    }

    /// Access the encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into the encoded bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    /// Keccak-256 of the encoding: the record's ledger identity.
    pub fn keccak(&self) -> H256 {
        keccak256(&self.0)
    }

    /// Length of the encoding.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the encoding is empty (never, for a well-formed record).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for RlpBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Field reader for fixed-shape records
// ---------------------------------------------------------------------------

/// Sequential reader over the fields of a record list.
#[derive(Debug)]
pub struct FieldReader<'a> {
    record: &'static str,
    items: &'a [RlpItem],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    /// Open a record list holding between `min` and `max` fields.
    pub fn new(
        record: &'static str,
        item: &'a RlpItem,
        min: usize,
        max: usize,
    ) -> Result<Self, FormatError> {
        let items = item.as_list()?;
        if items.len() < min || items.len() > max {
            return Err(FormatError::FieldCount {
                record,
                expected: min,
                found: items.len(),
            });
        }
        Ok(Self {
            record,
            items,
            pos: 0,
        })
    }

    /// Fields not yet read.
    pub fn remaining(&self) -> usize {
        self.items.len() - self.pos
    }

    /// Next raw field.
    pub fn item(&mut self) -> Result<&'a RlpItem, FormatError> {
        let item = self.items.get(self.pos).ok_or(FormatError::FieldCount {
            record: self.record,
            expected: self.pos + 1,
            found: self.items.len(),
        })?;
        self.pos += 1;
        Ok(item)
    }

    /// Next field as an opaque byte string.
    pub fn bytes(&mut self) -> Result<&'a [u8], FormatError> {
        self.item()?.as_bytes()
    }

    /// Next field as a byte string of exactly `N` bytes.
    pub fn fixed<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], FormatError> {
        let b = self.bytes()?;
        if b.len() != N {
            return Err(FormatError::InvalidLength {
                field,
                expected: N,
                found: b.len(),
            });
        }
        let mut out = [0u8; N];
        out.copy_from_slice(b);
        Ok(out)
    }

    /// Next field as a `u64`.
    pub fn u64(&mut self) -> Result<u64, FormatError> {
        self.item()?.as_u64()
    }

    /// Next field as a `u128`.
    pub fn u128(&mut self) -> Result<u128, FormatError> {
        self.item()?.as_u128()
    }

    /// Next field as a 256-bit integer, left-padded to 32 bytes.
    pub fn u256_word(&mut self) -> Result<[u8; 32], FormatError> {
        let b = uint_bytes(self.bytes()?, 32)?;
        let mut out = [0u8; 32];
        out[32 - b.len()..].copy_from_slice(b);
        Ok(out)
    }

    /// Next field as a list.
    pub fn list(&mut self) -> Result<&'a [RlpItem], FormatError> {
        self.item()?.as_list()
    }
}
