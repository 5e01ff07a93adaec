//! # Error Types — Canonical Encoding Failures
//!
//! Defines the error types raised while decoding origin-ledger bytes. All
//! errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Every rejection carries the offset or field that caused it, so a
//!   claimant can tell which part of a submitted bundle is corrupt.
//! - Decoding is strict: any byte sequence that would not re-encode to
//!   itself is rejected here rather than normalised.

use thiserror::Error;

/// Malformed canonical (RLP) encoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A length prefix claims more bytes than remain in the input.
    #[error("unexpected end of input at offset {offset}: needed {needed} bytes, {available} available")]
    UnexpectedEnd {
        /// Offset of the prefix that overran.
        offset: usize,
        /// Bytes the prefix declared.
        needed: usize,
        /// Bytes actually remaining.
        available: usize,
    },

    /// A list payload was not consumed exactly by its items.
    #[error("list payload at offset {offset} declares {declared} bytes but items consume {consumed}")]
    ListLengthMismatch {
        /// Offset of the list prefix.
        offset: usize,
        /// Declared payload length.
        declared: usize,
        /// Bytes consumed by the decoded items.
        consumed: usize,
    },

    /// Bytes remain after the top-level item.
    #[error("{0} trailing bytes after top-level item")]
    TrailingBytes(usize),

    /// A single byte below 0x80 was wrapped in a string prefix.
    #[error("single byte {0:#04x} must be encoded as itself")]
    NonCanonicalSingleByte(u8),

    /// The long form was used for a short length, or the length has leading zeros.
    #[error("non-canonical length prefix at offset {0}")]
    NonCanonicalLength(usize),

    /// A declared length does not fit in `usize`.
    #[error("length prefix at offset {0} overflows")]
    LengthOverflow(usize),

    /// Lists nest deeper than any origin-ledger record can.
    #[error("nesting depth exceeds {0}")]
    NestingTooDeep(usize),

    /// A list was required.
    #[error("expected a list, found a byte string")]
    ExpectedList,

    /// A byte string was required.
    #[error("expected a byte string, found a list")]
    ExpectedBytes,

    /// An integer carried a leading zero byte.
    #[error("integer has a leading zero byte")]
    LeadingZeroInteger,

    /// An integer does not fit the target width.
    #[error("integer of {len} bytes does not fit in {max} bytes")]
    IntegerOverflow {
        /// Encoded length.
        len: usize,
        /// Width of the target type.
        max: usize,
    },

    /// A record list had the wrong number of fields.
    #[error("{record}: expected {expected} fields, found {found}")]
    FieldCount {
        /// Record being decoded.
        record: &'static str,
        /// Accepted field count (lower bound for extensible records).
        expected: usize,
        /// Field count found.
        found: usize,
    },

    /// A fixed-width field had the wrong length.
    #[error("{field}: expected {expected} bytes, found {found}")]
    InvalidLength {
        /// Field name.
        field: &'static str,
        /// Required length.
        expected: usize,
        /// Length found.
        found: usize,
    },

    /// A field held a value outside its domain.
    #[error("{field}: invalid value: {reason}")]
    InvalidValue {
        /// Field name.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Failure parsing a hex-encoded digest, identity, or blob.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HexError {
    /// The input is not valid hex.
    #[error("invalid hex: {0}")]
    Invalid(String),

    /// The decoded value has the wrong width.
    #[error("expected {expected} bytes, found {found}")]
    Width {
        /// Required width.
        expected: usize,
        /// Width found.
        found: usize,
    },
}

impl From<hex::FromHexError> for HexError {
    fn from(e: hex::FromHexError) -> Self {
        Self::Invalid(e.to_string())
    }
}
