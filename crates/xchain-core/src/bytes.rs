//! # Opaque Byte Blobs and Hex Conventions
//!
//! Origin-ledger tooling exchanges every binary value as a `0x`-prefixed,
//! lowercase hex string. [`Bytes`] is the variable-width blob type; the
//! fixed-width types ([`H256`](crate::H256), [`Address`](crate::Address))
//! share the same text form through [`impl_fixed_bytes!`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::HexError;

/// Strip an optional `0x`/`0X` prefix.
pub fn strip_0x(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Decode a hex string (optional `0x` prefix, odd length left-padded).
pub fn decode_hex(s: &str) -> Result<Vec<u8>, HexError> {
    let s = strip_0x(s);
    if s.len() % 2 == 1 {
        return Ok(hex::decode(format!("0{s}"))?);
    }
    Ok(hex::decode(s)?)
}

/// Encode bytes as `0x`-prefixed lowercase hex.
pub fn encode_hex(b: &[u8]) -> String {
    format!("0x{}", hex::encode(b))
}

/// A variable-length opaque byte blob (transaction payloads, extra data,
/// log data, bloom filters).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    /// Create an empty blob.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Parse from hex.
    pub fn from_hex(s: &str) -> Result<Self, HexError> {
        decode_hex(s).map(Self)
    }

    /// Render as `0x`-prefixed hex.
    pub fn to_hex(&self) -> String {
        encode_hex(&self.0)
    }

    /// Access the raw bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Consume into the inner vector.
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    /// Number of bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the blob is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(v: Vec<u8>) -> Self {
        Self(v)
    }
}

impl From<&[u8]> for Bytes {
    fn from(v: &[u8]) -> Self {
        Self(v.to_vec())
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Display for Bytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Bytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for integer "quantities": written as minimal `0x` hex
/// strings, read from either a hex string or a JSON number.
pub mod quantity {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Number(u64),
    }

    /// Serialize as `0x`-prefixed minimal hex.
    pub fn serialize<S, T>(v: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Copy + Into<u128>,
    {
        serializer.serialize_str(&format!("{:#x}", (*v).into()))
    }

    /// Deserialize from a hex string, a decimal string, or a number.
    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<u128>,
    {
        let wide = match Repr::deserialize(deserializer)? {
            Repr::Number(n) => u128::from(n),
            Repr::Text(s) => {
                let t = s.trim();
                let parsed = match t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
                    Some("") => Ok(0),
                    Some(h) => u128::from_str_radix(h, 16),
                    None => t.parse::<u128>(),
                };
                parsed.map_err(serde::de::Error::custom)?
            }
        };
        T::try_from(wide).map_err(|_| serde::de::Error::custom("quantity out of range"))
    }
}

/// [`quantity`] for optional fields.
pub mod quantity_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    struct Wrap<T: TryFrom<u128>>(#[serde(with = "super::quantity")] T);

    /// Serialize `Some` as a quantity and `None` as null.
    pub fn serialize<S, T>(v: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Copy + Into<u128>,
    {
        match v {
            Some(n) => super::quantity::serialize(n, serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize null or a quantity.
    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<u128>,
    {
        Ok(Option::<Wrap<T>>::deserialize(deserializer)?.map(|w| w.0))
    }
}

/// Implement hex parsing/rendering, `Display`, serde, and conversions for a
/// fixed-width byte newtype `$name([u8; $len])`.
#[macro_export]
macro_rules! impl_fixed_bytes {
    ($name:ident, $len:expr) => {
        impl $name {
            /// Width in bytes.
            pub const LEN: usize = $len;

            /// The all-zero value.
            pub const ZERO: Self = Self([0u8; $len]);

            /// Construct from a slice of exactly the right width.
            pub fn from_slice(b: &[u8]) -> Result<Self, $crate::error::HexError> {
                if b.len() != $len {
                    return Err($crate::error::HexError::Width {
                        expected: $len,
                        found: b.len(),
                    });
                }
                let mut out = [0u8; $len];
                out.copy_from_slice(b);
                Ok(Self(out))
            }

            /// Parse from hex (optional `0x` prefix).
            pub fn from_hex(s: &str) -> Result<Self, $crate::error::HexError> {
                let raw = $crate::bytes::decode_hex(s)?;
                Self::from_slice(&raw)
            }

            /// Render as `0x`-prefixed lowercase hex.
            pub fn to_hex(&self) -> String {
                $crate::bytes::encode_hex(&self.0)
            }

            /// Access the raw bytes.
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// True if every byte is zero.
            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|b| *b == 0)
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(b: [u8; $len]) -> Self {
                Self(b)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::HexError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}
