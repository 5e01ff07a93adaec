//! Nibble paths and the hex-prefix (compact) path encoding.
//!
//! Leaf and extension nodes store a partial path of 4-bit nibbles. On the
//! wire the path is packed two nibbles per byte, with the high nibble of the
//! first byte carrying two flags:
//!
//! ```text
//! flag  node       parity   first byte
//!  0    extension  even     0x00, then path bytes
//!  1    extension  odd      0x1n, n = first nibble
//!  2    leaf       even     0x20, then path bytes
//!  3    leaf       odd      0x3n, n = first nibble
//! ```

/// Expand bytes into nibbles, high nibble first.
pub fn to_nibbles(key: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(key.len() * 2);
    for b in key {
        out.push(b >> 4);
        out.push(b & 0x0f);
    }
    out
}

/// Length of the shared prefix of two nibble paths.
pub fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

/// Pack a nibble path with its leaf/extension flag.
pub fn hex_prefix_encode(nibbles: &[u8], is_leaf: bool) -> Vec<u8> {
    let odd = nibbles.len() % 2 == 1;
    let flag = (u8::from(is_leaf) << 1) | u8::from(odd);
    let mut out = Vec::with_capacity(nibbles.len() / 2 + 1);
    let rest = if odd {
        out.push((flag << 4) | nibbles[0]);
        &nibbles[1..]
    } else {
        out.push(flag << 4);
        nibbles
    };
    for pair in rest.chunks(2) {
        out.push((pair[0] << 4) | pair[1]);
    }
    out
}

/// Unpack a hex-prefix path into `(nibbles, is_leaf)`.
///
/// Returns `None` for an empty input, an unknown flag, or a non-zero pad
/// nibble on an even-length path.
pub fn hex_prefix_decode(packed: &[u8]) -> Option<(Vec<u8>, bool)> {
    let first = *packed.first()?;
    let flag = first >> 4;
    if flag > 3 {
        return None;
    }
    let is_leaf = flag & 2 != 0;
    let odd = flag & 1 != 0;
    let mut nibbles = Vec::with_capacity(packed.len() * 2);
    if odd {
        nibbles.push(first & 0x0f);
    } else if first & 0x0f != 0 {
        return None;
    }
    nibbles.extend(to_nibbles(&packed[1..]));
    Some((nibbles, is_leaf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_nibbles() {
        assert_eq!(to_nibbles(&[0x12, 0xab]), vec![1, 2, 0xa, 0xb]);
        assert!(to_nibbles(&[]).is_empty());
    }

    #[test]
    fn test_hex_prefix_vectors() {
        assert_eq!(hex_prefix_encode(&[1, 2, 3, 4, 5], false), vec![0x11, 0x23, 0x45]);
        assert_eq!(hex_prefix_encode(&[0, 1, 2, 3, 4, 5], false), vec![0x00, 0x01, 0x23, 0x45]);
        assert_eq!(hex_prefix_encode(&[0xf, 1, 0xc, 0xb, 8], true), vec![0x3f, 0x1c, 0xb8]);
        assert_eq!(hex_prefix_encode(&[0, 0xf, 1, 0xc, 0xb, 8], true), vec![0x20, 0x0f, 0x1c, 0xb8]);
        assert_eq!(hex_prefix_encode(&[], true), vec![0x20]);
    }

    #[test]
    fn test_hex_prefix_decode_inverts() {
        for (path, leaf) in [
            (vec![1, 2, 3], true),
            (vec![1, 2, 3, 4], false),
            (vec![], false),
            (vec![0xf], true),
        ] {
            let packed = hex_prefix_encode(&path, leaf);
            assert_eq!(hex_prefix_decode(&packed), Some((path, leaf)));
        }
    }

    #[test]
    fn test_hex_prefix_decode_rejects_bad_flags() {
        assert_eq!(hex_prefix_decode(&[]), None);
        assert_eq!(hex_prefix_decode(&[0x40]), None);
        assert_eq!(hex_prefix_decode(&[0x21]), None);
    }

    #[test]
    fn test_common_prefix() {
        assert_eq!(common_prefix_len(&[1, 2, 3], &[1, 2, 4]), 2);
        assert_eq!(common_prefix_len(&[1], &[]), 0);
    }
}
