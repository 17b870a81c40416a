use crate::hex::HexError;

/// Number of hex characters in an encoded ID.
pub const HEX_LEN: usize = 16;

/// Number of leading hex characters that carry the server identifier.
pub const SERVER_ID_HEX_LEN: usize = 4;

const ALPHABET: &[u8; 16] = b"0123456789ABCDEF";
const NO_VALUE: u8 = 255;

/// Lookup table for hex decoding, accepting both cases.
const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0_u8;
    while i < 16 {
        let c = ALPHABET[i as usize];
        lut[c as usize] = i;
        if c.is_ascii_uppercase() {
            lut[(c + 32) as usize] = i; // lowercase letter
        }
        i += 1;
    }
    lut
};

#[inline(always)]
#[allow(clippy::inline_always)]
pub(crate) const fn nibble(b: u8) -> Option<u8> {
    match LOOKUP[b as usize] {
        NO_VALUE => None,
        val => Some(val),
    }
}

/// Encodes `id` as 16 uppercase hex characters into `buf`, most significant
/// byte first.
///
/// This is the zero-allocation primitive behind every other encoder.
///
/// ```
/// let mut buf = [0_u8; uniqid::HEX_LEN];
/// uniqid::encode_to_buf(0x004D_0000_0000_002A, &mut buf);
/// assert_eq!(&buf, b"004D00000000002A");
/// ```
#[inline]
pub fn encode_to_buf(id: u64, buf: &mut [u8; HEX_LEN]) {
    for (i, byte) in id.to_be_bytes().into_iter().enumerate() {
        buf[i * 2] = ALPHABET[usize::from(byte >> 4)];
        buf[i * 2 + 1] = ALPHABET[usize::from(byte & 0x0F)];
    }
}

/// Appends exactly 16 hex characters for `id` to `dst`.
///
/// `dst` is never cleared. Reusing a buffer with spare capacity makes this
/// allocation-free.
///
/// ```
/// let mut dst = b"id=".to_vec();
/// uniqid::append_hex(u64::MAX, &mut dst);
/// assert_eq!(dst, b"id=FFFFFFFFFFFFFFFF");
/// ```
#[inline]
pub fn append_hex(id: u64, dst: &mut Vec<u8>) {
    let mut buf = [0_u8; HEX_LEN];
    encode_to_buf(id, &mut buf);
    dst.extend_from_slice(&buf);
}

/// Decodes a full 16-character hex representation into its raw `u64`.
///
/// # Errors
///
/// - [`HexError::InvalidLength`] unless `hex` is exactly [`HEX_LEN`] bytes.
/// - [`HexError::InvalidByte`] for the first byte outside `[0-9a-fA-F]`.
pub fn decode_hex(hex: &[u8]) -> Result<u64, HexError> {
    if hex.len() != HEX_LEN {
        return Err(HexError::InvalidLength { len: hex.len() });
    }
    let mut acc = 0_u64;
    for (index, &byte) in hex.iter().enumerate() {
        let Some(val) = nibble(byte) else {
            return Err(HexError::InvalidByte { byte, index });
        };
        acc = (acc << 4) | u64::from(val);
    }
    Ok(acc)
}

/// Extracts the server identifier from the hex form of an ID.
///
/// Only the first [`SERVER_ID_HEX_LEN`] characters are parsed and validated,
/// but the input must be at least [`HEX_LEN`] bytes long: anything shorter is
/// not a complete ID. Returns `None` when either check fails, so a legitimate
/// server ID of `0` is distinguishable from a decode failure.
///
/// ```
/// assert_eq!(uniqid::decode_server_id(b"004D00000000002A"), Some(77));
/// assert_eq!(uniqid::decode_server_id(b"004d"), None);
/// assert_eq!(uniqid::decode_server_id(b"zzzz000000000000"), None);
/// ```
#[must_use]
pub fn decode_server_id(hex: &[u8]) -> Option<u16> {
    if hex.len() < HEX_LEN {
        return None;
    }
    let mut acc = 0_u16;
    for &byte in &hex[..SERVER_ID_HEX_LEN] {
        acc = (acc << 4) | u16::from(nibble(byte)?);
    }
    Some(acc)
}

/// Like [`decode_server_id`], but returns `0` on any failure.
///
/// Decode failures are silent: callers cannot tell a server ID of `0` apart
/// from malformed input. Prefer [`decode_server_id`] in new code.
#[must_use]
pub fn server_id_or_zero(hex: &[u8]) -> u16 {
    decode_server_id(hex).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(id: u64) -> Vec<u8> {
        let mut dst = Vec::new();
        append_hex(id, &mut dst);
        dst
    }

    #[test]
    fn encode_boundaries() {
        assert_eq!(encode(0), b"0000000000000000");
        assert_eq!(encode(u64::MAX), b"FFFFFFFFFFFFFFFF");
        assert_eq!(encode(0x0123_4567_89AB_CDEF), b"0123456789ABCDEF");
    }

    #[test]
    fn append_preserves_existing_bytes() {
        let mut dst = Vec::with_capacity(64);
        append_hex(1, &mut dst);
        append_hex(2, &mut dst);
        assert_eq!(dst.len(), 2 * HEX_LEN);
        assert_eq!(&dst[..HEX_LEN], b"0000000000000001");
        assert_eq!(&dst[HEX_LEN..], b"0000000000000002");
    }

    #[test]
    fn append_does_not_reallocate_with_spare_capacity() {
        let mut dst = Vec::with_capacity(HEX_LEN);
        let ptr = dst.as_ptr();
        append_hex(0xFEED, &mut dst);
        assert_eq!(dst.as_ptr(), ptr);
    }

    #[test]
    fn encode_is_deterministic() {
        let v = 0xA5A5_5A5A_0F0F_F0F0;
        assert_eq!(encode(v), encode(v));
    }

    #[test]
    fn server_id_matches_top_bits() {
        for v in [
            0,
            1,
            u64::MAX,
            0x004D_0000_0000_0001,
            0xFFFF_0000_0000_0000,
            0x0001_FFFF_FFFF_FFFF,
            0x8000_0000_0000_0000,
            0x1234_5678_9ABC_DEF0,
        ] {
            assert_eq!(decode_server_id(&encode(v)), Some((v >> 48) as u16), "{v:#x}");
        }
    }

    #[test]
    fn server_id_accepts_either_case() {
        assert_eq!(decode_server_id(b"ABCD000000000000"), Some(0xABCD));
        assert_eq!(decode_server_id(b"abcd000000000000"), Some(0xABCD));
        assert_eq!(decode_server_id(b"aBcD000000000000"), Some(0xABCD));
    }

    #[test]
    fn server_id_ignores_the_sequence_field() {
        assert_eq!(decode_server_id(b"004Dzzzzzzzzzzzz"), Some(77));
    }

    #[test]
    fn server_id_rejects_short_input() {
        assert_eq!(decode_server_id(b""), None);
        assert_eq!(decode_server_id(b"004"), None);
        assert_eq!(decode_server_id(b"004D"), None);
        assert_eq!(decode_server_id(b"004D00000000002"), None);
        assert_eq!(server_id_or_zero(b"004"), 0);
    }

    #[test]
    fn server_id_rejects_non_hex_prefix() {
        assert_eq!(decode_server_id(b"zzzz000000000000"), None);
        assert_eq!(decode_server_id(b"004G000000000000"), None);
        assert_eq!(decode_server_id(b" 04D000000000000"), None);
        assert_eq!(server_id_or_zero(b"zzzz000000000000"), 0);
    }

    #[test]
    fn server_id_or_zero_passes_valid_ids_through() {
        assert_eq!(server_id_or_zero(b"004D00000000002A"), 77);
    }

    #[test]
    fn decode_inverts_encode() {
        let v = 0x004D_0000_DEAD_BEEF;
        assert_eq!(decode_hex(&encode(v)), Ok(v));
        assert_eq!(decode_hex(b"004d0000deadbeef"), Ok(v));
    }

    #[test]
    fn decode_reports_first_bad_byte() {
        assert_eq!(
            decode_hex(b"00000000000000x0"),
            Err(HexError::InvalidByte {
                byte: b'x',
                index: 14
            })
        );
    }

    #[test]
    fn decode_requires_exact_length() {
        assert_eq!(
            decode_hex(b"000000000000000"),
            Err(HexError::InvalidLength { len: 15 })
        );
        assert_eq!(
            decode_hex(b"00000000000000000"),
            Err(HexError::InvalidLength { len: 17 })
        );
    }
}
