use core::{fmt, str::FromStr};

use crate::{Error, hex};

/// A packed 64-bit identifier: a 16-bit server ID over a 48-bit sequence.
///
/// ## Bit layout
///
/// The ID is packed from **MSB to LSB**:
///
/// ```text
///  Bit Index:  63           48 47                                0
///              +--------------+-----------------------------------+
///  Field:      | server (16)  |          sequence (48)            |
///              +--------------+-----------------------------------+
///              |<----- MSB ------- 64 bits ------- LSB ---------->|
/// ```
///
/// Ordering follows the raw integer, so IDs from the same server sort by
/// sequence until the sequence wraps around.
///
/// # Example
///
/// ```
/// use uniqid::UniqId;
///
/// let id = UniqId::from_components(77, 42);
/// assert_eq!(id.server_id(), 77);
/// assert_eq!(id.sequence(), 42);
/// assert_eq!(id.to_string(), "004D00000000002A");
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct UniqId {
    id: u64,
}

impl UniqId {
    /// Number of bits used by the server identifier.
    pub const SERVER_ID_BITS: u32 = 16;

    /// Number of bits used by the sequence.
    pub const SEQUENCE_BITS: u32 = 48;

    /// Position of the lowest server identifier bit.
    pub const SERVER_ID_SHIFT: u32 = Self::SEQUENCE_BITS;

    /// Mask selecting the sequence bits.
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Packs a server identifier and a sequence into an ID.
    ///
    /// Sequence bits above bit 47 are discarded, which is exactly how a
    /// wrapping counter is folded into the sequence field.
    #[must_use]
    pub const fn from_components(server_id: u16, sequence: u64) -> Self {
        Self {
            id: ((server_id as u64) << Self::SERVER_ID_SHIFT) | (sequence & Self::SEQUENCE_MASK),
        }
    }

    /// Wraps a raw `u64` without modification.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns the raw `u64`.
    #[must_use]
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Extracts the server identifier (bits 63-48).
    #[must_use]
    pub const fn server_id(&self) -> u16 {
        (self.id >> Self::SERVER_ID_SHIFT) as u16
    }

    /// Extracts the sequence (bits 47-0).
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.id & Self::SEQUENCE_MASK
    }

    /// Returns the maximum representable sequence, `2^48 - 1`.
    #[must_use]
    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Returns the ID that follows this one on the same server.
    ///
    /// The sequence wraps to `0` after [`Self::max_sequence`]; the server
    /// identifier never changes.
    #[must_use]
    pub const fn next_sequence(&self) -> Self {
        Self::from_components(self.server_id(), self.sequence().wrapping_add(1))
    }

    /// Encodes this ID as a 16-character uppercase hex [`String`].
    #[must_use]
    pub fn encode(&self) -> String {
        let mut buf = [0_u8; hex::HEX_LEN];
        self.encode_to_buf(&mut buf);
        buf.iter().copied().map(char::from).collect()
    }

    /// Encodes this ID into a stack buffer without heap allocation.
    ///
    /// ```
    /// use uniqid::{HEX_LEN, UniqId};
    ///
    /// let mut buf = [0_u8; HEX_LEN];
    /// UniqId::from_raw(u64::MAX).encode_to_buf(&mut buf);
    /// assert_eq!(&buf, b"FFFFFFFFFFFFFFFF");
    /// ```
    pub fn encode_to_buf(&self, buf: &mut [u8; hex::HEX_LEN]) {
        hex::encode_to_buf(self.id, buf);
    }

    /// Decodes a full 16-character hex string back into an ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Hex`] if the input is not exactly 16 hex characters.
    pub fn decode(s: &str) -> Result<Self, Error> {
        Ok(Self::from_raw(hex::decode_hex(s.as_bytes())?))
    }
}

const _: () = assert!(UniqId::SERVER_ID_BITS + UniqId::SEQUENCE_BITS == u64::BITS);

impl From<u64> for UniqId {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<UniqId> for u64 {
    fn from(id: UniqId) -> Self {
        id.to_raw()
    }
}

impl fmt::Display for UniqId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0_u8; hex::HEX_LEN];
        self.encode_to_buf(&mut buf);
        for &b in &buf {
            fmt::Write::write_char(f, char::from(b))?;
        }
        Ok(())
    }
}

impl fmt::Debug for UniqId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniqId")
            .field("id", &format_args!("{self}"))
            .field("server_id", &self.server_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

impl FromStr for UniqId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HexError;

    #[test]
    fn components_occupy_their_own_bits() {
        let id = UniqId::from_components(0xABCD, 0x1234_5678_9ABC);
        assert_eq!(id.to_raw(), 0xABCD_1234_5678_9ABC);
        assert_eq!(id.server_id(), 0xABCD);
        assert_eq!(id.sequence(), 0x1234_5678_9ABC);
    }

    #[test]
    fn sequence_is_truncated_to_48_bits() {
        let id = UniqId::from_components(1, u64::MAX);
        assert_eq!(id.server_id(), 1);
        assert_eq!(id.sequence(), UniqId::max_sequence());

        let id = UniqId::from_components(1, 1 << 48);
        assert_eq!(id.server_id(), 1);
        assert_eq!(id.sequence(), 0);
    }

    #[test]
    fn next_sequence_wraps_without_touching_server_id() {
        let id = UniqId::from_components(7, UniqId::max_sequence());
        let next = id.next_sequence();
        assert_eq!(next.server_id(), 7);
        assert_eq!(next.sequence(), 0);

        let id = UniqId::from_components(7, 9);
        assert_eq!(id.next_sequence().sequence(), 10);
    }

    #[test]
    fn ordering_follows_raw_value() {
        let a = UniqId::from_components(1, 5);
        let b = UniqId::from_components(1, 6);
        let c = UniqId::from_components(2, 0);
        assert!(a < b && b < c);
    }

    #[test]
    fn display_and_parse_agree() {
        let id = UniqId::from_components(77, 0xDEAD_BEEF);
        let s = id.to_string();
        assert_eq!(s, "004D0000DEADBEEF");
        assert_eq!(s, id.encode());
        assert_eq!(s.parse::<UniqId>().unwrap(), id);
        assert_eq!("004d0000deadbeef".parse::<UniqId>().unwrap(), id);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(
            "004D".parse::<UniqId>(),
            Err(Error::Hex(HexError::InvalidLength { len: 4 }))
        );
        assert_eq!(
            "004D0000DEADBEEG".parse::<UniqId>(),
            Err(Error::Hex(HexError::InvalidByte {
                byte: b'G',
                index: 15
            }))
        );
    }

    #[test]
    fn debug_shows_fields() {
        let id = UniqId::from_components(3, 4);
        let dbg = format!("{id:?}");
        assert!(dbg.contains("server_id: 3"));
        assert!(dbg.contains("sequence: 4"));
        assert!(dbg.contains("0003000000000004"));
    }
}
