//! Serde support for [`UniqId`](crate::UniqId).
//!
//! By default a [`UniqId`](crate::UniqId) serializes as its 16-character hex
//! string. Use [`as_native`] with `#[serde(with = "...")]` to store the raw
//! `u64` instead, or [`as_hex`] to be explicit.

use ::serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::UniqId;

/// (De)serialize a [`UniqId`] as its raw `u64`.
pub mod as_native {
    use super::{Deserialize, Deserializer, Serialize, Serializer};
    use crate::UniqId;

    /// Serialize an ID as its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &UniqId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        id.to_raw().serialize(s)
    }

    /// Deserialize an ID from its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails.
    pub fn deserialize<'de, D>(d: D) -> Result<UniqId, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(d).map(UniqId::from_raw)
    }
}

/// (De)serialize a [`UniqId`] as a 16-character hex string.
pub mod as_hex {
    use super::{Deserialize, Deserializer, Serializer};
    use crate::{HEX_LEN, UniqId};

    /// Serialize an ID as uppercase hex.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &UniqId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut buf = [0_u8; HEX_LEN];
        id.encode_to_buf(&mut buf);
        let encoded = core::str::from_utf8(&buf).map_err(serde::ser::Error::custom)?;
        s.serialize_str(encoded)
    }

    /// Deserialize an ID from hex of either case.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The string is not exactly 16 hex characters
    pub fn deserialize<'de, D>(d: D) -> Result<UniqId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        UniqId::decode(&s).map_err(serde::de::Error::custom)
    }
}

impl Serialize for UniqId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        as_hex::serialize(self, s)
    }
}

impl<'de> Deserialize<'de> for UniqId {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        as_hex::deserialize(d)
    }
}

#[cfg(test)]
mod tests {
    use ::serde::{Deserialize, Serialize};

    use crate::UniqId;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Row {
        id: UniqId,
        #[serde(with = "crate::as_native")]
        raw: UniqId,
    }

    #[test]
    fn row_serializes_hex_and_native() {
        let row = Row {
            id: UniqId::from_components(77, 42),
            raw: UniqId::from_components(1, 2),
        };
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(
            json,
            format!(r#"{{"id":"004D00000000002A","raw":{}}}"#, (1_u64 << 48) | 2)
        );
        let back: Row = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn hex_accepts_lowercase() {
        let id: UniqId = serde_json::from_str(r#""004d00000000002a""#).unwrap();
        assert_eq!(id, UniqId::from_components(77, 42));
    }

    #[test]
    fn hex_rejects_malformed_strings() {
        assert!(serde_json::from_str::<UniqId>(r#""004D""#).is_err());
        assert!(serde_json::from_str::<UniqId>(r#""zz4D00000000002A""#).is_err());
        assert!(serde_json::from_str::<UniqId>("42").is_err());
    }
}
