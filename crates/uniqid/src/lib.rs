//! # uniqid
//!
//! Compact, sortable, 64-bit unique identifiers for high-throughput services.
//!
//! Every [`UniqId`] packs a 16-bit server identifier and a 48-bit sequence
//! into a single `u64`:
//!
//! ```text
//!  Bit Index:  63           48 47                                0
//!              +--------------+-----------------------------------+
//!  Field:      | server (16)  |          sequence (48)            |
//!              +--------------+-----------------------------------+
//! ```
//!
//! IDs are rendered as exactly 16 hex characters, and the server identifier can
//! be recovered from the first 4 characters without decoding the rest.
//!
//! ## Owned generators
//!
//! ```
//! use uniqid::{AtomicUniqIdGenerator, decode_server_id};
//!
//! let generator = AtomicUniqIdGenerator::from_components(77, 0);
//! let id = generator.next_id();
//! assert_eq!(id.server_id(), 77);
//! assert_eq!(id.sequence(), 1);
//!
//! let mut buf = Vec::with_capacity(16);
//! uniqid::append_hex(id.to_raw(), &mut buf);
//! assert_eq!(decode_server_id(&buf), Some(77));
//! ```
//!
//! ## Process-wide facade
//!
//! [`get`], [`append`] and [`set_server_id`] operate on a lazily created,
//! process-wide generator. When no server identifier is set explicitly, the
//! first call derives one from the last two octets of the machine's outbound
//! IPv4 address.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod generator;
mod global;
mod hex;
mod id;
mod net;
#[cfg(feature = "serde")]
mod serde;
mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::global::*;
pub use crate::hex::*;
pub use crate::id::*;
pub use crate::net::*;
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::time::*;
