use crate::hex::HexError;

/// A result type defaulting to [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `uniqid` can emit.
///
/// Generation and encoding are infallible. Errors only surface while
/// configuring the server identifier, resolving the machine's address, or
/// decoding untrusted text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The server identifier was already assigned, either explicitly or by
    /// lazy derivation from the external address.
    #[error("server id already set (current: {current})")]
    ServerIdAlreadySet {
        /// The value that is already in effect.
        current: u16,
    },

    /// `0` is reserved as the "unset" sentinel and cannot be assigned.
    #[error("server id 0 is reserved")]
    ReservedServerId,

    /// The server identifier was set or read from inside the initializer that
    /// is deriving it.
    #[error("server id requested re-entrantly from its own initializer")]
    ReentrantInit,

    /// An address source was already installed for this process.
    #[error("address source already set")]
    AddressSourceAlreadySet,

    /// No outbound IPv4 address could be determined.
    #[error("cannot determine external ip: {reason}")]
    ExternalAddress {
        /// The last failure observed while probing.
        reason: String,
    },

    /// An address string could not be parsed.
    #[error("invalid address: {input}")]
    InvalidAddress {
        /// The offending input.
        input: String,
    },

    /// Hex text could not be decoded.
    #[error(transparent)]
    Hex(#[from] HexError),

    /// The initialization lock was poisoned by a panicking initializer.
    ///
    /// When the `parking-lot` feature is enabled, mutexes do **not** poison,
    /// so this variant is never constructed.
    #[error("lock poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
