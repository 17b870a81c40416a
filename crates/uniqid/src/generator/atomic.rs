use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{id::UniqId, time::TimeSource};

/// A lock-free [`UniqId`] generator suitable for multi-threaded environments.
///
/// The whole mutable state is one [`AtomicU64`] counter. Every call to
/// [`Self::next_id`] performs a single `fetch_add`, so concurrent callers never
/// observe the same post-increment value and never block each other.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Wait-free, allocation-free hot path
/// - ❌ Uniqueness across instances sharing a server ID
///
/// ## Caveats
/// The counter is 64 bits wide but only its low 48 bits reach the ID. Once
/// `2^48` IDs have been issued past a given low-48-bit value, that value is
/// issued again. Two generators (or two processes) sharing a server ID may
/// collide unless their counter ranges are kept apart.
///
/// ## Recommended When
/// - You need a very high issue rate from many threads
/// - Rough, restart-spanning order is enough (the counter is seeded from
///   wall-clock nanoseconds)
pub struct AtomicUniqIdGenerator {
    #[cfg(feature = "cache-padded")]
    counter: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    counter: AtomicU64,
    server_id: u16,
}

impl AtomicUniqIdGenerator {
    /// Creates a generator for `server_id`, seeding the counter from `time`.
    ///
    /// # Example
    /// ```
    /// use uniqid::{AtomicUniqIdGenerator, SystemClock};
    ///
    /// let generator = AtomicUniqIdGenerator::new(77, &SystemClock);
    /// let a = generator.next_id();
    /// let b = generator.next_id();
    /// assert_eq!(a.server_id(), 77);
    /// assert_eq!(b.sequence(), a.next_sequence().sequence());
    /// ```
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(server_id = server_id))
    )]
    pub fn new(server_id: u16, time: &impl TimeSource) -> Self {
        Self::from_components(server_id, time.current_nanos())
    }

    /// Creates a generator whose counter starts at `counter`.
    ///
    /// The first ID carries sequence `counter + 1` (mod `2^48`). Useful for
    /// restoring a previously persisted [`Self::counter`] or for tests.
    pub fn from_components(server_id: u16, counter: u64) -> Self {
        Self {
            #[cfg(feature = "cache-padded")]
            counter: crossbeam_utils::CachePadded::new(AtomicU64::new(counter)),
            #[cfg(not(feature = "cache-padded"))]
            counter: AtomicU64::new(counter),
            server_id,
        }
    }

    /// Generates the next ID.
    ///
    /// Increments the counter by exactly one and packs the low 48 bits of the
    /// post-increment value under the server identifier.
    #[inline]
    pub fn next_id(&self) -> UniqId {
        let counter = self.counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        UniqId::from_components(self.server_id, counter)
    }

    /// The server identifier embedded in every ID.
    pub fn server_id(&self) -> u16 {
        self.server_id
    }

    /// The full 64-bit counter value last issued.
    pub fn counter(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

impl core::fmt::Debug for AtomicUniqIdGenerator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AtomicUniqIdGenerator")
            .field("server_id", &self.server_id)
            .field("counter", &self.counter())
            .finish()
    }
}
