#[cfg(feature = "parking-lot")]
pub use parking_lot::Mutex;
#[cfg(not(feature = "parking-lot"))]
pub use std::sync::{Mutex, MutexGuard, PoisonError};

/// Builds an unlocked mutex in a `const` context.
pub const fn const_mutex<T>(val: T) -> Mutex<T> {
    #[cfg(feature = "parking-lot")]
    {
        parking_lot::const_mutex(val)
    }
    #[cfg(not(feature = "parking-lot"))]
    {
        Mutex::new(val)
    }
}
