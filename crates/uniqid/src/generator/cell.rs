use core::cell::Cell;

use portable_atomic::{AtomicU8, AtomicU16, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::{Error, Result},
    generator::{Mutex, const_mutex},
};

const UNINITIALIZED: u8 = 0;
const INITIALIZING: u8 = 1;
const READY: u8 = 2;

thread_local! {
    /// Address of the cell whose initializer is running on this thread.
    static RUNNING_INIT: Cell<usize> = const { Cell::new(0) };
}

/// Lifecycle of a [`ServerIdCell`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InitState {
    /// No server identifier has been assigned yet.
    Uninitialized,
    /// An initializer is currently deriving the server identifier.
    Initializing,
    /// The server identifier is fixed for the lifetime of the cell.
    Ready,
}

/// A write-once holder for a server identifier.
///
/// The cell moves through [`InitState::Uninitialized`] →
/// [`InitState::Initializing`] → [`InitState::Ready`]. Once ready, reads are
/// a single acquire load. The internal mutex is only taken while the cell is
/// not ready, so it serializes competing initializers and nothing else.
///
/// `0` is reserved as the "unset" sentinel and is never stored.
///
/// # Example
///
/// ```
/// use uniqid::{Error, InitState, ServerIdCell};
///
/// let cell = ServerIdCell::new();
/// assert_eq!(cell.state(), InitState::Uninitialized);
///
/// cell.set(77).unwrap();
/// assert_eq!(cell.get(), Some(77));
/// assert_eq!(cell.set(78), Err(Error::ServerIdAlreadySet { current: 77 }));
///
/// // Already ready: the initializer is never called.
/// assert_eq!(cell.get_or_try_init(|| unreachable!()), Ok(77));
/// ```
pub struct ServerIdCell {
    state: AtomicU8,
    value: AtomicU16,
    init: Mutex<()>,
}

impl ServerIdCell {
    /// Creates an empty cell.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(UNINITIALIZED),
            value: AtomicU16::new(0),
            init: const_mutex(()),
        }
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> InitState {
        match self.state.load(Ordering::Acquire) {
            READY => InitState::Ready,
            INITIALIZING => InitState::Initializing,
            _ => InitState::Uninitialized,
        }
    }

    /// Returns the server identifier if the cell is ready.
    #[inline]
    pub fn get(&self) -> Option<u16> {
        if self.state.load(Ordering::Acquire) == READY {
            Some(self.value.load(Ordering::Relaxed))
        } else {
            None
        }
    }

    /// Assigns the server identifier.
    ///
    /// # Errors
    ///
    /// - [`Error::ReservedServerId`] if `id` is `0`.
    /// - [`Error::ServerIdAlreadySet`] if the cell was already assigned,
    ///   explicitly or by [`Self::get_or_try_init`]. A concurrent initializer
    ///   is waited for first.
    /// - [`Error::ReentrantInit`] if called from inside this cell's own
    ///   initializer.
    /// - [`Error::LockPoisoned`] if an initializer panicked while holding the
    ///   lock (std mutex only).
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub fn set(&self, id: u16) -> Result<()> {
        if id == 0 {
            return Err(Error::ReservedServerId);
        }
        self.check_reentrant()?;
        let _guard = {
            #[cfg(feature = "parking-lot")]
            {
                self.init.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.init.lock()?
            }
        };
        if self.state.load(Ordering::Acquire) == READY {
            return Err(Error::ServerIdAlreadySet {
                current: self.value.load(Ordering::Relaxed),
            });
        }
        self.value.store(id, Ordering::Relaxed);
        self.state.store(READY, Ordering::Release);
        Ok(())
    }

    /// Returns the server identifier, running `init` to derive it if the
    /// cell is still empty.
    ///
    /// `init` runs at most once successfully across all threads. Concurrent
    /// first callers wait for the running initializer instead of deriving
    /// their own value. If `init` fails (or yields the reserved `0`), the cell
    /// returns to [`InitState::Uninitialized`] and the error is propagated.
    ///
    /// # Errors
    ///
    /// - Any error returned by `init`.
    /// - [`Error::ReservedServerId`] if `init` yields `0`.
    /// - [`Error::ReentrantInit`] if `init` itself calls back into this cell
    ///   while it is still empty. The outer call then fails too.
    /// - [`Error::LockPoisoned`] if a previous initializer panicked (std mutex
    ///   only).
    #[inline]
    pub fn get_or_try_init<F>(&self, init: F) -> Result<u16>
    where
        F: FnOnce() -> Result<u16>,
    {
        match self.get() {
            Some(id) => Ok(id),
            None => self.init_slow(init),
        }
    }

    #[cold]
    #[inline(never)]
    fn init_slow<F>(&self, init: F) -> Result<u16>
    where
        F: FnOnce() -> Result<u16>,
    {
        self.check_reentrant()?;
        let _guard = {
            #[cfg(feature = "parking-lot")]
            {
                self.init.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.init.lock()?
            }
        };
        // Another initializer may have finished while we waited.
        if let Some(id) = self.get() {
            return Ok(id);
        }

        self.state.store(INITIALIZING, Ordering::Release);
        let running = RunningInit::enter(self);
        let result = match init() {
            Ok(0) => Err(Error::ReservedServerId),
            other => other,
        };
        match result {
            Ok(id) => {
                self.value.store(id, Ordering::Relaxed);
                self.state.store(READY, Ordering::Release);
            }
            Err(_) => self.state.store(UNINITIALIZED, Ordering::Release),
        }
        drop(running);
        result
    }

    /// The init mutex is not reentrant, so a nested call from this thread's
    /// running initializer must bail out instead of waiting on itself.
    fn check_reentrant(&self) -> Result<()> {
        if RUNNING_INIT.with(Cell::get) == self.addr() {
            return Err(Error::ReentrantInit);
        }
        Ok(())
    }

    fn addr(&self) -> usize {
        core::ptr::from_ref(self) as usize
    }
}

impl Default for ServerIdCell {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for ServerIdCell {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ServerIdCell")
            .field("state", &self.state())
            .field("value", &self.get())
            .finish()
    }
}

/// Marks `cell` as initializing on this thread. On drop, restores the
/// previous marker and returns the state to `UNINITIALIZED` if the initializer
/// unwound.
struct RunningInit<'a> {
    cell: &'a ServerIdCell,
    previous: usize,
}

impl<'a> RunningInit<'a> {
    fn enter(cell: &'a ServerIdCell) -> Self {
        let previous = RUNNING_INIT.with(|running| running.replace(cell.addr()));
        Self { cell, previous }
    }
}

impl Drop for RunningInit<'_> {
    fn drop(&mut self) {
        RUNNING_INIT.with(|running| running.set(self.previous));
        let _ = self.cell.state.compare_exchange(
            INITIALIZING,
            UNINITIALIZED,
            Ordering::Release,
            Ordering::Relaxed,
        );
    }
}
