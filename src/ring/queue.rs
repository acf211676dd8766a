//! Shared control state and storage slab for the MPMC ring buffer.

use std::cell::UnsafeCell;
use std::sync::atomic::AtomicI64;

use crate::error::{Result, RingArcError};
use crate::ring::Cursor;

/// A lock-free MPMC ring buffer over an externally-owned, fixed-size slab.
///
/// `RingQueue` owns only the four watermarks (`next_write`, `last_write`,
/// `next_read`, `last_read`) and the slab; reservation and commit sequencing
/// live on [`Cursor`]. The core never allocates or frees the slab and never
/// inspects the payload type beyond mapping `sequence mod capacity` to a
/// slot index.
pub struct RingQueue<T> {
    pub(crate) slab: Box<[UnsafeCell<T>]>,
    pub(crate) mask: usize,
    pub(crate) capacity: i64,
    pub(crate) next_write: AtomicI64,
    pub(crate) last_write: AtomicI64,
    pub(crate) next_read: AtomicI64,
    pub(crate) last_read: AtomicI64,
}

// SAFETY: all shared mutation of `slab` goes through the claim/commit
// protocol on `Cursor`, which guarantees at most one writer and at most one
// reader hold a given slot at a time.
unsafe impl<T: Send> Send for RingQueue<T> {}
unsafe impl<T: Send> Sync for RingQueue<T> {}

impl<T> RingQueue<T> {
    /// Build a queue over a caller-supplied slab. `slab.len()` must be a
    /// power of two (so slot indexing can use a bit-mask, not a modulo).
    pub fn new(slab: Box<[UnsafeCell<T>]>) -> Result<Self> {
        let capacity = slab.len();
        if capacity == 0 || !capacity.is_power_of_two() {
            return Err(RingArcError::invalid_capacity(format!(
                "capacity must be a power of two >= 1, got {capacity}"
            )));
        }

        Ok(Self {
            mask: capacity - 1,
            capacity: capacity as i64,
            slab,
            next_write: AtomicI64::new(-1),
            last_write: AtomicI64::new(-1),
            next_read: AtomicI64::new(-1),
            last_read: AtomicI64::new(-1),
        })
    }

    /// Capacity this queue was constructed with.
    pub fn capacity(&self) -> usize {
        self.slab.len()
    }

    /// Bind a fresh [`Cursor`] to this queue. A cursor must not be shared
    /// across threads — it is `!Sync` so the type system enforces this.
    pub fn cursor(&self) -> Cursor<'_, T> {
        Cursor::new(self)
    }

    /// Write the payload into slot `idx`.
    ///
    /// # Safety
    /// The caller must have reserved `idx` via `begin_write`/`poll_begin_write`
    /// on a cursor bound to this queue and not yet have committed it.
    pub unsafe fn write(&self, idx: usize, value: T) {
        std::ptr::write_volatile(self.slab[idx].get(), value);
    }

    /// Read the payload out of slot `idx`.
    ///
    /// # Safety
    /// The caller must have reserved `idx` via `begin_read`/`poll_begin_read`
    /// on a cursor bound to this queue, and the sequence backing `idx` must
    /// already be visible in `last_write` (the `begin_read` wait/poll
    /// enforces this).
    pub unsafe fn read(&self, idx: usize) -> T {
        std::ptr::read_volatile(self.slab[idx].get())
    }
}

impl<T: Default> RingQueue<T> {
    /// Convenience constructor that allocates a zero/default-filled slab,
    /// for callers who don't need to supply their own storage.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let slab: Box<[UnsafeCell<T>]> = (0..capacity)
            .map(|_| UnsafeCell::new(T::default()))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self::new(slab)
    }
}
