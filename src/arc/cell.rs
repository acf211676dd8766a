//! `AtomicArcCell`: a shared cell holding one `ArcHandle`, readable and
//! writable atomically via a sentinel-protected double-word CAS.

use portable_atomic::AtomicU128;
use std::sync::atomic::Ordering;

use crate::arc::handle::ArcHandle;

#[cfg(not(target_pointer_width = "64"))]
compile_error!("AtomicArcCell packs (control, data) into a u128 and needs 64-bit pointers");

const fn pack(handle: ArcHandle) -> u128 {
    ((handle.control as u128) << 64) | (handle.data as u128)
}

const fn unpack(bits: u128) -> ArcHandle {
    ArcHandle { control: (bits >> 64) as usize, data: bits as usize }
}

/// A shared cell holding exactly one `ArcHandle` at a time, with atomic
/// [`AtomicArcCell::load`] and [`AtomicArcCell::store`].
///
/// Two states: `STEADY(handle)` (the handle currently visible to readers,
/// possibly null) and `LOCKED` (the sentinel `(1, 0)`). `atomic_begin`
/// drives `STEADY -> LOCKED`; `atomic_commit` drives `LOCKED -> STEADY`.
/// `LOCKED` is short-lived and is never observed by a caller as a real
/// handle — only as a CAS-expected failure that makes concurrent
/// `atomic_begin` callers retry.
pub struct AtomicArcCell {
    packed: AtomicU128,
}

impl AtomicArcCell {
    /// Build a cell initially holding `initial` (commonly `ArcHandle::NULL`).
    pub const fn new(initial: ArcHandle) -> Self {
        Self { packed: AtomicU128::new(pack(initial)) }
    }

    /// Spin on a double-word CAS that replaces the cell's current value
    /// with the sentinel, provided it isn't already the sentinel. On
    /// success, the caller has exclusive custody of the real handle that
    /// was in the cell, and the cell now displays the sentinel — blocking
    /// every other `begin` attempt until [`AtomicArcCell::commit`] runs.
    fn begin(&self) -> ArcHandle {
        loop {
            let current = self.packed.load(Ordering::Acquire);
            if current == pack(ArcHandle::SENTINEL) {
                std::hint::spin_loop();
                continue;
            }
            match self.packed.compare_exchange_weak(
                current,
                pack(ArcHandle::SENTINEL),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return unpack(current),
                Err(_) => std::hint::spin_loop(),
            }
        }
    }

    /// CAS the cell from the sentinel to `new`. Succeeds on the first try
    /// unless a caller violates the begin/commit protocol (e.g. re-enters
    /// `begin` from within a destructor running on this cell, which is a
    /// documented deadlock, not something this call can recover from).
    fn commit(&self, new: ArcHandle) {
        self.packed
            .compare_exchange(
                pack(ArcHandle::SENTINEL),
                pack(new),
                Ordering::Release,
                Ordering::Relaxed,
            )
            .expect("atomic_commit: cell was not holding the sentinel installed by atomic_begin");
    }

    /// Return an owned clone of whatever is stored in the cell. Net
    /// effect: one refcount increment, cell contents unchanged.
    pub fn load(&self) -> ArcHandle {
        let current = self.begin();
        let cloned = current.clone_handle();
        self.commit(current);
        cloned
    }

    /// Replace the cell's contents with an owned clone of `new`, dropping
    /// whatever was there before.
    ///
    /// Sequencing matches the source design exactly: clone `new` first,
    /// grab the old handle exclusively, decrement (not drop) the old
    /// handle's refcount, commit `new` into the cell, and only then — with
    /// the cell already showing the new value — finalize the old handle if
    /// its pre-decrement count was 1. An observer that began its own
    /// `load`/`store` before this `commit` never sees the new value; one
    /// that begins after always does. No observer ever sees the sentinel
    /// as a real handle.
    pub fn store(&self, new: ArcHandle) {
        let new_owned = new.clone_handle();
        let old = self.begin();
        let pre_count = old.decrement_refcount();
        self.commit(new_owned);
        if pre_count == 1 {
            old.finalize();
        }
    }
}
