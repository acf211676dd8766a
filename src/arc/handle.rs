//! `ArcHandle`: a two-word `(control, data)` pair representing one share of
//! ownership over a payload, ported from the NTARC header-only design.

use std::sync::atomic::Ordering;

use bytemuck::{Pod, Zeroable};

use crate::arc::control::ControlBlock;
use crate::error::{Result, RingArcError};
use crate::insights;

/// A naturally-aligned two-machine-word handle. `Copy`, not `Drop` —
/// because it must live unmodified inside an atomic cell, ownership is
/// tracked by convention (exactly one live `ArcHandle` value per refcount
/// unit) rather than enforced by the type system. Callers must call
/// [`ArcHandle::drop_handle`] exactly once per handle they hold.
///
/// Also `Pod`/`Zeroable` so the raw `(control, data)` image can be shared
/// across a compilation-unit boundary as plain bytes, per the External
/// Interfaces contract.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Pod, Zeroable)]
pub struct ArcHandle {
    pub(crate) control: usize,
    pub(crate) data: usize,
}

impl ArcHandle {
    /// The null handle: `(control=0, data=0)`. Clone/drop of a null handle
    /// is a no-op.
    pub const NULL: ArcHandle = ArcHandle { control: 0, data: 0 };

    /// The reserved in-flight marker `(control=1, data=0)`. Never returned
    /// to users; installing it in a cell is how [`super::AtomicArcCell`]
    /// implements its critical section.
    pub(crate) const SENTINEL: ArcHandle = ArcHandle { control: 1, data: 0 };

    /// Build a new handle owning `data`, with refcount 1.
    ///
    /// `destroy_fn` is invoked exactly once, when the last live handle to
    /// this payload is dropped, and is responsible for freeing the
    /// payload (via [`ArcHandle::data_ptr`]); this crate frees the control
    /// block afterward.
    pub fn new<T>(
        data: Box<T>,
        destroy_ctx: *mut (),
        destroy_fn: unsafe fn(*mut (), &ArcHandle),
    ) -> Result<Self> {
        let control = Box::new(ControlBlock {
            refcount: std::sync::atomic::AtomicIsize::new(1),
            destroy_ctx,
            destroy_fn,
        });
        let handle = ArcHandle {
            control: Box::into_raw(control) as usize,
            data: Box::into_raw(data) as usize,
        };
        if handle == ArcHandle::SENTINEL {
            return Err(RingArcError::SentinelCollision);
        }
        Ok(handle)
    }

    /// `true` iff this is the null handle.
    pub fn is_null(&self) -> bool {
        self.control == 0 && self.data == 0
    }

    /// `true` iff both handles' control-block pointers are identical,
    /// i.e. they refer to the same payload.
    pub fn is_same(&self, other: &ArcHandle) -> bool {
        self.control == other.control
    }

    /// Borrow the payload as `&T`. The caller must know the payload was
    /// actually constructed as `T` — this handle is otherwise untyped.
    ///
    /// # Safety
    /// `self` must be non-null and its payload must actually be a `T`.
    pub unsafe fn data<T>(&self) -> &T {
        &*(self.data as *const T)
    }

    /// The raw payload pointer, exposed so a caller-supplied `destroy_fn`
    /// can reconstitute and drop the `Box<T>` it originally passed to
    /// [`ArcHandle::new`]. The control block itself is freed by this crate
    /// after `destroy_fn` returns — `destroy_fn` only owns the payload.
    ///
    /// # Safety
    /// Must only be called on a handle passed into the `destroy_fn` this
    /// crate invokes, with the same `T` originally passed to `new`.
    pub unsafe fn data_ptr<T>(&self) -> *mut T {
        self.data as *mut T
    }

    fn control_block(&self) -> &ControlBlock {
        debug_assert!(!self.is_null());
        unsafe { &*(self.control as *const ControlBlock) }
    }

    /// Increment the refcount and return a new handle to the same payload.
    /// No-op (returns a copy) for the null handle.
    pub fn clone_handle(&self) -> ArcHandle {
        if self.is_null() {
            return *self;
        }
        self.control_block().refcount.fetch_add(1, Ordering::AcqRel);
        *self
    }

    /// Decrement the refcount without invoking the destructor, returning
    /// the pre-decrement count. Internal building block for
    /// [`ArcHandle::drop_handle`] and for `AtomicArcCell::store`, which
    /// needs to decouple the decrement from the finalize call so the
    /// destructor never runs while the cell is holding the sentinel.
    pub(crate) fn decrement_refcount(&self) -> isize {
        if self.is_null() {
            return 0;
        }
        self.control_block().refcount.fetch_sub(1, Ordering::Release)
    }

    /// Invoke the destructor unconditionally, then free the control block.
    /// Callers must only do this once, after observing a pre-decrement
    /// count of 1. No-op for the null handle. `destroy_fn` is responsible
    /// only for the payload it was constructed with — the control block's
    /// layout is private to this crate, so this crate frees it.
    pub(crate) fn finalize(&self) {
        if self.is_null() {
            return;
        }
        std::sync::atomic::fence(Ordering::Acquire);
        insights::record_arc_destroy();
        let (destroy_fn, destroy_ctx) = {
            let block = self.control_block();
            (block.destroy_fn, block.destroy_ctx)
        };
        unsafe {
            destroy_fn(destroy_ctx, self);
            drop(Box::from_raw(self.control as *mut ControlBlock));
        }
    }

    /// Decrement the refcount; if this was the last live handle, invoke
    /// `destroy_fn`. Returns the pre-decrement count — `1` means this call
    /// triggered the destructor. No-op (returns `0`) for the null handle.
    pub fn drop_handle(self) -> isize {
        let pre_count = self.decrement_refcount();
        if pre_count == 1 {
            self.finalize();
        }
        pre_count
    }
}
