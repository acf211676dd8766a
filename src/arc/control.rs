//! Per-payload control block: refcount plus destructor linkage.

use std::sync::atomic::AtomicIsize;

use crate::arc::handle::ArcHandle;

/// Heap-allocated once per payload by [`ArcHandle::new`]; freed by
/// [`ArcHandle::finalize`](crate::arc::handle::ArcHandle) after the
/// caller's `destroy_fn` returns.
pub(crate) struct ControlBlock {
    pub(crate) refcount: AtomicIsize,
    pub(crate) destroy_ctx: *mut (),
    pub(crate) destroy_fn: unsafe fn(*mut (), &ArcHandle),
}
