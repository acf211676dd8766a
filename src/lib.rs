//! Two independent lock-free primitives for systems code that cannot block
//! — including kernel-mode drivers, where locks and waits on kernel
//! primitives are forbidden.
//!
//! - [`ring`] — [`ring::RingQueue`], a lock-free MPMC ring buffer over an
//!   externally-supplied storage slab, with a blocking (spin-until-ready)
//!   API and a polling (single-shot, never-spins) API over the same queue.
//! - [`arc`] — [`arc::ArcHandle`] / [`arc::AtomicArcCell`], a lock-free
//!   atomic shared-ownership handle: clone, drop, and atomic load/store of
//!   a shared cell via a sentinel-protected double-word CAS.
//!
//! Both primitives are wait-free or bounded-spin: no heap allocation, no
//! locks, no blocking syscalls on any hot path. Neither shares state or
//! dependencies with the other.
//!
//! Out of scope, by design: priority inheritance, bounded wait-freedom,
//! pub/sub broadcast (each `RingQueue` item is consumed by exactly one
//! reader), dynamic resizing, persistence, and cross-process shared
//! memory. Storage (the ring slab, the `ArcHandle` payload and control
//! block) is always caller-allocated; this crate never allocates or frees
//! it on your behalf except through the `with_capacity`/`new` convenience
//! constructors that do so explicitly.

pub mod error;
mod insights;

pub mod arc;
pub mod ring;

pub use arc::{ArcHandle, AtomicArcCell};
pub use error::{Result, RingArcError};
pub use ring::{Cursor, RingQueue};
