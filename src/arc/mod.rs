//! Lock-free atomic shared-ownership handle (ported from the NTARC
//! header-only design).
//!
//! - [`ArcHandle`] is the `(control, data)` pair plus clone/drop/new.
//! - [`AtomicArcCell`] is a shared cell supporting atomic load/store of a
//!   handle via a sentinel-protected double-word CAS.
//!
//! The central problem: a shared cell holds a *pair*, and a reader wishing
//! to clone it must simultaneously read the pair, increment the refcount,
//! and publish nothing that lets a concurrent store finalize the old
//! payload in between. `AtomicArcCell` solves this by briefly replacing
//! the cell's contents with a reserved sentinel value while it holds
//! exclusive custody of whatever was really there.

mod cell;
mod control;
mod handle;

pub use cell::AtomicArcCell;
pub use handle::ArcHandle;
