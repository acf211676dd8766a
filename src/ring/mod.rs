//! Lock-free MPMC ring buffer (ported from the NTRINGB header-only design).
//!
//! - [`RingQueue`] owns the four watermarks (`next_write`, `last_write`,
//!   `next_read`, `last_read`) and the externally-supplied storage slab.
//! - [`Cursor`] is the per-participant handle bound to a queue; producers
//!   and consumers each hold their own.
//!
//! Reservation is fetch-and-increment (`next_write`/`next_read`); commit is
//! a CAS gate that only lets sequence `s` publish once `s - 1` has
//! published, so producers (or consumers) may finish out of order but
//! always become visible to the other side in reservation order. The
//! blocking half (`begin_*`/`commit_*`) spins on that gate; the polling
//! half (`poll_*`) never spins — it reserves unconditionally and reports
//! readiness/commit success as a bool for cooperative schedulers.
//!
//! Each committed payload is consumed by exactly one reader: multiple
//! concurrent consumers each see a strict subsequence of the slot order,
//! not the full stream.

mod cursor;
mod queue;

pub use cursor::Cursor;
pub use queue::RingQueue;
