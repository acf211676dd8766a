//! Per-participant cursor: the handle a single producer or consumer thread
//! uses to reserve and commit sequence numbers against a [`RingQueue`].

use std::cell::Cell;
use std::marker::PhantomData;
use std::sync::atomic::{fence, Ordering};

use crate::insights;
use crate::ring::queue::RingQueue;

/// A cursor bound to one [`RingQueue`], holding the sequence this
/// participant most recently reserved.
///
/// `Cursor` is `Send` but not `Sync`: moving it to another thread is fine,
/// but two threads must never drive the same cursor concurrently. The
/// `PhantomData<Cell<()>>` marker is what suppresses `Sync` — `Cell` is
/// the standard not-`Sync` witness type.
pub struct Cursor<'a, T> {
    queue: &'a RingQueue<T>,
    current_pos: i64,
    _not_sync: PhantomData<Cell<()>>,
}

impl<'a, T> Cursor<'a, T> {
    pub(crate) fn new(queue: &'a RingQueue<T>) -> Self {
        Self { queue, current_pos: -1, _not_sync: PhantomData }
    }

    /// Sequence number this cursor last reserved, or `-1` if it has never
    /// reserved a slot.
    pub fn current_pos(&self) -> i64 {
        self.current_pos
    }

    /// `capacity + last_read - current_pos + 1`: room left for this
    /// cursor's next write reservation before it would overrun a slot the
    /// consumer side hasn't freed yet.
    pub fn available_write(&self) -> i64 {
        self.queue.capacity + self.queue.last_read.load(Ordering::Acquire) - self.current_pos + 1
    }

    /// `last_write - current_pos + 1`: payloads available for this
    /// cursor's next read reservation.
    pub fn available_read(&self) -> i64 {
        self.queue.last_write.load(Ordering::Acquire) - self.current_pos + 1
    }

    fn reserve_write(&mut self) -> i64 {
        let seq = self.queue.next_write.fetch_add(1, Ordering::Relaxed) + 1;
        self.current_pos = seq;
        seq
    }

    fn reserve_read(&mut self) -> i64 {
        let seq = self.queue.next_read.fetch_add(1, Ordering::Relaxed) + 1;
        self.current_pos = seq;
        seq
    }

    fn slot_index(&self, seq: i64) -> usize {
        (seq as usize) & self.queue.mask
    }

    // --- blocking API ---------------------------------------------------

    /// Reserve the next write sequence, spinning until the slot is free
    /// (i.e. not still claimed by an uncommitted read), then return the
    /// slot index to write into.
    pub fn begin_write(&mut self) -> usize {
        let seq = self.reserve_write();
        let mut waited = false;
        while self.queue.capacity + self.queue.last_read.load(Ordering::Acquire) - seq + 1 <= 0 {
            if !waited {
                insights::record_write_wait(seq);
                waited = true;
            }
            fence(Ordering::SeqCst);
            std::hint::spin_loop();
        }
        self.slot_index(seq)
    }

    /// Publish this cursor's reserved write sequence. Spins until sequence
    /// `seq - 1` has been committed by whichever producer reserved it, so
    /// commits become visible strictly in reservation order.
    pub fn commit_write(&mut self) {
        let seq = self.current_pos;
        while self
            .queue
            .last_write
            .compare_exchange_weak(seq - 1, seq, Ordering::Release, Ordering::Relaxed)
            .is_err()
        {
            std::hint::spin_loop();
        }
    }

    /// Reserve the next read sequence, spinning until the payload is fully
    /// committed by its producer, then return the slot index to read from.
    pub fn begin_read(&mut self) -> usize {
        let seq = self.reserve_read();
        let mut waited = false;
        while seq > self.queue.last_write.load(Ordering::Acquire) {
            if !waited {
                insights::record_read_wait(seq);
                waited = true;
            }
            fence(Ordering::SeqCst);
            std::hint::spin_loop();
        }
        self.slot_index(seq)
    }

    /// Publish this cursor's reserved read sequence, freeing the slot for
    /// producers. Spins until sequence `seq - 1` has been committed.
    pub fn commit_read(&mut self) {
        let seq = self.current_pos;
        while self
            .queue
            .last_read
            .compare_exchange_weak(seq - 1, seq, Ordering::Release, Ordering::Relaxed)
            .is_err()
        {
            std::hint::spin_loop();
        }
    }

    // --- polling API ------------------------------------------------------

    /// Reserve the next write sequence unconditionally (no wait) and
    /// return the slot index. Callers must check [`Cursor::poll_write_ready`]
    /// themselves if they need backpressure before writing.
    pub fn poll_begin_write(&mut self) -> usize {
        let seq = self.reserve_write();
        self.slot_index(seq)
    }

    /// `true` iff [`Cursor::available_write`] is positive.
    pub fn poll_write_ready(&self) -> bool {
        self.available_write() > 0
    }

    /// Attempt exactly one CAS to publish the reserved write sequence.
    /// Returns `true` iff the commit took effect; on `false` the caller
    /// should retry (e.g. on the next scheduler tick).
    pub fn poll_commit_write(&mut self) -> bool {
        let seq = self.current_pos;
        self.queue
            .last_write
            .compare_exchange(seq - 1, seq, Ordering::Release, Ordering::Relaxed)
            .is_ok()
    }

    /// Reserve the next read sequence unconditionally (no wait) and return
    /// the slot index.
    pub fn poll_begin_read(&mut self) -> usize {
        let seq = self.reserve_read();
        self.slot_index(seq)
    }

    /// `true` iff [`Cursor::available_read`] is positive.
    pub fn poll_read_ready(&self) -> bool {
        self.available_read() > 0
    }

    /// Attempt exactly one CAS to publish the reserved read sequence.
    pub fn poll_commit_read(&mut self) -> bool {
        let seq = self.current_pos;
        self.queue
            .last_read
            .compare_exchange(seq - 1, seq, Ordering::Release, Ordering::Relaxed)
            .is_ok()
    }

    /// Write the payload into the slot most recently reserved for writing.
    ///
    /// # Safety
    /// Must be called after `begin_write`/`poll_begin_write` and before
    /// the matching commit, with `idx` the value that call returned.
    pub unsafe fn write(&self, idx: usize, value: T) {
        self.queue.write(idx, value);
    }

    /// Read the payload out of the slot most recently reserved for reading.
    ///
    /// # Safety
    /// Must be called after `begin_read`/`poll_begin_read`, with `idx` the
    /// value that call returned.
    pub unsafe fn read(&self, idx: usize) -> T {
        self.queue.read(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::RingQueue;

    #[test]
    fn cursor_starts_at_minus_one() {
        let q = RingQueue::<u64>::with_capacity(8).unwrap();
        let cur = q.cursor();
        assert_eq!(cur.current_pos(), -1);
    }

    #[test]
    fn single_threaded_write_then_read_preserves_order() {
        let q = RingQueue::<(i32, i32)>::with_capacity(8).unwrap();
        let mut w = q.cursor();
        let mut r = q.cursor();

        for x in 1..=8 {
            let idx = w.begin_write();
            unsafe { w.write(idx, (x, x + 1)) };
            w.commit_write();
        }

        for x in 1..=8 {
            let idx = r.begin_read();
            let got = unsafe { r.read(idx) };
            r.commit_read();
            assert_eq!(got, (x, x + 1));
        }
    }

    #[test]
    fn poll_commit_write_fails_out_of_order() {
        let q = RingQueue::<u64>::with_capacity(8).unwrap();
        let mut a = q.cursor();
        let mut b = q.cursor();

        let idx_a = a.poll_begin_write();
        let idx_b = b.poll_begin_write();
        unsafe {
            a.write(idx_a, 1);
            b.write(idx_b, 2);
        }

        // b reserved sequence 1, a reserved sequence 0: b can't commit first.
        assert!(!b.poll_commit_write());
        assert!(a.poll_commit_write());
        assert!(b.poll_commit_write());
    }

    #[test]
    fn capacity_one_alternates_strictly() {
        let q = RingQueue::<u64>::with_capacity(1).unwrap();
        let mut w = q.cursor();
        let mut r = q.cursor();

        for v in 0..4u64 {
            assert!(w.poll_write_ready());
            let idx = w.begin_write();
            unsafe { w.write(idx, v) };
            w.commit_write();

            assert!(r.poll_read_ready());
            let idx = r.begin_read();
            assert_eq!(unsafe { r.read(idx) }, v);
            r.commit_read();
        }
    }
}
