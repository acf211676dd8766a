//! Concrete scenarios from the ring buffer invariants: single-threaded
//! FIFO order, an SPSC burst larger than capacity, and MPSC multiset
//! equality under contention.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use ringarc::RingQueue;

/// Scenario 1: N=8, single-threaded, producer writes (x, x+1) for x in
/// 1..=8, consumer then reads 8 items in the same order.
#[test]
fn single_threaded_ring_preserves_write_order() {
    let q = RingQueue::<(i32, i32)>::with_capacity(8).unwrap();
    let mut writer = q.cursor();
    let mut reader = q.cursor();

    for x in 1..=8 {
        let idx = writer.begin_write();
        unsafe { writer.write(idx, (x, x + 1)) };
        writer.commit_write();
    }

    let mut observed = Vec::with_capacity(8);
    for _ in 0..8 {
        let idx = reader.begin_read();
        observed.push(unsafe { reader.read(idx) });
        reader.commit_read();
    }

    let expected: Vec<(i32, i32)> = (1..=8).map(|x| (x, x + 1)).collect();
    assert_eq!(observed, expected);
}

/// Scenario 2: N=8, SPSC burst of 12 items (larger than capacity) with a
/// concurrent producer and consumer and no sleeps. Backpressure must
/// resolve without losing or duplicating any item, and order is preserved.
#[test]
fn spsc_burst_larger_than_capacity_preserves_order() {
    let q = Arc::new(RingQueue::<(i32, i32)>::with_capacity(8).unwrap());
    const COUNT: i32 = 12;

    let producer_q = q.clone();
    let producer = thread::spawn(move || {
        let mut cursor = producer_q.cursor();
        for k in 1..=COUNT {
            let idx = cursor.begin_write();
            unsafe { cursor.write(idx, (k, k + 1)) };
            cursor.commit_write();
        }
    });

    let consumer_q = q.clone();
    let consumer = thread::spawn(move || {
        let mut cursor = consumer_q.cursor();
        let mut observed = Vec::with_capacity(COUNT as usize);
        for _ in 0..COUNT {
            let idx = cursor.begin_read();
            observed.push(unsafe { cursor.read(idx) });
            cursor.commit_read();
        }
        observed
    });

    producer.join().unwrap();
    let observed = consumer.join().unwrap();

    let expected: Vec<(i32, i32)> = (1..=COUNT).map(|k| (k, k + 1)).collect();
    assert_eq!(observed, expected);
}

/// Scenario 3: N=8, two producers each enqueue 100 items tagged with their
/// producer id, one consumer reads 200 items; the multiset observed must
/// equal the multiset produced (no loss, no duplication).
#[test]
fn mpsc_multiset_matches_across_two_producers() {
    let q = Arc::new(RingQueue::<(u8, u32)>::with_capacity(8).unwrap());
    const ITEMS_PER_PRODUCER: u32 = 100;

    let mut producers = Vec::new();
    for producer_id in 0u8..2 {
        let q = q.clone();
        producers.push(thread::spawn(move || {
            let mut cursor = q.cursor();
            for i in 0..ITEMS_PER_PRODUCER {
                let idx = cursor.begin_write();
                unsafe { cursor.write(idx, (producer_id, i)) };
                cursor.commit_write();
            }
        }));
    }

    let consumer_q = q.clone();
    let consumer = thread::spawn(move || {
        let mut cursor = consumer_q.cursor();
        let mut observed = Vec::with_capacity((2 * ITEMS_PER_PRODUCER) as usize);
        for _ in 0..2 * ITEMS_PER_PRODUCER {
            let idx = cursor.begin_read();
            observed.push(unsafe { cursor.read(idx) });
            cursor.commit_read();
        }
        observed
    });

    for p in producers {
        p.join().unwrap();
    }
    let observed = consumer.join().unwrap();

    assert_eq!(observed.len(), (2 * ITEMS_PER_PRODUCER) as usize);

    let mut expected_counts: HashMap<(u8, u32), u32> = HashMap::new();
    for producer_id in 0u8..2 {
        for i in 0..ITEMS_PER_PRODUCER {
            *expected_counts.entry((producer_id, i)).or_insert(0) += 1;
        }
    }
    let mut observed_counts: HashMap<(u8, u32), u32> = HashMap::new();
    for item in observed {
        *observed_counts.entry(item).or_insert(0) += 1;
    }
    assert_eq!(observed_counts, expected_counts, "multiset mismatch — data loss or duplication");
}

/// Boundary: N=1 forces producer and consumer to strictly alternate.
#[test]
fn capacity_one_alternates_producer_and_consumer() {
    let q = Arc::new(RingQueue::<u32>::with_capacity(1).unwrap());
    const COUNT: u32 = 50;

    let producer_q = q.clone();
    let producer = thread::spawn(move || {
        let mut cursor = producer_q.cursor();
        for v in 0..COUNT {
            let idx = cursor.begin_write();
            unsafe { cursor.write(idx, v) };
            cursor.commit_write();
        }
    });

    let consumer_q = q.clone();
    let consumer = thread::spawn(move || {
        let mut cursor = consumer_q.cursor();
        let mut observed = Vec::with_capacity(COUNT as usize);
        for _ in 0..COUNT {
            let idx = cursor.begin_read();
            observed.push(unsafe { cursor.read(idx) });
            cursor.commit_read();
        }
        observed
    });

    producer.join().unwrap();
    let observed = consumer.join().unwrap();
    assert_eq!(observed, (0..COUNT).collect::<Vec<_>>());
}

/// Polling API: a cooperative consumer multiplexing over readiness/commit
/// retries instead of spinning inside the core.
#[test]
fn polling_api_round_trips_without_blocking_calls() {
    let q = RingQueue::<u64>::with_capacity(8).unwrap();
    let mut writer = q.cursor();
    let mut reader = q.cursor();

    assert!(writer.poll_write_ready());
    let idx = writer.poll_begin_write();
    unsafe { writer.write(idx, 99) };
    assert!(writer.poll_commit_write());

    assert!(reader.poll_read_ready());
    let idx = reader.poll_begin_read();
    assert_eq!(unsafe { reader.read(idx) }, 99);
    assert!(reader.poll_commit_read());

    // Nothing left to read.
    assert!(!reader.poll_read_ready());
}
