//! Bounded line queue shared by the ingest and decode threads
//!
//! A fixed array of [`LineRecord`] slots addressed by two cursors: `head` is
//! the next slot the producer writes, `tail` the next slot the consumer
//! reads. Capacity is a power of two so wrapping is a bitmask, and one slot
//! is always left empty so `head == tail` means empty and
//! `head + 1 == tail` means full without a separate element count.
//!
//! # Policy
//!
//! The queue never blocks the producer. When it is full, [`BoundedLineQueue::try_push`]
//! drops the incoming line and returns `false`; lines already queued are
//! never overwritten. The drop is counted in [`QueueStats::dropped`].
//!
//! # Synchronization
//!
//! The slot array and both cursors live behind a single mutex, so a slot's
//! content is always written before the advanced `head` that exposes it can
//! be observed. A "not empty" condition variable is signalled on every
//! successful push; [`BoundedLineQueue::pop_wait`] checks for data and enters
//! the wait under the same lock, so a push can never slip between the check
//! and the wait.

use crate::error::{Result, SquitterError};
use crate::types::{LineRecord, DEFAULT_QUEUE_CAPACITY};
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Result of a waiting pop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopOutcome {
    /// A line was dequeued
    Line(LineRecord),
    /// Nothing arrived before the timeout
    TimedOut,
    /// The queue is closed and fully drained
    Closed,
}

/// Snapshot of the queue counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueueStats {
    /// Lines accepted by `try_push`
    pub pushed: u64,
    /// Lines rejected by `try_push` (queue full or closed)
    pub dropped: u64,
    /// Lines handed to the consumer
    pub popped: u64,
}

#[derive(Debug)]
struct Slots {
    records: Box<[LineRecord]>,
    head: usize,
    tail: usize,
    closed: bool,
}

impl Slots {
    fn pop(&mut self, mask: usize) -> Option<LineRecord> {
        if self.head == self.tail {
            return None;
        }
        let line = self.records[self.tail];
        self.tail = (self.tail + 1) & mask;
        Some(line)
    }
}

/// Fixed-capacity single-producer/single-consumer line queue
#[derive(Debug)]
pub struct BoundedLineQueue {
    slots: Mutex<Slots>,
    not_empty: Condvar,
    mask: usize,
    pushed: AtomicU64,
    dropped: AtomicU64,
    popped: AtomicU64,
}

impl BoundedLineQueue {
    /// Create a queue with [`DEFAULT_QUEUE_CAPACITY`] slots
    pub fn new() -> Self {
        Self::build(DEFAULT_QUEUE_CAPACITY)
    }

    /// Create a queue with `capacity` slots
    ///
    /// `capacity` must be a power of two and at least 2; one slot is kept
    /// free, so at most `capacity - 1` lines are buffered at once.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity < 2 || !capacity.is_power_of_two() {
            return Err(SquitterError::InvalidCapacity(capacity));
        }
        Ok(Self::build(capacity))
    }

    fn build(capacity: usize) -> Self {
        Self {
            slots: Mutex::new(Slots {
                records: vec![LineRecord::empty(); capacity].into_boxed_slice(),
                head: 0,
                tail: 0,
                closed: false,
            }),
            not_empty: Condvar::new(),
            mask: capacity - 1,
            pushed: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            popped: AtomicU64::new(0),
        }
    }

    /// Reset both cursors, reopen the queue, and clear the counters
    ///
    /// Only meaningful before the producer and consumer start.
    pub fn init(&self) {
        let mut slots = self.slots.lock();
        slots.head = 0;
        slots.tail = 0;
        slots.closed = false;
        self.pushed.store(0, Ordering::Relaxed);
        self.dropped.store(0, Ordering::Relaxed);
        self.popped.store(0, Ordering::Relaxed);
    }

    /// Total number of slots
    pub fn capacity(&self) -> usize {
        self.mask + 1
    }

    /// Number of lines currently buffered
    pub fn len(&self) -> usize {
        let slots = self.slots.lock();
        slots.head.wrapping_sub(slots.tail) & self.mask
    }

    pub fn is_empty(&self) -> bool {
        let slots = self.slots.lock();
        slots.head == slots.tail
    }

    /// Copy `line` into the next free slot
    ///
    /// Content longer than the line capacity is truncated. Returns `false`
    /// and leaves the queue untouched when it is full or closed.
    pub fn try_push(&self, line: &[u8]) -> bool {
        {
            let mut slots = self.slots.lock();
            let head = slots.head;
            let next = (head + 1) & self.mask;
            if next == slots.tail || slots.closed {
                drop(slots);
                self.dropped.fetch_add(1, Ordering::Relaxed);
                return false;
            }
            slots.records[head].set(line);
            slots.head = next;
        }
        self.pushed.fetch_add(1, Ordering::Relaxed);
        self.not_empty.notify_one();
        true
    }

    /// Take the oldest line without blocking
    pub fn try_pop(&self) -> Option<LineRecord> {
        let line = self.slots.lock().pop(self.mask);
        if line.is_some() {
            self.popped.fetch_add(1, Ordering::Relaxed);
        }
        line
    }

    /// Take the oldest line, waiting up to `timeout` for one to arrive
    ///
    /// Buffered lines are still returned after [`close`](Self::close);
    /// `Closed` is reported only once the queue is drained.
    pub fn pop_wait(&self, timeout: Duration) -> PopOutcome {
        let deadline = Instant::now() + timeout;
        let mut slots = self.slots.lock();
        loop {
            if let Some(line) = slots.pop(self.mask) {
                drop(slots);
                self.popped.fetch_add(1, Ordering::Relaxed);
                return PopOutcome::Line(line);
            }
            if slots.closed {
                return PopOutcome::Closed;
            }
            if self.not_empty.wait_until(&mut slots, deadline).timed_out() {
                if let Some(line) = slots.pop(self.mask) {
                    drop(slots);
                    self.popped.fetch_add(1, Ordering::Relaxed);
                    return PopOutcome::Line(line);
                }
                return if slots.closed {
                    PopOutcome::Closed
                } else {
                    PopOutcome::TimedOut
                };
            }
        }
    }

    /// Stop accepting lines and wake any waiting consumer
    pub fn close(&self) {
        self.slots.lock().closed = true;
        self.not_empty.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.slots.lock().closed
    }

    /// Current counter values
    pub fn stats(&self) -> QueueStats {
        QueueStats {
            pushed: self.pushed.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            popped: self.popped.load(Ordering::Relaxed),
        }
    }
}

impl Default for BoundedLineQueue {
    fn default() -> Self {
        Self::new()
    }
}
