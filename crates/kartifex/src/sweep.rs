//! Sweep-line event queue over 1D intervals.
//!
//! Each value registers an `Open` event at the low end of its interval and a
//! `Closed` event at the high end (both widened by `SCALAR_EPSILON`). Events
//! come out in increasing key order; at equal keys opens come before closes,
//! so touching intervals are active together.

use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap};

use crate::cfg::SCALAR_EPSILON;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    Open,
    Closed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Event<T> {
    pub key: f64,
    pub value: T,
    pub kind: EventKind,
}

/// Heap slot; `seq` keeps equal events in insertion order.
#[derive(Clone, Debug)]
struct Slot<T> {
    event: Event<T>,
    seq: u64,
}

impl<T> Slot<T> {
    fn order(&self, other: &Self) -> Ordering {
        self.event
            .key
            .total_cmp(&other.event.key)
            .then(self.event.kind.cmp(&other.event.kind))
            .then(self.seq.cmp(&other.seq))
    }
}

impl<T> PartialEq for Slot<T> {
    fn eq(&self, other: &Self) -> bool {
        self.order(other) == Ordering::Equal
    }
}

impl<T> Eq for Slot<T> {}

impl<T> Ord for Slot<T> {
    // reversed: BinaryHeap is a max-heap
    fn cmp(&self, other: &Self) -> Ordering {
        other.order(self)
    }
}

impl<T> PartialOrd for Slot<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Clone, Debug)]
pub struct SweepQueue<T> {
    heap: BinaryHeap<Slot<T>>,
    active: BTreeSet<T>,
    seq: u64,
}

impl<T: Clone + Ord> Default for SweepQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Ord> SweepQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            active: BTreeSet::new(),
            seq: 0,
        }
    }

    fn push(&mut self, key: f64, value: T, kind: EventKind) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Slot {
            event: Event { key, value, kind },
            seq,
        });
    }

    /// Register `value` over `[min(a, b), max(a, b)]`.
    pub fn add(&mut self, value: T, a: f64, b: f64) {
        self.push(a.min(b) - SCALAR_EPSILON, value.clone(), EventKind::Open);
        self.push(a.max(b) + SCALAR_EPSILON, value, EventKind::Closed);
    }

    /// Key of the next event, `f64::MAX` when drained.
    pub fn peek(&self) -> f64 {
        self.heap.peek().map_or(f64::MAX, |s| s.event.key)
    }

    fn peek_slot(&self) -> Option<&Slot<T>> {
        self.heap.peek()
    }

    /// Pop the next event and update the active set.
    pub fn next(&mut self) -> Option<Event<T>> {
        let Slot { event, .. } = self.heap.pop()?;
        match event.kind {
            EventKind::Open => {
                self.active.insert(event.value.clone());
            }
            EventKind::Closed => {
                self.active.remove(&event.value);
            }
        }
        Some(event)
    }

    /// Advance to the next `Open` event and return its value.
    pub fn take(&mut self) -> Option<T> {
        while let Some(e) = self.next() {
            if e.kind == EventKind::Open {
                return Some(e.value);
            }
        }
        None
    }

    /// Values whose interval contains the last popped key.
    pub fn active(&self) -> &BTreeSet<T> {
        &self.active
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Index of the queue holding the globally next event, once that event
    /// is an `Open`. Closes met on the way are consumed. `None` when every
    /// queue is drained.
    pub fn next_of(queues: &mut [SweepQueue<T>]) -> Option<usize> {
        loop {
            let mut min: Option<(usize, &Slot<T>)> = None;
            for (i, q) in queues.iter().enumerate() {
                if let Some(s) = q.peek_slot() {
                    if min.map_or(true, |(_, m)| s.order(m) == Ordering::Less) {
                        min = Some((i, s));
                    }
                }
            }
            let (idx, kind) = match min {
                Some((i, s)) => (i, s.event.kind),
                None => return None,
            };
            if kind == EventKind::Open {
                return Some(idx);
            }
            queues[idx].next();
        }
    }
}
