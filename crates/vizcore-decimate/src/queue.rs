//! Indexed binary min-heap
//!
//! A priority queue over small integer ids that also keeps an
//! id -> heap-slot map, so an id's priority can be replaced or removed in
//! O(log n) instead of scanning the heap. `std::collections::BinaryHeap`
//! has no way to reach an entry by id.
//!
//! Ordering is by priority, then by id, which makes pops deterministic when
//! several vertices share an error value.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy)]
struct Entry {
    priority: f64,
    id: usize,
}

impl Entry {
    fn cmp_key(&self, other: &Entry) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then(self.id.cmp(&other.id))
    }
}

/// Min-heap of `(id, priority)` with at most one entry per id
#[derive(Debug, Clone, Default)]
pub struct IndexedMinHeap {
    heap: Vec<Entry>,
    /// Heap slot of each id, `None` when absent
    slots: Vec<Option<usize>>,
}

impl IndexedMinHeap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Heap pre-sized for ids below `capacity`
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            slots: vec![None; capacity],
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, id: usize) -> bool {
        self.slot(id).is_some()
    }

    /// Current priority of `id`
    pub fn priority(&self, id: usize) -> Option<f64> {
        self.slot(id).map(|slot| self.heap[slot].priority)
    }

    /// Lowest entry without removing it
    pub fn peek(&self) -> Option<(usize, f64)> {
        self.heap.first().map(|e| (e.id, e.priority))
    }

    /// Insert `id`, replacing its priority if already present.
    ///
    /// Returns the replaced priority.
    pub fn push(&mut self, id: usize, priority: f64) -> Option<f64> {
        if id >= self.slots.len() {
            self.slots.resize(id + 1, None);
        }

        if let Some(slot) = self.slots[id] {
            let old = self.heap[slot].priority;
            self.heap[slot].priority = priority;
            self.sift_up(slot);
            self.sift_down(slot);
            return Some(old);
        }

        self.heap.push(Entry { priority, id });
        let slot = self.heap.len() - 1;
        self.slots[id] = Some(slot);
        self.sift_up(slot);
        None
    }

    /// Remove and return the lowest entry
    pub fn pop(&mut self) -> Option<(usize, f64)> {
        let top = *self.heap.first()?;
        self.remove_slot(0);
        Some((top.id, top.priority))
    }

    /// Remove `id`. Returns its priority if it was queued.
    pub fn remove(&mut self, id: usize) -> Option<f64> {
        let slot = self.slot(id)?;
        let priority = self.heap[slot].priority;
        self.remove_slot(slot);
        Some(priority)
    }

    /// Remove every entry, keeping the allocations
    pub fn clear(&mut self) {
        for entry in self.heap.drain(..) {
            self.slots[entry.id] = None;
        }
    }

    fn slot(&self, id: usize) -> Option<usize> {
        self.slots.get(id).copied().flatten()
    }

    fn remove_slot(&mut self, slot: usize) {
        let last = self.heap.len() - 1;
        self.swap(slot, last);
        if let Some(removed) = self.heap.pop() {
            self.slots[removed.id] = None;
        }
        if slot < self.heap.len() {
            self.sift_up(slot);
            self.sift_down(slot);
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.slots[self.heap[a].id] = Some(a);
        self.slots[self.heap[b].id] = Some(b);
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.heap[slot].cmp_key(&self.heap[parent]) != Ordering::Less {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;

            if left < len && self.heap[left].cmp_key(&self.heap[smallest]) == Ordering::Less {
                smallest = left;
            }
            if right < len && self.heap[right].cmp_key(&self.heap[smallest]) == Ordering::Less {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap(slot, smallest);
            slot = smallest;
        }
    }
}
