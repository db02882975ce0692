//! Bounded snapshot history for rewind

use crate::core::types::{InstanceId, Millis};
use crate::skills::SkillInstance;

/// Point-in-time capture of score and skill state
///
/// `payload` belongs to the host (snake body, food positions...) and is
/// handed back unchanged on rewind.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<P> {
    pub score: u32,
    pub earned_skills: Vec<SkillInstance>,
    /// Active instance ids in activation order
    pub active_skills: Vec<InstanceId>,
    pub timestamp_ms: Millis,
    pub payload: P,
}

impl<P> Snapshot<P> {
    /// Age relative to `now`, zero for snapshots stamped in the future
    pub fn age_ms(&self, now: Millis) -> Millis {
        now.saturating_sub(self.timestamp_ms)
    }
}

/// Fixed-capacity ring of snapshots, oldest evicted first
///
/// Slots are allocated once; `head` points at the oldest entry.
#[derive(Debug, Clone)]
pub struct SnapshotHistory<P> {
    slots: Vec<Option<Snapshot<P>>>,
    head: usize,
    len: usize,
}

impl<P> SnapshotHistory<P> {
    /// Create an empty history. A zero capacity is bumped to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            head: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a snapshot, returning the evicted oldest one when full
    pub fn push(&mut self, snapshot: Snapshot<P>) -> Option<Snapshot<P>> {
        let capacity = self.capacity();
        if self.len < capacity {
            let tail = (self.head + self.len) % capacity;
            self.slots[tail] = Some(snapshot);
            self.len += 1;
            None
        } else {
            let evicted = self.slots[self.head].replace(snapshot);
            self.head = (self.head + 1) % capacity;
            evicted
        }
    }

    /// Snapshot at logical position `index` (0 = oldest)
    pub fn get(&self, index: usize) -> Option<&Snapshot<P>> {
        if index >= self.len {
            return None;
        }
        self.slots[(self.head + index) % self.capacity()].as_ref()
    }

    pub fn oldest(&self) -> Option<&Snapshot<P>> {
        self.get(0)
    }

    pub fn newest(&self) -> Option<&Snapshot<P>> {
        self.len.checked_sub(1).and_then(|last| self.get(last))
    }

    /// Iterate oldest to newest; `.rev()` walks newest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Snapshot<P>> + '_ {
        (0..self.len).filter_map(move |i| self.get(i))
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.head = 0;
        self.len = 0;
    }
}
