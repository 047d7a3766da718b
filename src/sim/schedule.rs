//! Deferred actions keyed by simulation time
//!
//! Effect reversion and bonus spawning are queued here instead of on host
//! timers. `tick` drains every entry whose due time is at or before the
//! current clock, so an action fires on the first tick at or after its due
//! time. Restarting a match clears the queue.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use super::state::BonusKind;

/// What to do when a timer comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledAction {
    /// Return one bonus effect to neutral
    RevertEffect(BonusKind),
    /// Periodic spawn attempt; reschedules itself
    SpawnBonus,
    /// One-shot spawn attempt after a collection
    ReplaceBonus,
}

/// Handle for cancelling a queued action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Entry {
    due_ms: f64,
    seq: u64,
    action: ScheduledAction,
}

// Min-heap on (due_ms, seq): earliest first, FIFO among equal times
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .total_cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for Entry {}

/// Priority queue of pending actions with lazy cancellation
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    heap: BinaryHeap<Entry>,
    /// Sequence numbers still armed; cancelled entries drop out when popped
    live: HashSet<u64>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: f64, action: ScheduledAction) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { due_ms, seq, action });
        self.live.insert(seq);
        TimerId(seq)
    }

    /// Disarm a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.live.remove(&id.0)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.live.contains(&id.0)
    }

    /// Pop the earliest armed action due at or before `now_ms`
    pub fn pop_due(&mut self, now_ms: f64) -> Option<ScheduledAction> {
        while let Some(entry) = self.heap.peek() {
            if !self.live.contains(&entry.seq) {
                self.heap.pop();
                continue;
            }
            if entry.due_ms > now_ms {
                return None;
            }
            let entry = self.heap.pop()?;
            self.live.remove(&entry.seq);
            return Some(entry.action);
        }
        None
    }

    /// Due time of the earliest armed action
    pub fn next_due_ms(&self) -> Option<f64> {
        self.heap
            .iter()
            .filter(|e| self.live.contains(&e.seq))
            .map(|e| e.due_ms)
            .min_by(f64::total_cmp)
    }

    /// Number of armed actions
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Number of armed actions equal to `action`
    pub fn count(&self, action: ScheduledAction) -> usize {
        self.heap
            .iter()
            .filter(|e| e.action == action && self.live.contains(&e.seq))
            .count()
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.heap.clear();
        self.live.clear();
    }
}
