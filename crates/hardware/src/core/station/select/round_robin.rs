//! Round-robin arbiter.
//!
//! Searches the ready set in rotational order starting at a pointer, then moves
//! the pointer one slot past the last grant. The pointer advances by at least one
//! slot every cycle that grants anything, and never past a ready entry it skipped,
//! so a continuously ready entry is granted within `capacity` cycles.

use super::{Arbiter, Candidate};

/// Rotating-priority arbiter state.
#[derive(Clone, Debug)]
pub struct RoundRobinArbiter {
    /// Slot with highest priority next cycle.
    next: usize,
    /// Number of slots in the station.
    capacity: usize,
}

impl RoundRobinArbiter {
    /// Creates an arbiter for `capacity` slots with slot 0 at highest priority.
    pub const fn new(capacity: usize) -> Self {
        Self { next: 0, capacity }
    }

    /// Slot with highest priority next cycle.
    pub const fn pointer(&self) -> usize {
        self.next
    }
}

impl Arbiter for RoundRobinArbiter {
    fn select(&self, ready: &[Candidate], ports: usize) -> Vec<usize> {
        let split = ready.partition_point(|c| c.slot < self.next);
        let (wrapped, ahead) = ready.split_at(split);
        ahead
            .iter()
            .chain(wrapped)
            .take(ports)
            .map(|c| c.slot)
            .collect()
    }

    fn update(&mut self, granted: &[usize]) {
        if let Some(&last) = granted.last() {
            self.next = (last + 1) % self.capacity;
        }
    }

    fn reset(&mut self) {
        self.next = 0;
    }
}
