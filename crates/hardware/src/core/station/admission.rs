//! Admission controller.
//!
//! Decides, from the pre-step occupancy, whether the offered dispatch group is
//! inserted this cycle. Groups are admitted atomically: either every candidate
//! is inserted or none is, and a rejected group is expected to be re-offered
//! unchanged.

/// Outcome of one admission decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdmissionDecision {
    /// Whether the offered group is inserted this cycle.
    pub accept: bool,
    /// Whether a full-width group would be accepted (backpressure signal).
    pub admission_ready: bool,
}

/// Capacity-aware admission with backpressure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdmissionController {
    capacity: usize,
    max_group: usize,
}

impl AdmissionController {
    /// Creates a controller for a station of `capacity` entries fed by groups of
    /// at most `max_group` candidates.
    pub const fn new(capacity: usize, max_group: usize) -> Self {
        Self {
            capacity,
            max_group,
        }
    }

    /// Free entries given `occupied` occupied entries.
    #[inline]
    pub const fn free(&self, occupied: usize) -> usize {
        self.capacity.saturating_sub(occupied)
    }

    /// Asserted iff at least `max_group` entries are free.
    ///
    /// Whenever this is true, any group of up to `max_group` candidates offered
    /// against the same occupancy is accepted.
    #[inline]
    pub const fn admission_ready(&self, occupied: usize) -> bool {
        self.free(occupied) >= self.max_group
    }

    /// Decides acceptance of a group of `group_len` candidates.
    ///
    /// An empty group is always accepted and inserts nothing.
    pub const fn decide(&self, occupied: usize, group_len: usize) -> AdmissionDecision {
        AdmissionDecision {
            accept: self.free(occupied) >= group_len,
            admission_ready: self.admission_ready(occupied),
        }
    }
}
