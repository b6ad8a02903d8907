//! Upstream dispatch stage model.
//!
//! Holds dispatch groups in program order and offers the head group each cycle.
//! A group leaves the queue only once the issue stage accepts it; a rejected group
//! is offered again later exactly as it was, so nothing is dropped or reordered.

use std::collections::VecDeque;

use tracing::trace;

use crate::core::signals::DispatchOp;

/// In-order dispatch queue feeding the issue stage.
#[derive(Clone, Debug, Default)]
pub struct Upstream {
    pending: VecDeque<Vec<DispatchOp>>,
    honor_backpressure: bool,
    retries: u64,
}

impl Upstream {
    /// Creates a queue holding `groups` in order.
    ///
    /// With `honor_backpressure` the head group is offered only while the stage
    /// asserts `admission_ready`; otherwise it is offered every cycle.
    pub fn new(groups: impl IntoIterator<Item = Vec<DispatchOp>>, honor_backpressure: bool) -> Self {
        Self {
            pending: groups.into_iter().filter(|g| !g.is_empty()).collect(),
            honor_backpressure,
            retries: 0,
        }
    }

    /// The group to present this cycle, given the stage's current `admission_ready`.
    pub fn offer(&self, admission_ready: bool) -> Vec<DispatchOp> {
        if self.honor_backpressure && !admission_ready {
            return Vec::new();
        }
        self.pending.front().cloned().unwrap_or_default()
    }

    /// Retires the head group if the offered group was accepted.
    pub fn resolve(&mut self, offered: &[DispatchOp], accepted: bool) {
        if offered.is_empty() {
            return;
        }
        if accepted {
            let _ = self.pending.pop_front();
        } else {
            self.retries += 1;
            trace!(remaining = self.pending.len(), "group rejected, will re-offer");
        }
    }

    /// Groups not yet accepted.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Returns true once every group has been accepted.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of offers the stage rejected.
    pub const fn retries(&self) -> u64 {
        self.retries
    }
}
