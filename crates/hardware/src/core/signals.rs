//! Step interface signals.
//!
//! This module defines the structured values exchanged with the issue stage once per cycle:
//! 1. **Operands:** Resolved-or-pending source operand state produced by renaming.
//! 2. **Inputs:** Dispatch candidates, result-bus broadcasts, and the reset line.
//! 3. **Outputs:** Admission readiness, group acceptance, and per-port issue packets.

use serde::{Deserialize, Serialize};

use crate::common::types::{Opcode, Tag, Word};

/// Source operand state.
///
/// `ready == true` means `value` is final. `ready == false` means the operand is
/// waiting for a broadcast of `tag`; `value` is meaningless until then.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operand {
    /// Operand value, valid once `ready` is set.
    #[serde(default)]
    pub value: Word,
    /// Producer tag watched on the result bus while pending.
    #[serde(default)]
    pub tag: Tag,
    /// Whether `value` is final.
    pub ready: bool,
}

impl Operand {
    /// Creates a resolved operand.
    #[inline]
    pub const fn ready(value: Word) -> Self {
        Self {
            value,
            tag: Tag(0),
            ready: true,
        }
    }

    /// Creates an operand waiting on `tag`.
    #[inline]
    pub const fn pending(tag: Tag) -> Self {
        Self {
            value: 0,
            tag,
            ready: false,
        }
    }

    /// Returns true if the operand is still waiting on `tag`.
    ///
    /// A resolved operand never matches, even if its stale tag field coincides.
    #[inline]
    pub fn waits_on(&self, tag: Tag) -> bool {
        !self.ready && self.tag == tag
    }
}

/// A candidate instruction offered by the upstream dispatch stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOp {
    /// Opaque operation identifier.
    pub opcode: Opcode,
    /// Tag this instruction will broadcast when it produces its result.
    pub dest: Tag,
    /// First source operand.
    pub src1: Operand,
    /// Second source operand.
    pub src2: Operand,
}

/// One `(tag, value)` pair announced on the result bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Broadcast {
    /// Producer tag.
    pub tag: Tag,
    /// Produced value.
    pub value: Word,
}

impl Broadcast {
    /// Creates a broadcast pair.
    #[inline]
    pub const fn new(tag: Tag, value: Word) -> Self {
        Self { tag, value }
    }
}

/// Payload handed to an execution port.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuePacket {
    /// Station slot the instruction issued from.
    pub slot: usize,
    /// Opaque operation identifier.
    pub opcode: Opcode,
    /// Destination tag the execution unit will broadcast.
    pub dest: Tag,
    /// First operand value.
    pub src1: Word,
    /// Second operand value.
    pub src2: Word,
}

/// Inputs presented to the issue stage for one cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInput {
    /// Synchronous reset. Dominates every other input.
    #[serde(default)]
    pub reset: bool,
    /// Dispatch group offered this cycle (at most `dispatch_width` candidates).
    #[serde(default)]
    pub dispatch: Vec<DispatchOp>,
    /// Result-bus broadcasts visible this cycle (at most `broadcast_width` pairs).
    #[serde(default)]
    pub broadcast: Vec<Broadcast>,
}

impl StepInput {
    /// An input with no dispatch, no broadcast, and reset deasserted.
    pub fn idle() -> Self {
        Self::default()
    }

    /// An input asserting reset.
    pub fn reset() -> Self {
        Self {
            reset: true,
            ..Self::default()
        }
    }

    /// Replaces the dispatch group.
    #[must_use]
    pub fn with_dispatch(mut self, group: impl Into<Vec<DispatchOp>>) -> Self {
        self.dispatch = group.into();
        self
    }

    /// Replaces the broadcast event.
    #[must_use]
    pub fn with_broadcast(mut self, results: impl Into<Vec<Broadcast>>) -> Self {
        self.broadcast = results.into();
        self
    }
}

/// Outputs produced by the issue stage for one cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutput {
    /// Asserted when at least `dispatch_width` entries were free at the start of the cycle.
    pub admission_ready: bool,
    /// Whether the offered dispatch group was inserted. An empty group counts as
    /// accepted, except on a reset step, which always reports `false`.
    pub accepted: bool,
    /// One element per execution port; `None` means the port is idle.
    pub issue: Vec<Option<IssuePacket>>,
}

impl StepOutput {
    /// Iterates over `(port, packet)` for every port that fired.
    pub fn fired(&self) -> impl Iterator<Item = (usize, &IssuePacket)> + '_ {
        self.issue
            .iter()
            .enumerate()
            .filter_map(|(port, slot)| slot.as_ref().map(|packet| (port, packet)))
    }

    /// Number of ports that fired this cycle.
    pub fn fired_count(&self) -> usize {
        self.issue.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns true when every port is idle.
    pub fn is_idle(&self) -> bool {
        self.issue.iter().all(Option::is_none)
    }

    /// Returns the packet on `port`, if it fired.
    pub fn port(&self, port: usize) -> Option<&IssuePacket> {
        self.issue.get(port).and_then(Option::as_ref)
    }
}
