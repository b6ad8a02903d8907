//! Wakeup unit.
//!
//! Matches result-bus broadcasts against pending operands and forwards the
//! broadcast values. Matching is computed against the pre-step snapshot and
//! applied at commit:
//! 1. **Compute:** `WakeupUnit::compute` scans every occupied entry against every pair.
//! 2. **Apply:** `WakeupUnit::apply` writes the captured values and sets `ready`.
//!
//! Each pending operand is compared against the whole event independently, so the
//! order of pairs within one broadcast never changes the outcome.

use crate::common::types::Word;
use crate::core::signals::Broadcast;

use super::entry::{Entry, OperandSlot};

/// One operand capture produced by a broadcast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capture {
    /// Entry slot.
    pub slot: usize,
    /// Operand that resolves.
    pub operand: OperandSlot,
    /// Forwarded value.
    pub value: Word,
}

/// Tag-match and forwarding logic.
#[derive(Clone, Copy, Debug, Default)]
pub struct WakeupUnit;

impl WakeupUnit {
    /// Computes every operand capture caused by `broadcast` against `entries`.
    ///
    /// Only occupied entries with `ready == false` operands participate. Captures
    /// are returned in ascending slot order, `Src1` before `Src2`.
    pub fn compute(entries: &[Entry], broadcast: &[Broadcast]) -> Vec<Capture> {
        let mut captures = Vec::new();
        if broadcast.is_empty() {
            return captures;
        }
        for (slot, entry) in entries.iter().enumerate() {
            if !entry.occupied {
                continue;
            }
            for operand in [OperandSlot::Src1, OperandSlot::Src2] {
                let src = entry.operand(operand);
                if let Some(hit) = broadcast.iter().find(|b| src.waits_on(b.tag)) {
                    captures.push(Capture {
                        slot,
                        operand,
                        value: hit.value,
                    });
                }
            }
        }
        captures
    }

    /// Applies captures to the entry table.
    ///
    /// A capture whose slot has since emptied is dropped.
    pub fn apply(entries: &mut [Entry], captures: &[Capture]) {
        for capture in captures {
            let Some(entry) = entries.get_mut(capture.slot) else {
                continue;
            };
            if !entry.occupied {
                continue;
            }
            let src = entry.operand_mut(capture.operand);
            src.value = capture.value;
            src.ready = true;
        }
    }

    /// Counts broadcast pairs that match no pending operand in `entries`.
    pub fn unmatched(entries: &[Entry], broadcast: &[Broadcast]) -> usize {
        broadcast
            .iter()
            .filter(|b| !entries.iter().any(|e| e.waits_on(b.tag)))
            .count()
    }
}
