//! Reservation station entry.
//!
//! One slot of the entry table. A slot is either empty (every field at its
//! default) or holds one fully initialised instruction waiting for operands.

use std::fmt;

use crate::common::types::{Opcode, Tag};
use crate::core::signals::{DispatchOp, IssuePacket, Operand};

/// Which source operand of an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperandSlot {
    /// First source operand.
    Src1,
    /// Second source operand.
    Src2,
}

/// A single reservation station entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Entry {
    /// Whether this slot holds a live instruction.
    pub occupied: bool,
    /// Opaque operation identifier.
    pub opcode: Opcode,
    /// Tag the instruction broadcasts when it completes.
    pub dest: Tag,
    /// First source operand.
    pub src1: Operand,
    /// Second source operand.
    pub src2: Operand,
    /// Insertion sequence number; lower is older.
    pub seq: u64,
}

impl Entry {
    /// Builds an occupied entry from a dispatch candidate.
    pub fn from_dispatch(op: &DispatchOp, seq: u64) -> Self {
        Self {
            occupied: true,
            opcode: op.opcode,
            dest: op.dest,
            src1: op.src1,
            src2: op.src2,
            seq,
        }
    }

    /// Eligible for issue: occupied with both operands resolved.
    #[inline]
    pub const fn is_ready(&self) -> bool {
        self.occupied && self.src1.ready && self.src2.ready
    }

    /// Returns true if either operand is pending on `tag`.
    pub fn waits_on(&self, tag: Tag) -> bool {
        self.occupied && (self.src1.waits_on(tag) || self.src2.waits_on(tag))
    }

    /// Returns the requested operand.
    #[inline]
    pub const fn operand(&self, which: OperandSlot) -> &Operand {
        match which {
            OperandSlot::Src1 => &self.src1,
            OperandSlot::Src2 => &self.src2,
        }
    }

    /// Returns the requested operand mutably.
    #[inline]
    pub const fn operand_mut(&mut self, which: OperandSlot) -> &mut Operand {
        match which {
            OperandSlot::Src1 => &mut self.src1,
            OperandSlot::Src2 => &mut self.src2,
        }
    }

    /// Empties the slot.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Builds the execution port payload for this entry.
    pub(crate) const fn to_packet(&self, slot: usize) -> IssuePacket {
        IssuePacket {
            slot,
            opcode: self.opcode,
            dest: self.dest,
            src1: self.src1.value,
            src2: self.src2.value,
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.occupied {
            return write!(f, "<empty>");
        }
        write!(f, "#{} {} -> {}", self.seq, self.opcode, self.dest)?;
        for op in [&self.src1, &self.src2] {
            if op.ready {
                write!(f, " {:#x}", op.value)?;
            } else {
                write!(f, " ?{}", op.tag)?;
            }
        }
        Ok(())
    }
}
