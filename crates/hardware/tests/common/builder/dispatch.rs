use tomasim_core::common::{Opcode, Tag, Word};
use tomasim_core::core::signals::{Broadcast, DispatchOp, Operand};

/// Fluent builder for a single dispatch candidate.
///
/// Operands default to ready with value 0 and the destination tag defaults to
/// `1000 + opcode`, which keeps it clear of the small tags tests wait on.
#[derive(Debug, Clone, Copy)]
pub struct OpBuilder {
    opcode: u32,
    dest: u32,
    src1: Operand,
    src2: Operand,
}

impl OpBuilder {
    /// Starts a candidate for `opcode` with ready zero operands.
    pub const fn new(opcode: u32) -> Self {
        Self {
            opcode,
            dest: 1000 + opcode,
            src1: Operand::ready(0),
            src2: Operand::ready(0),
        }
    }

    /// Sets the destination tag.
    pub const fn dest(mut self, tag: u32) -> Self {
        self.dest = tag;
        self
    }

    /// Makes the first operand ready with `value`.
    pub const fn src1(mut self, value: Word) -> Self {
        self.src1 = Operand::ready(value);
        self
    }

    /// Makes the second operand ready with `value`.
    pub const fn src2(mut self, value: Word) -> Self {
        self.src2 = Operand::ready(value);
        self
    }

    /// Makes the first operand wait on `tag`.
    pub const fn src1_waits(mut self, tag: u32) -> Self {
        self.src1 = Operand::pending(Tag(tag));
        self
    }

    /// Makes the second operand wait on `tag`.
    pub const fn src2_waits(mut self, tag: u32) -> Self {
        self.src2 = Operand::pending(Tag(tag));
        self
    }

    /// Finishes the candidate.
    pub const fn build(self) -> DispatchOp {
        DispatchOp {
            opcode: Opcode(self.opcode),
            dest: Tag(self.dest),
            src1: self.src1,
            src2: self.src2,
        }
    }
}

/// A candidate with both operands ready.
pub const fn ready_op(opcode: u32, a: Word, b: Word) -> DispatchOp {
    OpBuilder::new(opcode).src1(a).src2(b).build()
}

/// A candidate whose first operand waits on `tag`.
pub const fn waiting_op(opcode: u32, tag: u32) -> DispatchOp {
    OpBuilder::new(opcode).src1_waits(tag).build()
}

/// One `(tag, value)` result-bus pair.
pub const fn result(tag: u32, value: Word) -> Broadcast {
    Broadcast::new(Tag(tag), value)
}
