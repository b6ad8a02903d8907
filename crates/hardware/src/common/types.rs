//! Scalar value types carried through the issue stage.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operand value width of the reference design (32-bit datapath).
pub type Word = u32;

/// Identifier naming a future producer of a value.
///
/// Tag zero is an ordinary tag: an operand pending on `Tag(0)` waits for a
/// broadcast of tag zero like any other. Whether an operand is resolved is
/// governed only by its `ready` flag.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Tag(pub u32);

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Opaque operation identifier.
///
/// The issue stage never interprets the opcode; it is carried from dispatch
/// to the execution port unmodified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Opcode(pub u32);

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
